mod app;
mod bootstrap;
mod catalog;
mod dashboard;
mod error;
mod health;
mod invoices;
mod state;
mod suggestions;
mod wire;

use anyhow::Result;
use fatoura_core::config::{AppConfig, LoadOptions};

fn init_logging(config: &AppConfig) {
    use fatoura_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    run().await
}

pub async fn run() -> Result<()> {
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config)?;

    tracing::info!(
        event_name = "system.server.started",
        correlation_id = "bootstrap",
        "fatoura-server started"
    );
    app::serve(&app.config.server.bind_address, app.config.server.port, app.state, async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(
                event_name = "system.server.signal_error",
                correlation_id = "shutdown",
                error = %error,
                "could not listen for shutdown signal"
            );
        }
    })
    .await?;
    tracing::info!(
        event_name = "system.server.stopping",
        correlation_id = "shutdown",
        "fatoura-server stopping"
    );

    Ok(())
}
