use fatoura_agent::{LlmError, SuggestionService};
use fatoura_core::config::{AppConfig, ConfigError, LoadOptions};
use thiserror::Error;
use tracing::info;

use crate::state::AppState;

pub struct Application {
    pub config: AppConfig,
    pub state: AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("suggestion client setup failed: {0}")]
    SuggestionClient(#[source] LlmError),
}

pub fn bootstrap(options: LoadOptions) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config)
}

pub fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(
        event_name = "system.bootstrap.start",
        correlation_id = "bootstrap",
        "starting application bootstrap"
    );

    let suggestions =
        SuggestionService::from_config(&config.llm).map_err(BootstrapError::SuggestionClient)?;
    info!(
        event_name = "system.bootstrap.suggestions_ready",
        correlation_id = "bootstrap",
        mode = if suggestions.has_model() { "model" } else { "fallback_only" },
        model = %config.llm.model,
        "suggestion service initialized"
    );

    let state = AppState::in_memory(suggestions, config.invoicing.currency.clone());
    Ok(Application { config, state })
}

#[cfg(test)]
mod tests {
    use fatoura_core::config::{AppConfig, ConfigOverrides, LoadOptions};

    use crate::bootstrap::{bootstrap, bootstrap_with_config};

    #[test]
    fn bootstrap_without_credential_serves_fallback_only() {
        let app = bootstrap_with_config(AppConfig::default()).expect("bootstrap");

        assert!(!app.state.suggestions.has_model());
        assert_eq!(app.state.currency, "TND");
    }

    #[test]
    fn bootstrap_with_credential_enables_model() {
        let mut config = AppConfig::default();
        config.llm.api_key = Some("sk-or-test".to_string().into());

        let app = bootstrap_with_config(config).expect("bootstrap");

        assert!(app.state.suggestions.has_model());
    }

    #[test]
    fn bootstrap_rejects_invalid_overrides() {
        let result = bootstrap(LoadOptions {
            overrides: ConfigOverrides {
                llm_base_url: Some("ftp://openrouter.ai".to_string()),
                ..ConfigOverrides::default()
            },
            ..LoadOptions::default()
        });

        let message = result.err().expect("error").to_string();
        assert!(message.contains("llm.base_url"));
    }
}
