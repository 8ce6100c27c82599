use axum::{
    routing::{get, post, put},
    Router,
};
use tracing::{error, info};

use crate::state::AppState;
use crate::{catalog, dashboard, health, invoices, suggestions};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/ai/suggestions", post(suggestions::suggest))
        .route("/api/invoices/preview", post(invoices::preview))
        .route("/api/invoices", get(invoices::list).post(invoices::create))
        .route("/api/invoices/{id}", get(invoices::get))
        .route("/api/invoices/{id}/status", put(invoices::update_status))
        .route("/api/clients", get(catalog::list_clients).post(catalog::create_client))
        .route("/api/products", get(catalog::list_products).post(catalog::create_product))
        .route("/api/dashboard", get(dashboard::dashboard))
        .with_state(state)
}

/// Serves the API until `shutdown` resolves.
pub async fn serve(
    bind_address: &str,
    port: u16,
    state: AppState,
    shutdown: impl std::future::Future<Output = ()> + Send + 'static,
) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.http.start",
        correlation_id = "bootstrap",
        bind_address = %address,
        "http api started"
    );

    axum::serve(listener, router(state)).with_graceful_shutdown(shutdown).await.map_err(
        |serve_error| {
            error!(
                event_name = "system.http.error",
                correlation_id = "bootstrap",
                error = %serve_error,
                "http api terminated unexpectedly"
            );
            serve_error
        },
    )
}
