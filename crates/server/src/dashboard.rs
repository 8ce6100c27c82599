use axum::{extract::State, http::HeaderMap, Json};
use chrono::Utc;
use fatoura_core::domain::dashboard::DashboardStats;
use fatoura_core::format::format_amount;
use fatoura_db::RepositoryError;
use serde::Serialize;

use crate::error::{correlation_id, ApiError};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DashboardView {
    #[serde(flatten)]
    pub stats: DashboardStats,
    pub revenue_display: String,
}

pub async fn dashboard(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<DashboardView>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let failed = |error: RepositoryError| ApiError::new(error, &correlation_id);

    let invoices = state.invoices.list().await.map_err(failed)?;
    let clients = state.clients.list().await.map_err(failed)?;
    let products = state.products.list().await.map_err(failed)?;

    let stats = DashboardStats::compute(&invoices, &clients, &products, Utc::now().date_naive());
    let revenue_display = format_amount(stats.revenue, &state.currency);
    Ok(Json(DashboardView { stats, revenue_display }))
}
