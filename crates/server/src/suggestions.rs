use axum::{
    extract::{rejection::JsonRejection, State},
    http::HeaderMap,
    Json,
};
use fatoura_core::suggestions::{Provenance, SuggestionRequest};
use serde::Serialize;
use tracing::info;

use crate::error::{correlation_id, read_json, ApiError};
use crate::state::AppState;
use crate::wire::{line_views, LineView};

#[derive(Debug, Serialize)]
pub struct SuggestionsResponse {
    pub items: Vec<LineView>,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

pub async fn suggest(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<SuggestionRequest>, JsonRejection>,
) -> Result<Json<SuggestionsResponse>, ApiError> {
    let correlation_id = correlation_id(&headers);
    let request = read_json(payload, &correlation_id)?;

    info!(
        event_name = "api.suggestions.requested",
        correlation_id = %correlation_id,
        context_chars = request.context.chars().count(),
        "suggestion request received"
    );

    let outcome = state
        .suggestions
        .request_suggestions(&request)
        .await
        .map_err(|error| ApiError::new(error, &correlation_id))?;

    info!(
        event_name = "api.suggestions.completed",
        correlation_id = %correlation_id,
        provenance = outcome.provenance.as_str(),
        item_count = outcome.items.len(),
        "suggestion request completed"
    );

    Ok(Json(SuggestionsResponse {
        items: line_views(&outcome.items),
        provenance: outcome.provenance,
        model: outcome.model,
        note: outcome.note,
    }))
}
