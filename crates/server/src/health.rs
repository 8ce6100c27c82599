use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub suggestions: HealthCheck,
    pub checked_at: String,
}

pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let payload = HealthResponse {
        status: "ready",
        service: HealthCheck {
            status: "ready",
            detail: "fatoura-server runtime initialized".to_string(),
        },
        suggestions: suggestions_check(&state),
        checked_at: Utc::now().to_rfc3339(),
    };

    (StatusCode::OK, Json(payload))
}

// Without a credential suggestions still answer from the local catalog.
fn suggestions_check(state: &AppState) -> HealthCheck {
    if state.suggestions.has_model() {
        HealthCheck {
            status: "ready",
            detail: format!("model `{}` configured", state.suggestions.settings().model),
        }
    } else {
        HealthCheck {
            status: "fallback_only",
            detail: "no AI credential configured; using local suggestions".to_string(),
        }
    }
}
