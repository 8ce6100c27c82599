use axum::{
    extract::rejection::JsonRejection,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use fatoura_core::errors::{ApplicationError, InterfaceError};
use serde::Serialize;
use tracing::warn;
use uuid::Uuid;

pub const CORRELATION_HEADER: &str = "x-correlation-id";

#[derive(Debug)]
pub struct ApiError(InterfaceError);

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
    correlation_id: &'a str,
}

impl ApiError {
    pub fn new(error: impl Into<ApplicationError>, correlation_id: &str) -> Self {
        let interface = error.into().into_interface(correlation_id);
        if matches!(
            interface,
            InterfaceError::ServiceUnavailable { .. } | InterfaceError::Internal { .. }
        ) {
            warn!(
                event_name = "api.request.failed",
                correlation_id,
                error_class = interface.error_class(),
                error = %interface,
                "request failed on a dependency"
            );
        }
        Self(interface)
    }

    pub fn status(&self) -> StatusCode {
        match self.0 {
            InterfaceError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            InterfaceError::NotFound { .. } => StatusCode::NOT_FOUND,
            InterfaceError::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            InterfaceError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.0.error_class(),
            message: self.0.detail(),
            correlation_id: self.0.correlation_id(),
        };
        (self.status(), Json(body)).into_response()
    }
}

/// Reuses the caller's correlation id when present.
pub fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("req-{}", Uuid::new_v4()))
}

/// Malformed bodies are reported as 400 with the extractor's reason.
pub fn read_json<T>(
    payload: Result<Json<T>, JsonRejection>,
    correlation_id: &str,
) -> Result<T, ApiError> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        ApiError::new(ApplicationError::InvalidRequest(rejection.body_text()), correlation_id)
    })
}
