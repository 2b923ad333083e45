//! Maps the shared error taxonomy onto HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use selscore_core::error::SelError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: String,
    pub category: String,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError(pub SelError);

impl From<SelError> for ApiError {
    fn from(err: SelError) -> Self {
        Self(err)
    }
}

fn status_for(err: &SelError) -> StatusCode {
    match err {
        SelError::FeatureShape { .. } => StatusCode::BAD_REQUEST,
        SelError::ArtifactIntegrity { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SelError::InvalidConfig { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SelError::UpstreamUnavailable { .. } => StatusCode::BAD_GATEWAY,
        SelError::PredictionFailure { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        SelError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
        SelError::LlmTransportFailure { .. } => StatusCode::BAD_GATEWAY,
        SelError::InsufficientEvidence { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        SelError::DeadlineExceeded { .. } => StatusCode::GATEWAY_TIMEOUT,
        SelError::FatalConfig(_) => StatusCode::INTERNAL_SERVER_ERROR,
        SelError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        let body = ApiErrorBody {
            error: status.canonical_reason().unwrap_or("error").to_string(),
            category: self.0.category().to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
