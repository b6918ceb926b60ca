use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

/// Failure surfaced to an HTTP client.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub ServiceError);

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self.0 {
            ServiceError::MalformedDescriptor(_) => StatusCode::BAD_REQUEST,
            ServiceError::Storage(_) | ServiceError::Parse(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = self.to_string();
        error!(error = %msg, %status, "request failed");
        (status, msg).into_response()
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("snapshot unavailable: {0}")]
    Snapshot(#[from] ServiceError),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_failure_maps_to_500() {
        let res = ApiError(ServiceError::Storage("db.json: read-only".into())).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn malformed_descriptor_maps_to_400() {
        let res = ApiError(ServiceError::MalformedDescriptor("A".into())).into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
