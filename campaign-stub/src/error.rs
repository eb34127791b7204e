use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StubError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Invalid(String),

    #[error("Service temporarily unavailable")]
    Unavailable,
}

impl IntoResponse for StubError {
    fn into_response(self) -> Response {
        let status = match self {
            StubError::NotFound(_) => StatusCode::NOT_FOUND,
            StubError::Conflict(_) => StatusCode::CONFLICT,
            StubError::Invalid(_) => StatusCode::BAD_REQUEST,
            StubError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        };
        (status, Json(serde_json::json!({ "Message": self.to_string() }))).into_response()
    }
}

impl From<campaign_core::CoreError> for StubError {
    fn from(err: campaign_core::CoreError) -> Self {
        StubError::Invalid(err.to_string())
    }
}
