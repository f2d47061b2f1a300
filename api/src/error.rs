use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use overlay_store::StoreError;

use crate::envelope::Envelope;

/// Failures a route can end in. Every variant renders the failure envelope.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No row matches the requested id (GET and PUT only).
    #[error("Overlay not found")]
    NotFound,

    /// Anything the data store reported, passed through verbatim.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The JSON request body was missing or could not be decoded.
    #[error("{0}")]
    MalformedBody(String),
}

/// Convenience type alias for handler return values.
pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::MalformedBody(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}
