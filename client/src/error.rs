//! Error types for the overlay API client.
//!
//! # Design
//! The server always answers with an envelope, so a failure normally carries
//! the server's own `error` text (`Api`). `NotFound` is split out because
//! callers routinely branch on it. A body that is not an envelope at all
//! lands in `Deserialization`.

/// Errors returned by `OverlayClient` build and parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server returned 404 for the requested overlay.
    #[error("overlay not found")]
    NotFound,

    /// The server answered `success: false` (or an unexpected status).
    #[error("HTTP {status}: {message}")]
    Api { status: u16, message: String },

    /// The response body was not the expected envelope.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),
}
