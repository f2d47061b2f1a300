//! Error types for the data store client.
//!
//! # Design
//! The store makes no distinction between error classes beyond "the call
//! never produced a usable response" (`Request`) and "the store answered
//! with a non-2xx status" (`Api`). Callers surface the `Display` text as-is.

/// Errors returned by `OverlayStore` implementations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The HTTP request failed (unreachable host, bad URL, TLS, undecodable body).
    #[error("data store request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The data store returned a non-2xx status.
    #[error("data store error ({status}): {body}")]
    Api { status: u16, body: String },
}
