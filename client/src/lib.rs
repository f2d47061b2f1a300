//! Synchronous API client core for the overlay service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The caller executes the
//! actual HTTP round trip, keeping the core deterministic and testable.
//!
//! # Design
//! - `OverlayClient` is stateless; it holds only `base_url`.
//! - Each operation is split into `build_*` (produces a request) and
//!   `parse_*` (consumes a response), so the I/O boundary is explicit.
//! - Parsing unwraps the `{success, data|error|message}` envelope and turns
//!   `success: false` into a `ClientError` carrying the server's text.

pub mod client;
pub mod error;
pub mod http;
pub mod types;

pub use client::OverlayClient;
pub use error::ClientError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use types::{CreateOverlay, Envelope, Overlay, UpdateOverlay};
