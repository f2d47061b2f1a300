//! Remote data store client for the `overlays` table.
//!
//! # Overview
//! `OverlayStore` is the only capability surface the HTTP layer depends on:
//! select-all ordered, select by id, insert, update by id, delete by id.
//! `RestStore` implements it against a PostgREST-style REST endpoint.
//!
//! # Design
//! - The store handle is constructed explicitly and shared behind an `Arc`;
//!   there is no process-wide client.
//! - Every call is a single round trip. No retries, no timeouts, no caching.
//! - "No matching row" is reported as `Ok(None)`, never as an error, so the
//!   caller decides what a miss means.

pub mod client;
pub mod error;
pub mod types;

pub use client::{OverlayStore, RestStore, StoreConfig};
pub use error::StoreError;
pub use types::{NewOverlay, Overlay, OverlayChanges, OverlayPatch};
