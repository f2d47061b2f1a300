//! HTTP layer for the overlay service.
//!
//! # Overview
//! Six JSON routes under `/api`, each a single round trip to the injected
//! `OverlayStore`, each answering with the `{success, data|error|message}`
//! envelope. Status codes carry the outcome class: 200/201 on success, 404
//! when an id has no row, 500 for anything the store (or body decoding)
//! reports.
//!
//! # Design
//! - The store handle arrives through `AppState`; nothing is global.
//! - CORS admits exactly one origin, with credentials, and only on `/api/*`.
//! - No timeouts, retries or cancellation: a hung store call hangs its request.

pub mod config;
pub mod envelope;
pub mod error;
pub mod routes;
pub mod state;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

pub use config::{ConfigError, ServerConfig};
pub use envelope::Envelope;
pub use error::ApiError;
pub use state::AppState;

/// Build the full application router for `state`, admitting cross-origin
/// requests from `cors_origin` only.
pub fn app(state: AppState, cors_origin: HeaderValue) -> Router {
    let api = routes::router().layer(cors_layer(cors_origin));

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Only a matching `Origin` gets the allow headers back. Methods and headers
/// are mirrored from the preflight, and credentials are allowed.
fn cors_layer(origin: HeaderValue) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list([origin]))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}
