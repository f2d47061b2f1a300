use std::sync::Arc;

use overlay_store::OverlayStore;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheap to clone; the store handle is built once at startup and only read
/// afterwards.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn OverlayStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn OverlayStore>) -> Self {
        Self { store }
    }
}
