//! Overlay CRUD and health handlers.
//!
//! Each handler makes at most one store call and wraps the outcome in the
//! response envelope. Request bodies are decoded here; a body that cannot be
//! decoded is reported like any other failure.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use overlay_store::{NewOverlay, Overlay, OverlayPatch};

use crate::envelope::Envelope;
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

pub const HEALTH_MESSAGE: &str = "API is running";
pub const DELETED_MESSAGE: &str = "Overlay deleted successfully";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overlays", get(list_overlays).post(create_overlay))
        .route(
            "/overlays/{id}",
            get(get_overlay).put(update_overlay).delete(delete_overlay),
        )
        .route("/health", get(health_check))
}

fn body<T>(payload: Result<Json<T>, JsonRejection>) -> ApiResult<T> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ApiError::MalformedBody(rejection.body_text()))
}

async fn list_overlays(State(state): State<AppState>) -> ApiResult<Json<Envelope<Vec<Overlay>>>> {
    let overlays = state.store.list().await?;
    Ok(Json(Envelope::data(overlays)))
}

async fn create_overlay(
    State(state): State<AppState>,
    payload: Result<Json<NewOverlay>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Envelope<Overlay>>)> {
    let input = body(payload)?;
    let created = state.store.insert(&input).await?;
    let envelope = Envelope {
        success: true,
        data: created,
        error: None,
        message: None,
    };
    Ok((StatusCode::CREATED, Json(envelope)))
}

async fn get_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<Overlay>>> {
    let overlay = state.store.get(&id).await?.ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(overlay)))
}

async fn update_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<OverlayPatch>, JsonRejection>,
) -> ApiResult<Json<Envelope<Overlay>>> {
    let changes = body(payload)?.stamped(Utc::now());
    let overlay = state
        .store
        .update(&id, &changes)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(Envelope::data(overlay)))
}

/// Deletes without checking that the row existed, so a missing id also
/// reports success.
async fn delete_overlay(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Envelope<()>>> {
    state.store.delete(&id).await?;
    Ok(Json(Envelope::message(DELETED_MESSAGE)))
}

async fn health_check() -> Json<Envelope<()>> {
    Json(Envelope::message(HEALTH_MESSAGE))
}
