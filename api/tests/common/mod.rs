//! Shared helpers for router tests: in-memory store doubles and request
//! builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{self, HeaderValue, Request};
use axum::Router;
use chrono::{Duration, TimeZone, Utc};
use http_body_util::BodyExt;
use overlay_api::AppState;
use overlay_store::{NewOverlay, Overlay, OverlayChanges, OverlayStore, StoreError};
use serde_json::{json, Map, Value};

pub const ORIGIN: &str = "http://localhost:5173";

/// Store double that keeps rows in a `Vec`, assigning sequential ids and
/// strictly increasing `created_at` values. Rows are schemaless, like the
/// real table's JSON representation.
#[derive(Default)]
pub struct InMemoryStore {
    rows: Mutex<Vec<Overlay>>,
    inserts: Mutex<u32>,
}

impl InMemoryStore {
    /// Start with rows already in the table, as another writer left them.
    pub fn with_rows(rows: Vec<Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| serde_json::from_value(row).unwrap())
            .collect();
        Self {
            rows: Mutex::new(rows),
            inserts: Mutex::default(),
        }
    }
}

fn created_at(row: &Overlay) -> String {
    row.get("created_at")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

#[async_trait]
impl OverlayStore for InMemoryStore {
    async fn list(&self) -> Result<Vec<Overlay>, StoreError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by_key(created_at);
        Ok(rows)
    }

    async fn get(&self, id: &str) -> Result<Option<Overlay>, StoreError> {
        Ok(self.rows.lock().unwrap().iter().find(|o| o.id() == Some(id)).cloned())
    }

    async fn insert(&self, overlay: &NewOverlay) -> Result<Option<Overlay>, StoreError> {
        let mut count = self.inserts.lock().unwrap();
        *count += 1;
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut row = object(serde_json::to_value(overlay).unwrap());
        row.insert("id".to_string(), json!(format!("overlay-{count}")));
        let stamp = base + Duration::seconds(i64::from(*count));
        row.insert("created_at".to_string(), json!(stamp.to_rfc3339()));
        row.insert("updated_at".to_string(), Value::Null);
        let row = Overlay::from(row);
        self.rows.lock().unwrap().push(row.clone());
        Ok(Some(row))
    }

    async fn update(&self, id: &str, changes: &OverlayChanges) -> Result<Option<Overlay>, StoreError> {
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.iter_mut().find(|o| o.id() == Some(id)) else {
            return Ok(None);
        };
        let mut columns = row.clone().into_columns();
        columns.extend(object(serde_json::to_value(changes).unwrap()));
        *row = Overlay::from(columns);
        Ok(Some(row.clone()))
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.rows.lock().unwrap().retain(|o| o.id() != Some(id));
        Ok(())
    }
}

/// Store double whose every call fails the way a rejecting store would.
pub struct FailingStore;

impl FailingStore {
    fn error() -> StoreError {
        StoreError::Api {
            status: 503,
            body: "connection refused".to_string(),
        }
    }
}

#[async_trait]
impl OverlayStore for FailingStore {
    async fn list(&self) -> Result<Vec<Overlay>, StoreError> {
        Err(Self::error())
    }

    async fn get(&self, _id: &str) -> Result<Option<Overlay>, StoreError> {
        Err(Self::error())
    }

    async fn insert(&self, _overlay: &NewOverlay) -> Result<Option<Overlay>, StoreError> {
        Err(Self::error())
    }

    async fn update(&self, _id: &str, _changes: &OverlayChanges) -> Result<Option<Overlay>, StoreError> {
        Err(Self::error())
    }

    async fn delete(&self, _id: &str) -> Result<(), StoreError> {
        Err(Self::error())
    }
}

pub fn build_test_app(store: Arc<dyn OverlayStore>) -> Router {
    overlay_api::app(AppState::new(store), HeaderValue::from_static(ORIGIN))
}

pub fn memory_app() -> Router {
    build_test_app(Arc::new(InMemoryStore::default()))
}

pub fn seeded_app(rows: Vec<Value>) -> Router {
    build_test_app(Arc::new(InMemoryStore::with_rows(rows)))
}

pub fn failing_app() -> Router {
    build_test_app(Arc::new(FailingStore))
}

pub fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
