//! In-memory stand-in for the data store's REST interface.
//!
//! Implements the slice of PostgREST behavior the overlay store client relies
//! on: `eq.` filters, `order=<column>.<asc|desc>`, `Prefer:
//! return=representation`, store-assigned `id` and `created_at`, and an
//! optional `apikey` check. Rows are schemaless JSON objects kept in
//! insertion order per table.

use std::{cmp::Ordering, collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub type Row = Map<String, Value>;

pub type Tables = Arc<RwLock<HashMap<String, Vec<Row>>>>;

#[derive(Clone, Default)]
pub struct MockStore {
    tables: Tables,
    api_key: Option<String>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject requests whose `apikey` header differs from `key`.
    pub fn with_api_key(key: &str) -> Self {
        Self {
            tables: Tables::default(),
            api_key: Some(key.to_string()),
        }
    }

    pub fn router(self) -> Router {
        Router::new()
            .route(
                "/rest/v1/{table}",
                get(select_rows)
                    .post(insert_rows)
                    .patch(update_rows)
                    .delete(delete_rows),
            )
            .with_state(self)
    }

    fn authorize(&self, headers: &HeaderMap) -> Result<(), Rejection> {
        let Some(expected) = &self.api_key else {
            return Ok(());
        };
        let supplied = headers.get("apikey").and_then(|v| v.to_str().ok());
        if supplied == Some(expected.as_str()) {
            Ok(())
        } else {
            Err(Rejection::new(StatusCode::UNAUTHORIZED, "Invalid API key"))
        }
    }
}

pub fn app() -> Router {
    MockStore::new().router()
}

pub async fn serve(listener: TcpListener, store: MockStore) -> Result<(), std::io::Error> {
    axum::serve(listener, store.router()).await
}

/// PostgREST-shaped error body.
#[derive(Debug)]
pub struct Rejection {
    status: StatusCode,
    message: String,
}

impl Rejection {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for Rejection {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "message": self.message }))).into_response()
    }
}

/// Parsed query string: equality filters plus an optional ordering.
#[derive(Debug, Default, PartialEq)]
struct QuerySpec {
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
}

impl QuerySpec {
    fn parse(params: Vec<(String, String)>) -> Result<Self, Rejection> {
        let mut spec = QuerySpec::default();
        for (key, value) in params {
            match key.as_str() {
                "select" => {}
                "order" => {
                    let (column, direction) = value.split_once('.').unwrap_or((value.as_str(), "asc"));
                    let ascending = match direction {
                        "asc" => true,
                        "desc" => false,
                        other => {
                            return Err(Rejection::new(
                                StatusCode::BAD_REQUEST,
                                format!("unsupported order direction: {other}"),
                            ))
                        }
                    };
                    spec.order = Some((column.to_string(), ascending));
                }
                _ => {
                    let Some(operand) = value.strip_prefix("eq.") else {
                        return Err(Rejection::new(
                            StatusCode::BAD_REQUEST,
                            format!("unsupported filter on {key}: {value}"),
                        ));
                    };
                    spec.filters.push((key, operand.to_string()));
                }
            }
        }
        Ok(spec)
    }

    fn matches(&self, row: &Row) -> bool {
        self.filters
            .iter()
            .all(|(column, operand)| row.get(column).is_some_and(|v| text_of(v) == *operand))
    }
}

fn text_of(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => {
            let (x, y) = (x.as_f64().unwrap_or(0.0), y.as_f64().unwrap_or(0.0));
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None | Some(Value::Null), None | Some(Value::Null)) => Ordering::Equal,
        // nulls last
        (None | Some(Value::Null), _) => Ordering::Greater,
        (_, None | Some(Value::Null)) => Ordering::Less,
        (Some(x), Some(y)) => text_of(x).cmp(&text_of(y)),
    }
}

fn wants_representation(headers: &HeaderMap) -> bool {
    headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.split(',').any(|p| p.trim() == "return=representation"))
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false))
}

async fn select_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Row>>, Rejection> {
    store.authorize(&headers)?;
    let spec = QuerySpec::parse(params)?;
    let tables = store.tables.read().await;
    let mut rows: Vec<Row> = tables
        .get(&table)
        .map(|rows| rows.iter().filter(|row| spec.matches(row)).cloned().collect())
        .unwrap_or_default();
    if let Some((column, ascending)) = &spec.order {
        // stable: ties keep insertion order
        rows.sort_by(|a, b| {
            let ordering = compare_values(a.get(column), b.get(column));
            if *ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }
    Ok(Json(rows))
}

async fn insert_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Response, Rejection> {
    store.authorize(&headers)?;
    let inputs = match body {
        Value::Object(row) => vec![row],
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(row) => Ok(row),
                _ => Err(Rejection::new(StatusCode::BAD_REQUEST, "rows must be JSON objects")),
            })
            .collect::<Result<_, _>>()?,
        _ => return Err(Rejection::new(StatusCode::BAD_REQUEST, "rows must be JSON objects")),
    };

    tracing::debug!(%table, rows = inputs.len(), "insert");
    let mut inserted = Vec::with_capacity(inputs.len());
    let mut tables = store.tables.write().await;
    let rows = tables.entry(table).or_default();
    for mut row in inputs {
        row.insert("id".to_string(), Value::String(Uuid::new_v4().to_string()));
        row.insert("created_at".to_string(), now());
        row.entry("updated_at").or_insert(Value::Null);
        rows.push(row.clone());
        inserted.push(row);
    }

    if wants_representation(&headers) {
        Ok((StatusCode::CREATED, Json(inserted)).into_response())
    } else {
        Ok(StatusCode::CREATED.into_response())
    }
}

async fn update_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
    Json(changes): Json<Row>,
) -> Result<Response, Rejection> {
    store.authorize(&headers)?;
    let spec = QuerySpec::parse(params)?;
    let mut tables = store.tables.write().await;
    let mut updated = Vec::new();
    if let Some(rows) = tables.get_mut(&table) {
        for row in rows.iter_mut().filter(|row| spec.matches(row)) {
            for (column, value) in &changes {
                row.insert(column.clone(), value.clone());
            }
            updated.push(row.clone());
        }
    }
    tracing::debug!(%table, rows = updated.len(), "update");

    if wants_representation(&headers) {
        Ok(Json(updated).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

async fn delete_rows(
    State(store): State<MockStore>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Result<Response, Rejection> {
    store.authorize(&headers)?;
    let spec = QuerySpec::parse(params)?;
    let mut tables = store.tables.write().await;
    let mut deleted = Vec::new();
    if let Some(rows) = tables.get_mut(&table) {
        rows.retain(|row| {
            if spec.matches(row) {
                deleted.push(row.clone());
                false
            } else {
                true
            }
        });
    }
    tracing::debug!(%table, rows = deleted.len(), "delete");

    if wants_representation(&headers) {
        Ok(Json(deleted).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}
