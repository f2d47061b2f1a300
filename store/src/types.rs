//! Overlay row and write payloads.
//!
//! # Design
//! Rows are carried as the JSON objects the data store returns, so columns
//! the service knows nothing about, nulls and integer values all reach the
//! caller unchanged. `NewOverlay` fills in the column defaults for keys the
//! request left out. `OverlayPatch` tells three states apart per column: key
//! absent (column left alone), explicit `null`, and any other value. Nothing
//! here validates types, ranges or values; whatever the caller sends is
//! forwarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_POSITION: i64 = 50;
pub const DEFAULT_WIDTH: i64 = 200;
pub const DEFAULT_HEIGHT: i64 = 100;
pub const DEFAULT_FONT_SIZE: i64 = 24;
pub const DEFAULT_COLOR: &str = "#FFFFFF";

/// A row of the `overlays` table exactly as the data store returned it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Overlay(Map<String, Value>);

impl Overlay {
    /// The row's `id`, when the store sent it as a string.
    pub fn id(&self) -> Option<&str> {
        self.0.get("id").and_then(Value::as_str)
    }

    pub fn get(&self, column: &str) -> Option<&Value> {
        self.0.get(column)
    }

    pub fn columns(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_columns(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Overlay {
    fn from(columns: Map<String, Value>) -> Self {
        Self(columns)
    }
}

/// Insert payload. Keys missing from the request body take the column
/// defaults; a key that is present keeps its value, `null` included.
/// Unknown keys (including `id`) are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOverlay {
    #[serde(rename = "type", default)]
    pub kind: Value,
    #[serde(default)]
    pub content: Value,
    #[serde(default = "default_position")]
    pub position_x: Value,
    #[serde(default = "default_position")]
    pub position_y: Value,
    #[serde(default = "default_width")]
    pub width: Value,
    #[serde(default = "default_height")]
    pub height: Value,
    #[serde(default = "default_font_size")]
    pub font_size: Value,
    #[serde(default = "default_color")]
    pub color: Value,
}

impl Default for NewOverlay {
    fn default() -> Self {
        Self {
            kind: Value::Null,
            content: Value::Null,
            position_x: default_position(),
            position_y: default_position(),
            width: default_width(),
            height: default_height(),
            font_size: default_font_size(),
            color: default_color(),
        }
    }
}

fn default_position() -> Value {
    Value::from(DEFAULT_POSITION)
}

fn default_width() -> Value {
    Value::from(DEFAULT_WIDTH)
}

fn default_height() -> Value {
    Value::from(DEFAULT_HEIGHT)
}

fn default_font_size() -> Value {
    Value::from(DEFAULT_FONT_SIZE)
}

fn default_color() -> Value {
    Value::from(DEFAULT_COLOR)
}

/// Partial update. `None` means the key was absent and the column is left
/// alone; `Some(Value::Null)` writes a null.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayPatch {
    #[serde(rename = "type", default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub kind: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub position_x: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub position_y: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

// Only called for keys that appear in the input, so `null` becomes `Some(Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl OverlayPatch {
    /// Attach the modification time, producing the body sent to the store.
    pub fn stamped(self, now: DateTime<Utc>) -> OverlayChanges {
        OverlayChanges {
            patch: self,
            updated_at: now,
        }
    }
}

/// An `OverlayPatch` plus the `updated_at` value every update writes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverlayChanges {
    #[serde(flatten)]
    pub patch: OverlayPatch,
    pub updated_at: DateTime<Utc>,
}
