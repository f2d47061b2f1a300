//! Stateless HTTP request builder and response parser for the overlay API.
//!
//! # Design
//! `OverlayClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The caller executes the HTTP round trip in between.

use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{CreateOverlay, Envelope, Overlay, UpdateOverlay};

/// Synchronous, stateless client for the overlay API.
#[derive(Debug, Clone)]
pub struct OverlayClient {
    base_url: String,
}

impl OverlayClient {
    /// `base_url` is the server root, e.g. `http://localhost:8000`; the
    /// `/api` prefix is added per request.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn request(&self, method: HttpMethod, path: &str) -> HttpRequest {
        HttpRequest::new(method, format!("{}/api{path}", self.base_url))
    }

    fn json_request<T: serde::Serialize>(
        &self,
        method: HttpMethod,
        path: &str,
        input: &T,
    ) -> Result<HttpRequest, ClientError> {
        let body = serde_json::to_string(input).map_err(|e| ClientError::Serialization(e.to_string()))?;
        Ok(self.request(method, path).with_json(body))
    }

    pub fn build_list_overlays(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/overlays")
    }

    pub fn build_get_overlay(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Get, &format!("/overlays/{id}"))
    }

    pub fn build_create_overlay(&self, input: &CreateOverlay) -> Result<HttpRequest, ClientError> {
        self.json_request(HttpMethod::Post, "/overlays", input)
    }

    pub fn build_update_overlay(&self, id: &str, input: &UpdateOverlay) -> Result<HttpRequest, ClientError> {
        self.json_request(HttpMethod::Put, &format!("/overlays/{id}"), input)
    }

    pub fn build_delete_overlay(&self, id: &str) -> HttpRequest {
        self.request(HttpMethod::Delete, &format!("/overlays/{id}"))
    }

    pub fn build_health(&self) -> HttpRequest {
        self.request(HttpMethod::Get, "/health")
    }

    pub fn parse_list_overlays(&self, response: HttpResponse) -> Result<Vec<Overlay>, ClientError> {
        data(unwrap_envelope(response, 200)?)
    }

    pub fn parse_get_overlay(&self, response: HttpResponse) -> Result<Overlay, ClientError> {
        data(unwrap_envelope(response, 200)?)
    }

    pub fn parse_create_overlay(&self, response: HttpResponse) -> Result<Overlay, ClientError> {
        data(unwrap_envelope(response, 201)?)
    }

    pub fn parse_update_overlay(&self, response: HttpResponse) -> Result<Overlay, ClientError> {
        data(unwrap_envelope(response, 200)?)
    }

    /// Returns the server's confirmation message.
    pub fn parse_delete_overlay(&self, response: HttpResponse) -> Result<String, ClientError> {
        message(unwrap_envelope::<serde_json::Value>(response, 200)?)
    }

    pub fn parse_health(&self, response: HttpResponse) -> Result<String, ClientError> {
        message(unwrap_envelope::<serde_json::Value>(response, 200)?)
    }
}

/// Decode the envelope and reject anything but `success: true` with the
/// expected status.
fn unwrap_envelope<T: DeserializeOwned>(response: HttpResponse, expected: u16) -> Result<Envelope<T>, ClientError> {
    if response.status == 404 {
        return Err(ClientError::NotFound);
    }
    let envelope: Envelope<T> =
        serde_json::from_str(&response.body).map_err(|e| ClientError::Deserialization(e.to_string()))?;
    if response.status != expected || !envelope.success {
        return Err(ClientError::Api {
            status: response.status,
            message: envelope.error.unwrap_or_else(|| "request failed".to_string()),
        });
    }
    Ok(envelope)
}

fn data<T>(envelope: Envelope<T>) -> Result<T, ClientError> {
    envelope
        .data
        .ok_or_else(|| ClientError::Deserialization("response carried no data".to_string()))
}

fn message<T>(envelope: Envelope<T>) -> Result<String, ClientError> {
    envelope
        .message
        .ok_or_else(|| ClientError::Deserialization("response carried no message".to_string()))
}
