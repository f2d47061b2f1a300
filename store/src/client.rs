//! `OverlayStore` trait and its REST implementation.
//!
//! # Design
//! `RestStore` talks to a PostgREST-style endpoint (`{url}/rest/v1/overlays`)
//! using query-string filters (`id=eq.<id>`, `order=created_at.asc`) and asks
//! for the affected rows back with `Prefer: return=representation`. The
//! endpoint URL and access key are not validated up front; a missing or bad
//! value surfaces as a `StoreError` on the first call.

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::types::{NewOverlay, Overlay, OverlayChanges};

const TABLE: &str = "overlays";
const RETURN_REPRESENTATION: &str = "return=representation";

/// Capability surface of the remote data store.
#[async_trait]
pub trait OverlayStore: Send + Sync {
    /// All rows ordered by `created_at` ascending.
    async fn list(&self) -> Result<Vec<Overlay>, StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Overlay>, StoreError>;

    /// Insert a row and return it as stored. `None` if the store echoed nothing back.
    async fn insert(&self, overlay: &NewOverlay) -> Result<Option<Overlay>, StoreError>;

    /// Apply `changes` to the row matching `id`. `None` means no row was affected.
    async fn update(&self, id: &str, changes: &OverlayChanges) -> Result<Option<Overlay>, StoreError>;

    /// Delete the row matching `id`. Succeeds whether or not the row existed.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Endpoint and access key for the data store.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub url: String,
    pub key: String,
}

impl StoreConfig {
    /// Read `SUPABASE_URL` and `SUPABASE_ANON_KEY` through `get`. Missing
    /// variables become empty strings.
    pub fn from_vars<F>(get: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            url: get("SUPABASE_URL").unwrap_or_default(),
            key: get("SUPABASE_ANON_KEY").unwrap_or_default(),
        }
    }
}

/// `OverlayStore` backed by the data store's REST interface.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: reqwest::Client,
    endpoint: String,
    key: String,
}

impl RestStore {
    pub fn new(config: &StoreConfig) -> Self {
        Self::with_client(reqwest::Client::new(), config)
    }

    /// Reuse an existing [`reqwest::Client`] (and its connection pool).
    pub fn with_client(client: reqwest::Client, config: &StoreConfig) -> Self {
        Self {
            client,
            endpoint: format!("{}/rest/v1/{TABLE}", config.url.trim_end_matches('/')),
            key: config.key.clone(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn request(&self, method: Method) -> RequestBuilder {
        self.client
            .request(method, &self.endpoint)
            .header("apikey", &self.key)
            .bearer_auth(&self.key)
    }

    /// Map non-2xx responses to `StoreError::Api`, passing successes through.
    async fn check(response: Response) -> Result<Response, StoreError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(StoreError::Api {
            status: status.as_u16(),
            body,
        })
    }

    async fn rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
        let response = Self::check(response).await?;
        Ok(response.json().await?)
    }
}

#[async_trait]
impl OverlayStore for RestStore {
    async fn list(&self) -> Result<Vec<Overlay>, StoreError> {
        tracing::debug!(table = TABLE, "selecting all rows");
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("order", "created_at.asc")])
            .send()
            .await?;
        Self::rows(response).await
    }

    async fn get(&self, id: &str) -> Result<Option<Overlay>, StoreError> {
        tracing::debug!(table = TABLE, %id, "selecting row");
        let filter = format!("eq.{id}");
        let response = self
            .request(Method::GET)
            .query(&[("select", "*"), ("id", filter.as_str())])
            .send()
            .await?;
        Ok(Self::rows::<Overlay>(response).await?.into_iter().next())
    }

    async fn insert(&self, overlay: &NewOverlay) -> Result<Option<Overlay>, StoreError> {
        tracing::debug!(table = TABLE, "inserting row");
        let response = self
            .request(Method::POST)
            .header("Prefer", RETURN_REPRESENTATION)
            .json(overlay)
            .send()
            .await?;
        Ok(Self::rows::<Overlay>(response).await?.into_iter().next())
    }

    async fn update(&self, id: &str, changes: &OverlayChanges) -> Result<Option<Overlay>, StoreError> {
        tracing::debug!(table = TABLE, %id, "updating row");
        let filter = format!("eq.{id}");
        let response = self
            .request(Method::PATCH)
            .query(&[("id", filter.as_str())])
            .header("Prefer", RETURN_REPRESENTATION)
            .json(changes)
            .send()
            .await?;
        Ok(Self::rows::<Overlay>(response).await?.into_iter().next())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        tracing::debug!(table = TABLE, %id, "deleting row");
        let filter = format!("eq.{id}");
        let response = self
            .request(Method::DELETE)
            .query(&[("id", filter.as_str())])
            .send()
            .await?;
        Self::check(response).await?;
        Ok(())
    }
}
