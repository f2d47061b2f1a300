use std::net::{IpAddr, SocketAddr};

use axum::http::HeaderValue;
use overlay_store::StoreConfig;

/// Errors detected while reading configuration at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("HOST must be an IP address, got {0:?}")]
    InvalidHost(String),

    #[error("PORT must be a valid u16, got {0:?}")]
    InvalidPort(String),

    #[error("CORS_ORIGIN is not a valid header value: {0:?}")]
    InvalidOrigin(String),
}

/// Server configuration loaded from environment variables.
///
/// | Env Var             | Default                 |
/// |---------------------|-------------------------|
/// | `HOST`              | `127.0.0.1`             |
/// | `PORT`              | `8000`                  |
/// | `CORS_ORIGIN`       | `http://localhost:5173` |
/// | `SUPABASE_URL`      | empty                   |
/// | `SUPABASE_ANON_KEY` | empty                   |
///
/// The data store variables are deliberately not checked here; a missing
/// value fails the first store call instead.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
    /// The single origin allowed to call `/api/*` cross-origin.
    pub cors_origin: HeaderValue,
    pub store: StoreConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(get: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = get("HOST").unwrap_or_else(|| "127.0.0.1".into());
        let host = host.parse().map_err(|_| ConfigError::InvalidHost(host))?;

        let port = get("PORT").unwrap_or_else(|| "8000".into());
        let port = port.parse().map_err(|_| ConfigError::InvalidPort(port))?;

        let cors_origin = get("CORS_ORIGIN").unwrap_or_else(|| "http://localhost:5173".into());
        let cors_origin =
            HeaderValue::from_str(&cors_origin).map_err(|_| ConfigError::InvalidOrigin(cors_origin))?;

        Ok(Self {
            host,
            port,
            cors_origin,
            store: StoreConfig::from_vars(&get),
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}
