//! # HTTP Client
//!
//! Thin wrapper over `reqwest` that knows the backend's base URL and turns
//! every answer into bytes or an [`ApiError`].
//!
//! ## Request Path
//! ```text
//! Repository::create(payload)
//!      │
//!      ▼
//! ApiClient::send("POST /clientes", request)
//!      │
//!      ├── no response ─────────► ApiError::Transport
//!      ├── 400 / 422 ───────────► ApiError::Rejected
//!      ├── other non-2xx ───────► ApiError::Status
//!      └── 2xx ─────────────────► body bytes (decoded by the caller)
//! ```

use reqwest::{Method, RequestBuilder};
use std::time::Instant;
use tracing::{debug, warn};

use deli_core::Entity;

use crate::cache::QueryCache;
use crate::config::ApiSettings;
use crate::error::{ApiError, ApiResult};
use crate::repository::Repository;

/// Handle to the backend. Cheap to clone; clones share the HTTP connection
/// pool and the query cache.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    cache: QueryCache,
}

impl ApiClient {
    /// Creates a client with a fresh query cache.
    pub fn new(settings: &ApiSettings) -> ApiResult<Self> {
        Self::with_cache(settings, QueryCache::new())
    }

    /// Creates a client sharing an existing query cache.
    pub fn with_cache(settings: &ApiSettings, cache: QueryCache) -> ApiResult<Self> {
        let base = url::Url::parse(&settings.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(settings.timeout())
            .build()
            .map_err(|e| ApiError::Transport {
                endpoint: "client_init".into(),
                source: e,
            })?;

        Ok(ApiClient {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            cache,
        })
    }

    /// Repository for one resource.
    pub fn repository<E: Entity>(&self) -> Repository<E> {
        Repository::new(self.clone())
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub(crate) fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, self.url(path))
    }

    /// Sends a request and returns the body of a 2xx answer.
    pub(crate) async fn send(&self, endpoint: &str, request: RequestBuilder) -> ApiResult<Vec<u8>> {
        let start = Instant::now();

        let resp = request.send().await.map_err(|e| {
            warn!(endpoint, error = %e, "Request failed before a response");
            ApiError::Transport {
                endpoint: endpoint.to_string(),
                source: e,
            }
        })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(endpoint, status = status.as_u16(), "Backend returned an error status");
            return Err(ApiError::from_status(endpoint.to_string(), status.as_u16(), body));
        }

        let bytes = resp.bytes().await.map_err(|e| ApiError::Transport {
            endpoint: endpoint.to_string(),
            source: e,
        })?;

        debug!(
            endpoint,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Request completed"
        );

        Ok(bytes.to_vec())
    }

    /// Sends a request and decodes the JSON body.
    pub(crate) async fn send_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        request: RequestBuilder,
    ) -> ApiResult<T> {
        let body = self.send(endpoint, request).await?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Decode {
            endpoint: endpoint.to_string(),
            source: e,
        })
    }
}
