//! HTTP transport for the Syft search service.
//!
//! The main entry point is [`SyftClient`], built via [`SyftClientBuilder`] or
//! straight from a [`ClientConfig`]. It implements [`SearchTransport`], the
//! seam the session controller talks to.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::config::ClientConfig;
use crate::error::{SyftError, SyftResult};
use crate::model::search::{SearchRequestPayload, SearchResponse};

/// Search endpoint, relative to the base URL.
pub const SEARCH_PATH: &str = "api/search/";
/// Liveness route exposed by the search blueprint.
pub const PING_PATH: &str = "api/search/test";

// ---------------------------------------------------------------------------
// SearchTransport trait
// ---------------------------------------------------------------------------

/// Issues one search request and maps the reply into a typed result.
///
/// Implementations make exactly one attempt per call. Retrying is the
/// caller's decision.
#[async_trait]
pub trait SearchTransport: Send + Sync {
    async fn submit(&self, payload: &SearchRequestPayload) -> SyftResult<SearchResponse>;
}

// ---------------------------------------------------------------------------
// Internal shared state
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct ClientInner {
    http: reqwest::Client,
    base_url: Url,
}

impl ClientInner {
    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> SyftResult<Url> {
        self.base_url.join(path).map_err(SyftError::UrlParse)
    }

    /// Execute a POST request with a JSON body.
    async fn post<B: serde::Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> SyftResult<T> {
        let url = self.url(path)?;
        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    /// Process an HTTP response, returning the deserialized body or an error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        resp: reqwest::Response,
    ) -> SyftResult<T> {
        let status = resp.status();
        if status.is_success() {
            let bytes = resp.bytes().await?;
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            let message = resp.text().await.unwrap_or_default();
            Err(SyftError::Api {
                status: status.as_u16(),
                message,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// SyftClient
// ---------------------------------------------------------------------------

/// HTTP client for the search service.
///
/// ```rust,no_run
/// use syft::client::{SearchTransport, SyftClient};
/// use syft::model::{SearchQuery, SearchRequestPayload};
///
/// # async fn example() -> Result<(), syft::SyftError> {
/// let client = SyftClient::builder("http://127.0.0.1:5000").build()?;
/// let payload = SearchRequestPayload::new(
///     "data:audio/mpeg;base64,AAAA".into(),
///     &SearchQuery::new("keywords"),
/// );
/// let response = client.submit(&payload).await?;
/// println!("{} matches", response.matches.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SyftClient {
    inner: Arc<ClientInner>,
}

impl SyftClient {
    /// Start building a new client.
    pub fn builder(base_url: &str) -> SyftClientBuilder {
        SyftClientBuilder {
            base_url: base_url.to_string(),
            timeout_secs: 30,
        }
    }

    /// Build a client from the `[client]` configuration section.
    pub fn from_config(config: &ClientConfig) -> SyftResult<Self> {
        Self::builder(&config.base_url)
            .timeout(config.timeout_secs)
            .build()
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Check whether the search service answers its test route.
    pub async fn ping(&self) -> SyftResult<bool> {
        let resp = self.inner.http.get(self.inner.url(PING_PATH)?).send().await?;
        Ok(resp.status().is_success())
    }
}

#[async_trait]
impl SearchTransport for SyftClient {
    async fn submit(&self, payload: &SearchRequestPayload) -> SyftResult<SearchResponse> {
        tracing::debug!(
            url = %self.inner.base_url,
            query = %payload.query,
            is_context_search = payload.is_context_search,
            "submitting search"
        );
        self.inner.post(SEARCH_PATH, payload).await
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Builder for [`SyftClient`].
pub struct SyftClientBuilder {
    base_url: String,
    timeout_secs: u64,
}

impl SyftClientBuilder {
    /// Set the request timeout in seconds (default: 30).
    pub fn timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Build the client.
    pub fn build(self) -> SyftResult<SyftClient> {
        let mut base_url: Url = self
            .base_url
            .parse()
            .map_err(|e: url::ParseError| SyftError::Config(e.to_string()))?;

        // Relative joins only keep the last path segment when it ends in '/'.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(self.timeout_secs))
            .build()?;

        Ok(SyftClient {
            inner: Arc::new(ClientInner { http, base_url }),
        })
    }
}
