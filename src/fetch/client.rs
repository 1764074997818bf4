//! HTTP client seam.
//!
//! All upstream traffic goes through the [`HttpClient`] trait so the
//! fetcher, resolver, and index client can be exercised against canned
//! responses in tests. The production implementation wraps `reqwest` with
//! rustls, the configured per-request timeout, and the gateway User-Agent.

use async_trait::async_trait;

use crate::config::ServerConfig;
use crate::error::{Error, FetchFailure, Result};

/// A minimal HTTP response: status code and body text.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body decoded as UTF-8.
    pub body: String,
}

/// Outbound HTTP abstraction.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Performs a GET request with optional query parameters.
    ///
    /// # Errors
    ///
    /// Returns a network-failure fetch error for transport problems
    /// (connect/timeout/decode). Non-2xx statuses are returned as responses,
    /// not errors — the caller decides how to classify them.
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse>;
}

/// Production client backed by `reqwest`.
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Builds a client from the server configuration.
    ///
    /// # Errors
    ///
    /// Returns a network-failure error if the TLS backend cannot initialize.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.fetch_timeout)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| Error::Fetch {
                kind: FetchFailure::NetworkFailure,
                message: "failed to construct HTTP client".to_string(),
                source: Some(Box::new(e)),
            })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let response = self
            .client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| Error::Fetch {
                kind: FetchFailure::NetworkFailure,
                message: format!("request to {url} failed"),
                source: Some(Box::new(e)),
            })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| Error::Fetch {
            kind: FetchFailure::NetworkFailure,
            message: format!("failed to read body from {url}"),
            source: Some(Box::new(e)),
        })?;

        Ok(HttpResponse { status, body })
    }
}

/// Canned-response client for tests. Routes are matched by URL substring;
/// unmatched requests answer 404.
#[cfg(test)]
pub(crate) struct FakeHttpClient {
    routes: std::sync::Mutex<Vec<(String, HttpResponse)>>,
    /// URLs requested, in order.
    pub requests: std::sync::Mutex<Vec<String>>,
}

#[cfg(test)]
impl FakeHttpClient {
    pub(crate) fn new() -> Self {
        Self {
            routes: std::sync::Mutex::new(Vec::new()),
            requests: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn route(self, url_fragment: &str, status: u16, body: &str) -> Self {
        if let Ok(mut routes) = self.routes.lock() {
            routes.push((
                url_fragment.to_string(),
                HttpResponse {
                    status,
                    body: body.to_string(),
                },
            ));
        }
        self
    }

    pub(crate) fn request_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

#[cfg(test)]
#[async_trait]
impl HttpClient for FakeHttpClient {
    async fn get(&self, url: &str, query: &[(&str, &str)]) -> Result<HttpResponse> {
        let full = if query.is_empty() {
            url.to_string()
        } else {
            let qs: Vec<String> = query.iter().map(|(k, v)| format!("{k}={v}")).collect();
            format!("{url}?{}", qs.join("&"))
        };
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(full.clone());
        }
        let routes = self.routes.lock().map_err(|_| {
            Error::fetch(FetchFailure::NetworkFailure, "fake client poisoned")
        })?;
        for (fragment, response) in routes.iter() {
            if full.contains(fragment.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(HttpResponse {
            status: 404,
            body: String::new(),
        })
    }
}
