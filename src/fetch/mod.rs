//! Source fetching: multi-candidate retrieval with fallback.
//!
//! A fetch walks an ordered candidate list (HTML variant, TXT variant,
//! alternate mirror) and short-circuits on the first 200 response with a
//! non-empty body. Every candidate gets its own timeout; a timeout, non-2xx
//! status, or transport error advances to the next candidate instead of
//! aborting. Exhausting the list classifies the failure: all-404 means the
//! document does not exist, anything else is a network failure the caller
//! may retry later.

pub mod candidates;
pub mod client;
pub mod index;
pub mod resolver;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::ServerConfig;
use crate::document::DocumentId;
use crate::error::{Error, FetchFailure, Result};

pub use candidates::{Candidate, candidates_for};
pub use client::{HttpClient, HttpResponse, ReqwestClient};

/// Body format of a fetched document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    /// Rendered HTML page.
    Html,
    /// Plain-text rendering.
    Text,
}

/// Raw fetched document: body, detected format, and the URL that served it.
#[derive(Debug, Clone)]
pub struct RawDocument {
    /// Response body.
    pub body: String,
    /// Format of the winning candidate.
    pub format: SourceFormat,
    /// Effective source URL.
    pub url: String,
}

/// Fetches documents through the per-family candidate lists.
pub struct Fetcher {
    http: Arc<dyn HttpClient>,
    config: ServerConfig,
}

impl Fetcher {
    /// Creates a fetcher over a shared HTTP client.
    #[must_use]
    pub fn new(http: Arc<dyn HttpClient>, config: ServerConfig) -> Self {
        Self { http, config }
    }

    /// Fetches a resolved identifier using its family's candidate list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Fetch`] after all candidates fail, classified as
    /// `NotFound` when every failure was a 404-class status.
    pub async fn fetch(&self, id: &DocumentId, preferred: SourceFormat) -> Result<RawDocument> {
        let list = candidates_for(id, preferred, &self.config);
        self.fetch_candidates(id, &list).await
    }

    /// Fetches from an explicit candidate list (used by the spec catalog,
    /// whose URLs live in its own table).
    pub async fn fetch_candidates(
        &self,
        id: &DocumentId,
        list: &[Candidate],
    ) -> Result<RawDocument> {
        if list.is_empty() {
            return Err(Error::fetch(
                FetchFailure::NotFound,
                format!("no source candidates for {id}"),
            ));
        }

        let mut all_not_found = true;
        let mut last_source: Option<Box<dyn std::error::Error + Send + Sync>> = None;

        for candidate in list {
            let attempt =
                tokio::time::timeout(self.config.fetch_timeout, self.http.get(&candidate.url, &[]))
                    .await;
            match attempt {
                Ok(Ok(response)) if (200..300).contains(&response.status) => {
                    if response.body.trim().is_empty() {
                        debug!(url = %candidate.url, "candidate returned empty body, advancing");
                        all_not_found = false;
                        continue;
                    }
                    debug!(url = %candidate.url, status = response.status, "fetch succeeded");
                    return Ok(RawDocument {
                        body: response.body,
                        format: candidate.format,
                        url: candidate.url.clone(),
                    });
                }
                Ok(Ok(response)) => {
                    debug!(url = %candidate.url, status = response.status, "candidate failed, advancing");
                    if !matches!(response.status, 404 | 410) {
                        all_not_found = false;
                    }
                }
                Ok(Err(err)) => {
                    warn!(url = %candidate.url, error = %err, "candidate errored, advancing");
                    all_not_found = false;
                    if let Error::Fetch {
                        source: Some(source),
                        ..
                    } = err
                    {
                        last_source = Some(source);
                    }
                }
                Err(_elapsed) => {
                    warn!(url = %candidate.url, "candidate timed out, advancing");
                    all_not_found = false;
                }
            }
        }

        let kind = if all_not_found {
            FetchFailure::NotFound
        } else {
            FetchFailure::NetworkFailure
        };
        Err(Error::Fetch {
            kind,
            message: format!("all {} source candidates failed for {id}", list.len()),
            source: last_source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::client::FakeHttpClient;
    use super::*;
    use crate::document::Family;

    fn fetcher(fake: FakeHttpClient) -> Fetcher {
        Fetcher::new(Arc::new(fake), ServerConfig::default())
    }

    fn rfc(n: &str) -> DocumentId {
        DocumentId::new(Family::Rfc, format!("rfc{n}"))
    }

    #[tokio::test]
    async fn test_first_candidate_wins() {
        let fake = FakeHttpClient::new().route("/rfc/rfc2616.txt", 200, "RFC body");
        let f = fetcher(fake);
        let raw = f.fetch(&rfc("2616"), SourceFormat::Text).await.unwrap();
        assert_eq!(raw.format, SourceFormat::Text);
        assert!(raw.url.ends_with("/rfc/rfc2616.txt"));
        assert_eq!(raw.body, "RFC body");
    }

    #[tokio::test]
    async fn test_fallback_past_server_error() {
        // First candidate (HTML) 500s, second (TXT) succeeds: the fetch
        // reports the second candidate's URL and content.
        let fake = FakeHttpClient::new()
            .route("/rfc/rfc2616.html", 500, "oops")
            .route("rfc-editor.org/rfc/rfc2616.txt", 200, "text body");
        let f = fetcher(fake);
        let raw = f.fetch(&rfc("2616"), SourceFormat::Html).await.unwrap();
        assert_eq!(raw.format, SourceFormat::Text);
        assert!(raw.url.contains("rfc-editor.org/rfc/rfc2616.txt"));
        assert_eq!(raw.body, "text body");
    }

    #[tokio::test]
    async fn test_all_404_classifies_not_found() {
        let f = fetcher(FakeHttpClient::new());
        let err = f.fetch(&rfc("999999999"), SourceFormat::Text).await.unwrap_err();
        assert_eq!(err.kind(), "fetch_not_found");
    }

    #[tokio::test]
    async fn test_mixed_failures_classify_network() {
        let fake = FakeHttpClient::new().route("/rfc/rfc1.html", 503, "down");
        let f = fetcher(fake);
        let err = f.fetch(&rfc("1"), SourceFormat::Html).await.unwrap_err();
        assert_eq!(err.kind(), "fetch_network_failure");
    }

    #[tokio::test]
    async fn test_empty_body_is_not_success() {
        let fake = FakeHttpClient::new()
            .route("/rfc/rfc2.txt", 200, "   ")
            .route("/rfc/rfc2.html", 200, "<html><body>real</body></html>");
        let f = fetcher(fake);
        let raw = f.fetch(&rfc("2"), SourceFormat::Text).await.unwrap();
        assert_eq!(raw.format, SourceFormat::Html);
    }
}
