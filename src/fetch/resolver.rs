//! Identifier resolution.
//!
//! Turns user-supplied names into canonical, version-specific
//! [`DocumentId`]s. RFC numbers are validated locally; versionless draft
//! names cost one index lookup to infer the latest version. Resolution never
//! fetches the document body.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::{DocumentId, Family};
use crate::error::{Error, Result};
use crate::normalize::metadata::extract_version;

use super::index::IndexClient;

/// How many index entries to scan when inferring the latest draft version.
const VERSION_SCAN_LIMIT: usize = 50;

/// Resolves raw names to canonical identifiers.
pub struct Resolver {
    index: Arc<IndexClient>,
}

impl Resolver {
    /// Creates a resolver over the shared index client.
    #[must_use]
    pub const fn new(index: Arc<IndexClient>) -> Self {
        Self { index }
    }

    /// Validates an RFC number and produces its canonical identifier.
    ///
    /// Accepts a bare number (`2616`) or an `rfc`-prefixed name (`rfc2616`,
    /// case-insensitive). Leading zeros are normalized away.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for anything that is not a positive
    /// integer.
    pub fn resolve_rfc(raw: &str) -> Result<DocumentId> {
        let trimmed = raw.trim();
        let digits = trimmed
            .strip_prefix("rfc")
            .or_else(|| trimmed.strip_prefix("RFC"))
            .unwrap_or(trimmed);
        let number: u64 = digits.parse().map_err(|_| {
            Error::Validation(format!("RFC number must be a positive integer, got {raw:?}"))
        })?;
        if number == 0 {
            return Err(Error::Validation(
                "RFC number must be a positive integer, got 0".to_string(),
            ));
        }
        Ok(DocumentId::new(Family::Rfc, format!("rfc{number}")))
    }

    /// Resolves a draft name to a concrete version.
    ///
    /// A trailing `.txt` is tolerated. Names already carrying a version
    /// suffix pass through unchanged (the fetch may still 404 later);
    /// versionless base names are resolved against the document index to
    /// the numerically highest known version.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] for an empty name and
    /// [`Error::NotFound`] when the index knows no versions of the base name.
    pub async fn resolve_draft(&self, raw: &str) -> Result<DocumentId> {
        let name = raw.trim().trim_end_matches(".txt");
        if name.is_empty() {
            return Err(Error::Validation("draft name must not be empty".to_string()));
        }

        if let Some(version) = extract_version(name) {
            return Ok(DocumentId {
                family: Family::Draft,
                name: name.to_string(),
                version: Some(version),
            });
        }

        debug!(base = name, "no version suffix, inferring latest from index");
        self.latest_version(name).await
    }

    /// Scans the index for all versions of `base` and picks the highest.
    ///
    /// Version comparison is numeric, so `-07` and `-7` are the same
    /// version; such textual duplicates are logged and the first-seen name
    /// is kept.
    async fn latest_version(&self, base: &str) -> Result<DocumentId> {
        let docs = self.index.drafts_by_prefix(base, VERSION_SCAN_LIMIT).await?;

        let mut best: Option<(u32, String)> = None;
        for doc in &docs {
            let Some(version) = version_of(base, &doc.name) else {
                continue;
            };
            match &best {
                Some((current, kept)) if *current == version => {
                    warn!(
                        base,
                        version,
                        kept = %kept,
                        duplicate = %doc.name,
                        "numerically equal version suffixes in index, keeping first"
                    );
                }
                Some((current, _)) if *current > version => {}
                _ => best = Some((version, doc.name.clone())),
            }
        }

        match best {
            Some((version, name)) => Ok(DocumentId {
                family: Family::Draft,
                name,
                version: Some(version),
            }),
            None => Err(Error::NotFound(format!(
                "no versions of {base} in the document index"
            ))),
        }
    }
}

/// Extracts the version of `name` when it is exactly `base` plus a numeric
/// suffix. Prefix matches of longer draft names are not versions of `base`.
fn version_of(base: &str, name: &str) -> Option<u32> {
    let suffix = name.strip_prefix(base)?.strip_prefix('-')?;
    if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    suffix.parse().ok()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::super::client::FakeHttpClient;
    use super::*;
    use crate::config::ServerConfig;

    fn resolver(fake: FakeHttpClient) -> Resolver {
        Resolver::new(Arc::new(IndexClient::new(
            Arc::new(fake),
            &ServerConfig::default(),
        )))
    }

    #[test]
    fn test_rfc_number_validation() {
        assert_eq!(Resolver::resolve_rfc("2616").unwrap().name, "rfc2616");
        assert_eq!(Resolver::resolve_rfc("rfc9110").unwrap().name, "rfc9110");
        assert_eq!(Resolver::resolve_rfc("0791").unwrap().name, "rfc791");
        assert!(matches!(
            Resolver::resolve_rfc("http2"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Resolver::resolve_rfc("-5"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            Resolver::resolve_rfc("0"),
            Err(Error::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_versioned_draft_passes_through() {
        let r = resolver(FakeHttpClient::new());
        let id = r
            .resolve_draft("draft-ietf-httpbis-http2-17")
            .await
            .unwrap();
        assert_eq!(id.name, "draft-ietf-httpbis-http2-17");
        assert_eq!(id.version, Some(17));
        // No index call was needed.
    }

    #[tokio::test]
    async fn test_txt_suffix_trimmed() {
        let r = resolver(FakeHttpClient::new());
        let id = r
            .resolve_draft("draft-ietf-httpbis-http2-17.txt")
            .await
            .unwrap();
        assert_eq!(id.name, "draft-ietf-httpbis-http2-17");
    }

    #[tokio::test]
    async fn test_latest_version_inference() {
        let body = r#"{"objects":[
            {"name":"draft-ietf-httpbis-http2-15"},
            {"name":"draft-ietf-httpbis-http2-17"},
            {"name":"draft-ietf-httpbis-http2-16"},
            {"name":"draft-ietf-httpbis-http2-extended-03"}
        ]}"#;
        let fake = FakeHttpClient::new().route("name__startswith=draft-ietf-httpbis-http2", 200, body);
        let r = resolver(fake);
        let id = r.resolve_draft("draft-ietf-httpbis-http2").await.unwrap();
        assert_eq!(id.name, "draft-ietf-httpbis-http2-17");
        assert_eq!(id.version, Some(17));
    }

    #[tokio::test]
    async fn test_unknown_base_is_not_found() {
        let fake = FakeHttpClient::new().route("name__startswith=", 200, r#"{"objects":[]}"#);
        let r = resolver(fake);
        let err = r.resolve_draft("draft-nobody-nothing").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_version_of_rejects_longer_names() {
        assert_eq!(version_of("draft-a-b", "draft-a-b-07"), Some(7));
        assert_eq!(version_of("draft-a-b", "draft-a-b-extended-07"), None);
        assert_eq!(version_of("draft-a-b", "draft-a-b"), None);
    }
}
