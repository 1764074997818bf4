//! Internet Draft catalog service.
//!
//! Adds two family-specific behaviors on top of the uniform operations:
//! search tries an exact-name lookup first when the query is itself a draft
//! name, and the working-group listing filters drafts to active status.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::DocumentCache;
use crate::config::ServerConfig;
use crate::document::{
    DocumentSummary, ParsedDocument, Section, WorkingGroupDocuments, WorkingGroupInfo,
    WorkingGroupSummary,
};
use crate::error::{Error, Result};
use crate::fetch::index::IndexClient;
use crate::fetch::resolver::Resolver;
use crate::fetch::{Fetcher, SourceFormat};
use crate::normalize;

use super::{draft_summary, rfc_summary, validate_limit, validate_query};

/// Operations over the Internet Draft document family.
pub struct DraftCatalog {
    cache: Arc<DocumentCache>,
    fetcher: Arc<Fetcher>,
    index: Arc<IndexClient>,
    resolver: Resolver,
    config: ServerConfig,
}

impl DraftCatalog {
    /// Creates the service over shared components.
    #[must_use]
    pub fn new(
        cache: Arc<DocumentCache>,
        fetcher: Arc<Fetcher>,
        index: Arc<IndexClient>,
        config: ServerConfig,
    ) -> Self {
        Self {
            cache,
            fetcher,
            resolver: Resolver::new(index.clone()),
            index,
            config,
        }
    }

    /// Fetches and parses a draft, resolving a versionless name to its
    /// latest version first. Repeats are served from the cache.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when a versionless base name has no known
    /// versions, [`Error::Fetch`] when every source candidate fails.
    pub async fn get(&self, name: &str) -> Result<Arc<ParsedDocument>> {
        let id = self.resolver.resolve_draft(name).await?;
        info!(%id, "draft get");
        self.cache
            .get_or_load(&id, || async {
                let raw = self.fetcher.fetch(&id, SourceFormat::Text).await?;
                normalize::parse(&raw, &id)
            })
            .await
    }

    /// Keyword search over drafts.
    ///
    /// A query that is itself a draft name gets an exact index lookup
    /// first; the general name search runs only when that yields nothing.
    /// A failed name search degrades to a title search. Duplicates are
    /// removed preserving order.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty query or zero limit.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentSummary>> {
        let query = validate_query(query)?;
        let limit = validate_limit(limit)?;
        info!(query, limit, "draft search");

        let mut results: Vec<DocumentSummary> = Vec::new();

        if query.starts_with("draft-") {
            debug!("query looks like a draft name, trying exact lookup first");
            let exact_name = query.trim_end_matches(".txt");
            match self.index.document_by_name(exact_name).await {
                Ok(Some(doc)) => results.push(draft_summary(&doc, &self.config)),
                Ok(None) => {}
                Err(err) => debug!(error = %err, "exact lookup failed, continuing"),
            }
        }

        if results.is_empty() {
            let docs = match self.index.search_drafts_by_name(query, limit).await {
                Ok(docs) => docs,
                Err(err) => {
                    warn!(error = %err, "name search failed, trying title search");
                    self.index.search_drafts_by_title(query, limit).await?
                }
            };
            results.extend(docs.iter().map(|doc| draft_summary(doc, &self.config)));
        }

        let mut seen = HashSet::new();
        results.retain(|summary| seen.insert(summary.name.clone()));
        results.truncate(limit);
        Ok(results)
    }

    /// Extracts one section of a draft by title or label.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no section matches the query.
    pub async fn section(&self, name: &str, query: &str) -> Result<Section> {
        let query = validate_query(query)?;
        let doc = self.get(name).await?;
        super::find_section(&doc.sections, query)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no section matching {query:?} in {name}")))
    }

    /// Lists a working group's RFCs and active drafts with group metadata.
    ///
    /// Document lookups are best-effort: a failing partition is returned
    /// empty rather than failing the whole listing, and a missing group
    /// index entry degrades to a placeholder info block.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty group name or zero limit.
    pub async fn working_group(
        &self,
        group: &str,
        include_rfcs: bool,
        include_drafts: bool,
        limit_per_type: usize,
    ) -> Result<WorkingGroupDocuments> {
        let group = validate_query(group)?;
        let limit = validate_limit(limit_per_type)?;
        info!(group, include_rfcs, include_drafts, limit, "working group listing");

        let info = match self.index.group_by_acronym(group).await {
            Ok(Some(entry)) => WorkingGroupInfo {
                name: entry.name,
                acronym: entry.acronym,
                description: entry.description,
                state: entry.state.unwrap_or_default(),
                group_type: entry.group_type.unwrap_or_default(),
            },
            Ok(None) => {
                warn!(group, "no group index entry, using placeholder info");
                WorkingGroupInfo::unknown(group)
            }
            Err(err) => {
                warn!(group, error = %err, "group index unreachable, using placeholder info");
                WorkingGroupInfo::unknown(group)
            }
        };

        // Over-fetch so active-status filtering still fills the limit.
        let scan = limit.saturating_mul(2);

        let mut rfcs = Vec::new();
        if include_rfcs {
            match self.index.rfcs_by_name_fragment(group, scan).await {
                Ok(docs) => {
                    rfcs.extend(docs.iter().take(limit).map(|doc| {
                        let mut summary = rfc_summary(doc, &self.config);
                        summary.working_group = Some(group.to_string());
                        summary
                    }));
                }
                Err(err) => warn!(group, error = %err, "rfc listing failed"),
            }
        }

        let mut drafts = Vec::new();
        if include_drafts {
            let fragment = format!("ietf-{group}");
            match self.index.search_drafts_by_name(&fragment, scan).await {
                Ok(docs) => {
                    drafts.extend(
                        docs.iter()
                            .filter(|doc| doc.is_active())
                            .take(limit)
                            .map(|doc| {
                                let mut summary = draft_summary(doc, &self.config);
                                summary.working_group = Some(group.to_string());
                                summary
                            }),
                    );
                }
                Err(err) => warn!(group, error = %err, "draft listing failed"),
            }
        }

        let summary = WorkingGroupSummary {
            total_rfcs: rfcs.len(),
            total_drafts: drafts.len(),
            total_documents: rfcs.len() + drafts.len(),
        };
        Ok(WorkingGroupDocuments {
            working_group: group.to_string(),
            working_group_info: info,
            rfcs,
            internet_drafts: drafts,
            summary,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::fetch::client::FakeHttpClient;

    const DRAFT_TEXT: &str = "\
Internet-Draft: An Example Extension
Authors: A. Author

Abstract

   Extension abstract.

1.  Introduction

   Intro body.
";

    fn catalog(fake: FakeHttpClient) -> DraftCatalog {
        let config = ServerConfig::default();
        let http = Arc::new(fake);
        DraftCatalog::new(
            Arc::new(DocumentCache::new(&config)),
            Arc::new(Fetcher::new(http.clone(), config.clone())),
            Arc::new(IndexClient::new(http, &config)),
            config,
        )
    }

    #[tokio::test]
    async fn test_get_versioned_draft() {
        let fake = FakeHttpClient::new().route("/doc/txt/draft-ietf-example-ext-03.txt", 200, DRAFT_TEXT);
        let c = catalog(fake);

        let doc = c.get("draft-ietf-example-ext-03").await.unwrap();
        assert_eq!(doc.metadata.title.as_deref(), Some("An Example Extension"));
        assert_eq!(doc.metadata.version, Some(3));
        assert_eq!(doc.metadata.working_group.as_deref(), Some("example"));
    }

    #[tokio::test]
    async fn test_get_versionless_resolves_latest() {
        let index = r#"{"objects":[
            {"name":"draft-ietf-example-ext-02"},
            {"name":"draft-ietf-example-ext-03"}
        ]}"#;
        let fake = FakeHttpClient::new()
            .route("name__startswith=draft-ietf-example-ext", 200, index)
            .route("/doc/txt/draft-ietf-example-ext-03.txt", 200, DRAFT_TEXT);
        let c = catalog(fake);

        let doc = c.get("draft-ietf-example-ext").await.unwrap();
        assert_eq!(doc.metadata.version, Some(3));
    }

    #[tokio::test]
    async fn test_search_exact_name_fast_path() {
        let exact = r#"{"name":"draft-ietf-quic-http-34","title":"HTTP/3","time":"2021-02-02"}"#;
        let fake =
            FakeHttpClient::new().route("/api/v1/doc/document/draft-ietf-quic-http-34/", 200, exact);
        let c = catalog(fake);

        let results = c.search("draft-ietf-quic-http-34", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "HTTP/3");
        assert_eq!(results[0].version, Some(34));
    }

    #[tokio::test]
    async fn test_search_name_then_title_fallback() {
        let titled = r#"{"objects":[{"name":"draft-ietf-httpbis-safe-method-w-body-05","title":"HTTP QUERY Method"}]}"#;
        let fake = FakeHttpClient::new()
            .route("name__icontains=query method", 500, "down")
            .route("title__icontains=query method", 200, titled);
        let c = catalog(fake);

        let results = c.search("query method", 10).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "HTTP QUERY Method");
    }

    #[tokio::test]
    async fn test_working_group_filters_inactive_drafts() {
        let group = r#"{"objects":[{"name":"Web Authorization Protocol","acronym":"oauth","description":"OAuth","state":"active","type":"wg"}]}"#;
        let rfcs = r#"{"objects":[{"name":"rfc6749","title":"The OAuth 2.0 Authorization Framework"}]}"#;
        let drafts = r#"{"objects":[
            {"name":"draft-ietf-oauth-old-01","title":"Old","states":[{"name":"Expired"}]},
            {"name":"draft-ietf-oauth-new-02","title":"New","states":[{"name":"Active"}]}
        ]}"#;
        let fake = FakeHttpClient::new()
            .route("acronym=oauth", 200, group)
            .route("type=rfc", 200, rfcs)
            .route("name__icontains=ietf-oauth", 200, drafts);
        let c = catalog(fake);

        let listing = c.working_group("oauth", true, true, 50).await.unwrap();
        assert_eq!(listing.working_group_info.name, "Web Authorization Protocol");
        assert_eq!(listing.rfcs.len(), 1);
        assert_eq!(listing.rfcs[0].number.as_deref(), Some("6749"));
        assert_eq!(listing.internet_drafts.len(), 1);
        assert_eq!(listing.internet_drafts[0].name, "draft-ietf-oauth-new-02");
        assert_eq!(listing.summary.total_documents, 2);
    }

    #[tokio::test]
    async fn test_working_group_accepts_huge_limit() {
        // The over-fetch scan width must saturate instead of overflowing.
        let fake = FakeHttpClient::new()
            .route("acronym=oauth", 200, r#"{"objects":[]}"#)
            .route("/api/v1/doc/document/", 200, r#"{"objects":[]}"#);
        let c = catalog(fake);

        let listing = c.working_group("oauth", true, true, usize::MAX).await.unwrap();
        assert_eq!(listing.summary.total_documents, 0);
    }

    #[tokio::test]
    async fn test_working_group_placeholder_info() {
        // Group index knows nothing; listings come back empty but the call
        // still succeeds with a placeholder block.
        let fake = FakeHttpClient::new()
            .route("acronym=nosuchwg", 200, r#"{"objects":[]}"#)
            .route("/api/v1/doc/document/", 200, r#"{"objects":[]}"#);
        let c = catalog(fake);

        let listing = c.working_group("nosuchwg", true, true, 10).await.unwrap();
        assert_eq!(listing.working_group_info.state, "unknown");
        assert_eq!(listing.working_group_info.name, "NOSUCHWG");
        assert_eq!(listing.summary.total_documents, 0);
    }
}
