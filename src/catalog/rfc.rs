//! RFC catalog service.

use std::sync::Arc;

use tracing::{info, warn};

use crate::cache::DocumentCache;
use crate::config::ServerConfig;
use crate::document::{DocumentSummary, ParsedDocument, Section};
use crate::error::{Error, Result};
use crate::fetch::index::IndexClient;
use crate::fetch::resolver::Resolver;
use crate::fetch::{Fetcher, SourceFormat};
use crate::normalize;

use super::{FALLBACK_SCAN_LIMIT, rank_by_title_matches, rfc_summary, validate_limit, validate_query};

/// Operations over the RFC document family.
pub struct RfcCatalog {
    cache: Arc<DocumentCache>,
    fetcher: Arc<Fetcher>,
    index: Arc<IndexClient>,
    config: ServerConfig,
}

impl RfcCatalog {
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
            index,
            config,
        }
    }

    /// Fetches and parses an RFC by number, serving repeats from the cache.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for a non-numeric number, [`Error::Fetch`] when
    /// every source candidate fails.
    pub async fn get(&self, number: &str) -> Result<Arc<ParsedDocument>> {
        let id = Resolver::resolve_rfc(number)?;
        info!(%id, "rfc get");
        self.cache
            .get_or_load(&id, || async {
                let raw = self.fetcher.fetch(&id, SourceFormat::Text).await?;
                normalize::parse(&raw, &id)
            })
            .await
    }

    /// Keyword search over RFC titles via the document index, with a local
    /// ranking fallback when the index is unreachable.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty query or zero limit; fetch errors
    /// only when the fallback path also fails.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentSummary>> {
        let query = validate_query(query)?;
        let limit = validate_limit(limit)?;
        info!(query, limit, "rfc search");

        match self.index.search_rfcs_by_title(query, limit).await {
            Ok(docs) => Ok(docs
                .iter()
                .take(limit)
                .map(|doc| rfc_summary(doc, &self.config))
                .collect()),
            Err(err) => {
                warn!(error = %err, "index search failed, ranking a recent slice locally");
                let docs = self.index.recent_documents("rfc", FALLBACK_SCAN_LIMIT).await?;
                Ok(rank_by_title_matches(docs, query)
                    .iter()
                    .take(limit)
                    .map(|doc| rfc_summary(doc, &self.config))
                    .collect())
            }
        }
    }

    /// Extracts one section of an RFC by title or label.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when no section matches the query.
    pub async fn section(&self, number: &str, query: &str) -> Result<Section> {
        let query = validate_query(query)?;
        let doc = self.get(number).await?;
        super::find_section(&doc.sections, query)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no section matching {query:?} in rfc {number}")))
    }
}
