//! Per-family source candidate lists.
//!
//! Each document family has an ordered, data-driven list of URL candidates.
//! The preferred format's candidates are tried first; the fetcher walks the
//! list until one succeeds.

use crate::config::ServerConfig;
use crate::document::{DocumentId, Family};

use super::SourceFormat;

/// One source URL to try, with the format its body will be in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Fully-formed URL.
    pub url: String,
    /// Body format served at this URL.
    pub format: SourceFormat,
}

impl Candidate {
    fn new(url: String, format: SourceFormat) -> Self {
        Self { url, format }
    }
}

/// Builds the candidate list for an RFC or draft identifier.
///
/// Spec-family documents have their single canonical URL in the catalog
/// table; the spec catalog passes it to the fetcher directly.
#[must_use]
pub fn candidates_for(
    id: &DocumentId,
    preferred: SourceFormat,
    config: &ServerConfig,
) -> Vec<Candidate> {
    let name = &id.name;
    let mut list = match id.family {
        Family::Rfc => vec![
            Candidate::new(
                format!("{}/rfc/{name}.html", config.rfc_editor_base),
                SourceFormat::Html,
            ),
            Candidate::new(
                format!("{}/rfc/{name}.txt", config.rfc_editor_base),
                SourceFormat::Text,
            ),
            // Alternate mirror for older documents.
            Candidate::new(
                format!("{}/rfc/{name}.txt", config.ietf_base),
                SourceFormat::Text,
            ),
        ],
        Family::Draft => vec![
            Candidate::new(
                format!("{}/doc/html/{name}", config.datatracker_base),
                SourceFormat::Html,
            ),
            Candidate::new(
                format!("{}/doc/txt/{name}.txt", config.datatracker_base),
                SourceFormat::Text,
            ),
        ],
        Family::Spec => Vec::new(),
    };

    // Stable reorder: preferred-format candidates first, original order kept
    // within each group.
    list.sort_by_key(|c| c.format != preferred);
    list
}
