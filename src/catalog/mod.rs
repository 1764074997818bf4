//! Per-family catalog services.
//!
//! One service per document family composes the resolver, fetcher,
//! normalizer, and cache into the public operations (`get`, `search`,
//! `section`, and the draft family's working-group listing). Services hold
//! no document state; everything lives in the shared cache.
//!
//! This module carries the helpers the families share: input validation,
//! section lookup, fallback ranking, and index-entry summarization.

pub mod draft;
pub mod rfc;
pub mod spec;

pub use draft::DraftCatalog;
pub use rfc::RfcCatalog;
pub use spec::SpecCatalog;

use crate::config::ServerConfig;
use crate::document::{DocumentSummary, Section};
use crate::error::{Error, Result};
use crate::fetch::index::IndexDoc;
use crate::normalize::metadata::{extract_version, extract_working_group};

/// How many index entries the local fallback ranking scans.
pub(crate) const FALLBACK_SCAN_LIMIT: usize = 100;

/// Rejects empty or whitespace-only queries.
pub(crate) fn validate_query(query: &str) -> Result<&str> {
    let trimmed = query.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("query must not be empty".to_string()));
    }
    Ok(trimmed)
}

/// Rejects non-positive result limits.
pub(crate) fn validate_limit(limit: usize) -> Result<usize> {
    if limit == 0 {
        return Err(Error::Validation("limit must be at least 1".to_string()));
    }
    Ok(limit)
}

/// Finds a section in the tree by query, first match wins.
///
/// Precedence: exact title (case-insensitive), then numeric/lettered label,
/// then title prefix, then title substring. Trailing dots on labels are
/// ignored, so `"2.1"` matches a section labeled `2.1.`.
#[must_use]
pub fn find_section<'a>(sections: &'a [Section], query: &str) -> Option<&'a Section> {
    fn flatten<'a>(sections: &'a [Section], out: &mut Vec<&'a Section>) {
        for section in sections {
            out.push(section);
            flatten(&section.children, out);
        }
    }

    let mut flat = Vec::new();
    flatten(sections, &mut flat);

    let needle = query.trim().to_lowercase();
    let label_needle = needle.trim_end_matches('.');

    flat.iter()
        .find(|s| s.title.to_lowercase() == needle)
        .or_else(|| {
            flat.iter().find(|s| {
                s.label
                    .as_deref()
                    .is_some_and(|l| l.trim_end_matches('.').eq_ignore_ascii_case(label_needle))
            })
        })
        .or_else(|| {
            flat.iter()
                .find(|s| s.title.to_lowercase().starts_with(&needle))
        })
        .or_else(|| flat.iter().find(|s| s.title.to_lowercase().contains(&needle)))
        .copied()
}

/// Ranks index entries by how many query terms their name or title contain.
/// Entries matching no term are dropped; ties keep index order.
pub(crate) fn rank_by_title_matches(docs: Vec<IndexDoc>, query: &str) -> Vec<IndexDoc> {
    let terms: Vec<String> = query
        .to_lowercase()
        .split_whitespace()
        .map(String::from)
        .collect();

    let mut scored: Vec<(usize, IndexDoc)> = docs
        .into_iter()
        .filter_map(|doc| {
            let haystack = format!("{} {}", doc.name, doc.title).to_lowercase();
            let score = terms
                .iter()
                .filter(|term| haystack.contains(term.as_str()))
                .count();
            (score > 0).then_some((score, doc))
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, doc)| doc).collect()
}

/// Summarizes an RFC index entry, linking to its RFC editor info page.
pub(crate) fn rfc_summary(doc: &IndexDoc, config: &ServerConfig) -> DocumentSummary {
    DocumentSummary {
        number: doc.name.strip_prefix("rfc").map(String::from),
        name: doc.name.clone(),
        title: doc.title.clone(),
        authors: doc.author_names(),
        date: doc.time.clone(),
        status: doc.intended_std_level.clone(),
        abstract_text: doc.abstract_text.clone(),
        url: format!("{}/info/{}", config.rfc_editor_base, doc.name),
        version: None,
        working_group: None,
        states: Vec::new(),
    }
}

/// Summarizes a draft index entry, linking to its datatracker page.
pub(crate) fn draft_summary(doc: &IndexDoc, config: &ServerConfig) -> DocumentSummary {
    DocumentSummary {
        number: None,
        name: doc.name.clone(),
        title: doc.title.clone(),
        authors: doc.author_names(),
        date: doc.time.clone(),
        status: doc.intended_std_level.clone(),
        abstract_text: doc.abstract_text.clone(),
        url: format!("{}/doc/{}/", config.datatracker_base, doc.name),
        version: extract_version(&doc.name),
        working_group: extract_working_group(&doc.name),
        states: doc.state_names(),
    }
}
