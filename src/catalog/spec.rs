//! Foundation specification catalog service.
//!
//! Unlike RFCs and drafts there is no upstream index for this family: the
//! catalog is a built-in table of well-known specifications from OpenID,
//! W3C, and OASIS, each with its canonical HTML source URL. Lookup is
//! case-insensitive with punctuation and whitespace folded to dashes, so
//! `"OpenID Connect Core"` and `openid-connect-core` name the same entry.

use std::sync::Arc;

use tracing::info;

use crate::cache::DocumentCache;
use crate::document::{DocumentId, DocumentSummary, Family, ParsedDocument, Section};
use crate::error::{Error, Result};
use crate::fetch::{Candidate, Fetcher, SourceFormat};
use crate::normalize;

use super::{validate_limit, validate_query};

/// One built-in catalog entry.
struct SpecEntry {
    /// Canonical key, also the resource name under `spec://`.
    name: &'static str,
    title: &'static str,
    publisher: &'static str,
    url: &'static str,
    /// Additional keys that fold to this entry.
    aliases: &'static [&'static str],
}

const SPECS: &[SpecEntry] = &[
    SpecEntry {
        name: "openid-connect-core",
        title: "OpenID Connect Core 1.0",
        publisher: "OpenID Foundation",
        url: "https://openid.net/specs/openid-connect-core-1_0.html",
        aliases: &["oidc-core", "openid-connect"],
    },
    SpecEntry {
        name: "openid-connect-discovery",
        title: "OpenID Connect Discovery 1.0",
        publisher: "OpenID Foundation",
        url: "https://openid.net/specs/openid-connect-discovery-1_0.html",
        aliases: &["oidc-discovery"],
    },
    SpecEntry {
        name: "openid-connect-registration",
        title: "OpenID Connect Dynamic Client Registration 1.0",
        publisher: "OpenID Foundation",
        url: "https://openid.net/specs/openid-connect-registration-1_0.html",
        aliases: &["oidc-registration", "openid-connect-dynamic-client-registration"],
    },
    SpecEntry {
        name: "webauthn",
        title: "Web Authentication: An API for accessing Public Key Credentials",
        publisher: "W3C",
        url: "https://www.w3.org/TR/webauthn-2/",
        aliases: &["web-authentication"],
    },
    SpecEntry {
        name: "did-core",
        title: "Decentralized Identifiers (DIDs) v1.0",
        publisher: "W3C",
        url: "https://www.w3.org/TR/did-core/",
        aliases: &["dids", "decentralized-identifiers"],
    },
    SpecEntry {
        name: "vc-data-model",
        title: "Verifiable Credentials Data Model v1.1",
        publisher: "W3C",
        url: "https://www.w3.org/TR/vc-data-model/",
        aliases: &["verifiable-credentials"],
    },
    SpecEntry {
        name: "saml2-tech-overview",
        title: "Security Assertion Markup Language (SAML) V2.0 Technical Overview",
        publisher: "OASIS",
        url: "https://docs.oasis-open.org/security/saml/Post2.0/sstc-saml-tech-overview-2.0.html",
        aliases: &["saml", "saml2"],
    },
];

/// Folds a user-supplied key into canonical form: lowercase, runs of
/// non-alphanumeric characters collapsed to single dashes.
fn fold_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.trim().chars() {
        if ch.is_ascii_alphanumeric() {
            out.extend(ch.to_lowercase());
        } else if !out.ends_with('-') {
            out.push('-');
        }
    }
    out.trim_matches('-').to_string()
}

fn entry_for(key: &str) -> Result<&'static SpecEntry> {
    let folded = fold_key(key);
    SPECS
        .iter()
        .find(|entry| entry.name == folded || entry.aliases.contains(&folded.as_str()))
        .ok_or_else(|| Error::NotFound(format!("unknown specification {key:?}")))
}

/// Operations over the foundation specification family.
pub struct SpecCatalog {
    cache: Arc<DocumentCache>,
    fetcher: Arc<Fetcher>,
}

impl SpecCatalog {
    /// Creates the service over shared components.
    #[must_use]
    pub const fn new(cache: Arc<DocumentCache>, fetcher: Arc<Fetcher>) -> Self {
        Self { cache, fetcher }
    }

    /// Fetches and parses a catalog specification by key or alias.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] for a key outside the catalog, [`Error::Fetch`]
    /// when the canonical source is unavailable.
    pub async fn get(&self, key: &str) -> Result<Arc<ParsedDocument>> {
        let entry = entry_for(key)?;
        let id = DocumentId::new(Family::Spec, entry.name);
        info!(%id, "spec get");
        self.cache
            .get_or_load(&id, || async {
                let candidates = [Candidate {
                    url: entry.url.to_string(),
                    format: SourceFormat::Html,
                }];
                let raw = self.fetcher.fetch_candidates(&id, &candidates).await?;
                let mut doc = normalize::parse(&raw, &id)?;
                if doc.metadata.title.is_none() {
                    doc.metadata.title = Some(entry.title.to_string());
                }
                doc.metadata.status = Some(entry.publisher.to_string());
                Ok(doc)
            })
            .await
    }

    /// Keyword search over the built-in catalog, ranked by how many query
    /// terms an entry's name, title, or publisher contain.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] for an empty query or zero limit.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<DocumentSummary>> {
        let query = validate_query(query)?;
        let limit = validate_limit(limit)?;
        info!(query, limit, "spec search");

        let terms: Vec<String> = query
            .to_lowercase()
            .split_whitespace()
            .map(String::from)
            .collect();

        let mut scored: Vec<(usize, &SpecEntry)> = SPECS
            .iter()
            .filter_map(|entry| {
                let haystack =
                    format!("{} {} {}", entry.name, entry.title, entry.publisher).to_lowercase();
                let score = terms
                    .iter()
                    .filter(|term| haystack.contains(term.as_str()))
                    .count();
                (score > 0).then_some((score, entry))
            })
            .collect();
        scored.sort_by(|a, b| b.0.cmp(&a.0));

        Ok(scored
            .into_iter()
            .take(limit)
            .map(|(_, entry)| DocumentSummary {
                number: None,
                name: entry.name.to_string(),
                title: entry.title.to_string(),
                authors: Vec::new(),
                date: None,
                status: Some(entry.publisher.to_string()),
                abstract_text: None,
                url: entry.url.to_string(),
                version: None,
                working_group: None,
                states: Vec::new(),
            })
            .collect())
    }

    /// Extracts one section of a specification by title or label.
    ///
    /// # Errors
    ///
    /// [`Error::NotFound`] when the key is unknown or no section matches.
    pub async fn section(&self, key: &str, query: &str) -> Result<Section> {
        let query = validate_query(query)?;
        let doc = self.get(key).await?;
        super::find_section(&doc.sections, query)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("no section matching {query:?} in {key}")))
    }
}
