//! Core document data model.
//!
//! Typed representations of parsed standards documents, their metadata, and
//! the lightweight summaries returned by search and working-group listings.
//! Wire shapes use camelCase field names to match what agent clients expect.
//!
//! Metadata fields the normalizer could not locate are serialized as explicit
//! `null` rather than omitted, so callers can distinguish "unknown" from
//! "not part of this payload".

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Document family served by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Family {
    /// Numbered, immutable IETF RFC.
    Rfc,
    /// Versioned Internet Draft (base name + two-digit version).
    Draft,
    /// Foundation specification from the built-in catalog.
    Spec,
}

impl Family {
    /// Returns the string representation, which is also the resource URI scheme.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rfc => "rfc",
            Self::Draft => "draft",
            Self::Spec => "spec",
        }
    }
}

impl std::fmt::Display for Family {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved, version-specific document identifier.
///
/// This is the canonical form used for fetching and cache keying. A
/// versionless draft name is always resolved to a concrete version before a
/// `DocumentId` is constructed for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentId {
    /// Document family.
    pub family: Family,
    /// Canonical name: `rfc2616`, `draft-ietf-httpbis-http2-17`, `openid-connect-core`.
    pub name: String,
    /// Version number for versioned families (drafts).
    pub version: Option<u32>,
}

impl DocumentId {
    /// Creates an identifier without a version component.
    #[must_use]
    pub fn new(family: Family, name: impl Into<String>) -> Self {
        Self {
            family,
            name: name.into(),
            version: None,
        }
    }

    /// Cache key: unique across families even when names collide.
    #[must_use]
    pub fn cache_key(&self) -> String {
        format!("{}:{}", self.family, self.name)
    }
}

impl std::fmt::Display for DocumentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}://{}", self.family, self.name)
    }
}

/// Best-effort document metadata. Every field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocMetadata {
    /// RFC number, for the RFC family.
    pub number: Option<String>,
    /// Canonical document name.
    pub name: Option<String>,
    /// Document title.
    pub title: Option<String>,
    /// Author names.
    pub authors: Vec<String>,
    /// Publication or last-update date, as reported upstream.
    pub date: Option<String>,
    /// Publication status or intended standards level.
    pub status: Option<String>,
    /// Abstract text.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Effective source URL the document was fetched from.
    pub url: Option<String>,
    /// Draft version number.
    pub version: Option<u32>,
    /// Working group acronym, for drafts.
    pub working_group: Option<String>,
}

/// One node of the ordered section tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    /// Section title, without its numeric label.
    pub title: String,
    /// Numeric or lettered label (`2.1`, `A.3`), when the heading carried one.
    pub label: Option<String>,
    /// Position in document order, counted across the whole tree.
    pub index: usize,
    /// Body text up to the next heading at any level.
    pub body: String,
    /// Subsections nested under this section.
    pub children: Vec<Section>,
}

impl Section {
    /// Title/label outline of this node and its children, bodies omitted.
    #[must_use]
    pub fn outline(&self) -> SectionOutline {
        SectionOutline {
            title: self.title.clone(),
            label: self.label.clone(),
            index: self.index,
            children: self.children.iter().map(Self::outline).collect(),
        }
    }
}

/// Section tree node without body text, for the `sections` projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionOutline {
    /// Section title.
    pub title: String,
    /// Numeric or lettered label.
    pub label: Option<String>,
    /// Position in document order.
    pub index: usize,
    /// Subsection outlines.
    pub children: Vec<SectionOutline>,
}

/// A fully parsed document: metadata, section tree, and raw body.
///
/// Immutable once constructed; the cache hands out shared read-only views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedDocument {
    /// Best-effort metadata.
    pub metadata: DocMetadata,
    /// Ordered section tree.
    pub sections: Vec<Section>,
    /// Continuous body text after boilerplate stripping.
    pub raw_text: String,
}

impl ParsedDocument {
    /// Projects the document into the requested output format.
    #[must_use]
    pub fn view(&self, format: DocFormat) -> DocumentView<'_> {
        match format {
            DocFormat::Full => DocumentView::Full {
                metadata: &self.metadata,
                sections: &self.sections,
                raw_text: &self.raw_text,
            },
            DocFormat::Metadata => DocumentView::Metadata(&self.metadata),
            DocFormat::Sections => {
                DocumentView::Sections(self.sections.iter().map(Section::outline).collect())
            }
        }
    }
}

/// Output projection for `get` operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    /// Metadata, sections, and raw text.
    Full,
    /// Metadata only.
    Metadata,
    /// Section outline only, bodies omitted.
    Sections,
}

impl DocFormat {
    /// Parses a format string, rejecting anything outside the allowed set.
    pub fn parse(s: &str) -> Result<Self> {
        match s {
            "full" => Ok(Self::Full),
            "metadata" => Ok(Self::Metadata),
            "sections" => Ok(Self::Sections),
            other => Err(Error::Validation(format!(
                "unknown format {other:?}, expected one of: full, metadata, sections"
            ))),
        }
    }
}

/// Serialized projection of a [`ParsedDocument`].
///
/// `metadata` never includes section bodies or raw text; `sections` never
/// includes metadata; `full` is a superset of both.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum DocumentView<'a> {
    /// Everything.
    #[serde(rename_all = "camelCase")]
    Full {
        /// Best-effort metadata.
        metadata: &'a DocMetadata,
        /// Ordered section tree with bodies.
        sections: &'a [Section],
        /// Continuous body text.
        raw_text: &'a str,
    },
    /// Metadata only.
    Metadata(&'a DocMetadata),
    /// Section outline only.
    Sections(Vec<SectionOutline>),
}

/// Lightweight document summary for search results and group listings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// RFC number, when the entry is an RFC.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    /// Canonical document name.
    pub name: String,
    /// Document title.
    pub title: String,
    /// Author names, when the index reports them.
    pub authors: Vec<String>,
    /// Last-update timestamp from the index.
    pub date: Option<String>,
    /// Intended standards level or publication status.
    pub status: Option<String>,
    /// Abstract text or snippet.
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    /// Link to the upstream document page.
    pub url: String,
    /// Draft version number, when the name carries one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    /// Working group acronym.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_group: Option<String>,
    /// Upstream state names, for drafts.
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub states: Vec<String>,
}

/// Descriptive metadata for a working group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingGroupInfo {
    /// Full group name.
    pub name: String,
    /// Group acronym.
    pub acronym: String,
    /// Charter description.
    pub description: String,
    /// Group state (`active`, `concluded`, …).
    pub state: String,
    /// Group type, normally `wg`.
    #[serde(rename = "type")]
    pub group_type: String,
}

impl WorkingGroupInfo {
    /// Placeholder info used when the upstream group index has no entry.
    #[must_use]
    pub fn unknown(acronym: &str) -> Self {
        Self {
            name: acronym.to_uppercase(),
            acronym: acronym.to_string(),
            description: "Working group information not available".to_string(),
            state: "unknown".to_string(),
            group_type: "wg".to_string(),
        }
    }
}

/// Document counts attached to a working-group listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingGroupSummary {
    /// Number of RFCs returned.
    pub total_rfcs: usize,
    /// Number of active drafts returned.
    pub total_drafts: usize,
    /// Sum of both.
    pub total_documents: usize,
}

/// Result of a working-group document listing.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkingGroupDocuments {
    /// Group acronym as requested.
    pub working_group: String,
    /// Descriptive group metadata.
    pub working_group_info: WorkingGroupInfo,
    /// RFCs attributed to the group.
    pub rfcs: Vec<DocumentSummary>,
    /// Active drafts attributed to the group.
    pub internet_drafts: Vec<DocumentSummary>,
    /// Counts block.
    pub summary: WorkingGroupSummary,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sample_doc() -> ParsedDocument {
        ParsedDocument {
            metadata: DocMetadata {
                title: Some("Test Protocol".to_string()),
                status: Some("Informational".to_string()),
                ..DocMetadata::default()
            },
            sections: vec![Section {
                title: "Introduction".to_string(),
                label: Some("1".to_string()),
                index: 0,
                body: "Body text.".to_string(),
                children: vec![Section {
                    title: "Scope".to_string(),
                    label: Some("1.1".to_string()),
                    index: 1,
                    body: "Scope text.".to_string(),
                    children: Vec::new(),
                }],
            }],
            raw_text: "Full text.".to_string(),
        }
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(DocFormat::parse("full").ok(), Some(DocFormat::Full));
        assert_eq!(DocFormat::parse("metadata").ok(), Some(DocFormat::Metadata));
        assert_eq!(DocFormat::parse("sections").ok(), Some(DocFormat::Sections));
        assert!(matches!(
            DocFormat::parse("everything"),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_metadata_view_has_no_bodies() {
        let doc = sample_doc();
        let json = serde_json::to_value(doc.view(DocFormat::Metadata)).unwrap();
        assert_eq!(json["title"], "Test Protocol");
        assert!(json.get("rawText").is_none());
        assert!(json.get("sections").is_none());
        // Unknown fields are explicit nulls, not omitted.
        assert!(json.get("date").is_some_and(serde_json::Value::is_null));
    }

    #[test]
    fn test_sections_view_has_no_metadata() {
        let doc = sample_doc();
        let json = serde_json::to_value(doc.view(DocFormat::Sections)).unwrap();
        let outline = json.as_array().unwrap();
        assert_eq!(outline[0]["title"], "Introduction");
        assert_eq!(outline[0]["children"][0]["label"], "1.1");
        assert!(outline[0].get("body").is_none());
    }

    #[test]
    fn test_full_view_is_superset() {
        let doc = sample_doc();
        let json = serde_json::to_value(doc.view(DocFormat::Full)).unwrap();
        assert_eq!(json["metadata"]["title"], "Test Protocol");
        assert_eq!(json["rawText"], "Full text.");
        assert_eq!(json["sections"][0]["body"], "Body text.");
    }

    #[test]
    fn test_cache_key_disambiguates_families() {
        let rfc = DocumentId::new(Family::Rfc, "rfc2616");
        let spec = DocumentId::new(Family::Spec, "rfc2616");
        assert_ne!(rfc.cache_key(), spec.cache_key());
        assert_eq!(rfc.to_string(), "rfc://rfc2616");
    }
}
