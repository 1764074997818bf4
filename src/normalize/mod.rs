//! Document normalizer.
//!
//! Turns raw fetched bytes (plain text or HTML) into a [`ParsedDocument`]:
//! best-effort metadata, an ordered section tree, and the continuous body
//! text. Parsing is a pure function of its input — no network, no clock —
//! so the same bytes always yield an identical document.
//!
//! Heading detection and metadata extraction are pipelines of small matchers
//! applied in priority order; anything unmatched degrades to "unknown"
//! instead of failing the parse. The only hard failure is structurally empty
//! content.

pub mod html;
pub mod metadata;
pub mod text;

use crate::document::{DocumentId, Family, ParsedDocument, Section};
use crate::error::{Error, Result};
use crate::fetch::{RawDocument, SourceFormat};

/// A detected section heading, before tree placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Dotted-numeral or appendix label, when the heading carried one.
    pub label: Option<String>,
    /// Heading title with the label stripped.
    pub title: String,
}

/// Parses a fetched document into its normalized form.
///
/// # Errors
///
/// Returns [`Error::Parse`] only when the content is empty or whitespace
/// after boilerplate stripping; missing metadata never fails the parse.
pub fn parse(raw: &RawDocument, id: &DocumentId) -> Result<ParsedDocument> {
    let (sections, body, html_meta) = match raw.format {
        SourceFormat::Text => {
            let (sections, body) = text::parse_text_document(&raw.body);
            (sections, body, None)
        }
        SourceFormat::Html => {
            let parsed = html::parse_html_document(&raw.body);
            (parsed.sections, parsed.body, Some((parsed.title, parsed.authors)))
        }
    };

    if body.trim().is_empty() {
        return Err(Error::Parse(format!(
            "document {id} has no content after normalization"
        )));
    }

    let mut metadata = match id.family {
        Family::Rfc => metadata::extract_rfc_metadata(&body, &id.name),
        Family::Draft => metadata::extract_draft_metadata(&body, &id.name),
        Family::Spec => metadata::extract_spec_metadata(&body, &id.name),
    };
    metadata.url = Some(raw.url.clone());

    // HTML sources carry better title/author signals than the stripped body.
    if let Some((title, authors)) = html_meta {
        if let Some(title) = title {
            metadata.title = Some(title);
        }
        if metadata.authors.is_empty() {
            metadata.authors = authors;
        }
    }

    Ok(ParsedDocument {
        metadata,
        sections,
        raw_text: body,
    })
}

/// Builds a section tree from a stream of headings and body lines.
///
/// Dotted labels nest under their decimal-prefix ancestor (`2.1` under `2`,
/// `A.3` under `A`); unlabeled headings always open a new top-level section.
#[derive(Debug, Default)]
pub(crate) struct SectionBuilder {
    roots: Vec<Section>,
    stack: Vec<Section>,
    next_index: usize,
}

impl SectionBuilder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Opens a new section, closing any open sections that are not its
    /// labeled ancestors.
    pub(crate) fn open(&mut self, heading: Heading) {
        while let Some(top) = self.stack.last() {
            if is_label_ancestor(top.label.as_deref(), heading.label.as_deref()) {
                break;
            }
            self.close_top();
        }
        self.stack.push(Section {
            title: heading.title,
            label: heading.label,
            index: self.next_index,
            body: String::new(),
            children: Vec::new(),
        });
        self.next_index += 1;
    }

    /// Appends a body line to the innermost open section, if any.
    pub(crate) fn push_line(&mut self, line: &str) {
        if let Some(top) = self.stack.last_mut() {
            if !top.body.is_empty() {
                top.body.push('\n');
            }
            top.body.push_str(line);
        }
    }

    /// Returns `true` when at least one section is open.
    pub(crate) fn has_open_section(&self) -> bool {
        !self.stack.is_empty()
    }

    fn close_top(&mut self) {
        if let Some(mut done) = self.stack.pop() {
            done.body = done.body.trim_end().to_string();
            match self.stack.last_mut() {
                Some(parent) => parent.children.push(done),
                None => self.roots.push(done),
            }
        }
    }

    /// Closes all open sections and returns the finished tree.
    pub(crate) fn finish(mut self) -> Vec<Section> {
        while !self.stack.is_empty() {
            self.close_top();
        }
        self.roots
    }
}

/// Whether `parent` is a labeled ancestor of `child` (`2` → `2.1` → `2.1.3`).
fn is_label_ancestor(parent: Option<&str>, child: Option<&str>) -> bool {
    match (parent, child) {
        (Some(p), Some(c)) => c.len() > p.len() && c.starts_with(p) && c.as_bytes()[p.len()] == b'.',
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn heading(label: Option<&str>, title: &str) -> Heading {
        Heading {
            label: label.map(String::from),
            title: title.to_string(),
        }
    }

    #[test]
    fn test_label_ancestor() {
        assert!(is_label_ancestor(Some("2"), Some("2.1")));
        assert!(is_label_ancestor(Some("2.1"), Some("2.1.3")));
        assert!(is_label_ancestor(Some("A"), Some("A.2")));
        assert!(!is_label_ancestor(Some("2"), Some("21.1")));
        assert!(!is_label_ancestor(Some("2.1"), Some("2.2")));
        assert!(!is_label_ancestor(None, Some("1")));
        assert!(!is_label_ancestor(Some("1"), None));
    }

    #[test]
    fn test_builder_nests_by_prefix() {
        let mut b = SectionBuilder::new();
        b.open(heading(Some("1"), "Introduction"));
        b.push_line("intro body");
        b.open(heading(Some("1.1"), "Scope"));
        b.open(heading(Some("2"), "Protocol"));
        let tree = b.finish();

        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].title, "Introduction");
        assert_eq!(tree[0].body, "intro body");
        assert_eq!(tree[0].children.len(), 1);
        assert_eq!(tree[0].children[0].label.as_deref(), Some("1.1"));
        assert_eq!(tree[1].title, "Protocol");
        assert_eq!(tree[1].index, 2);
    }

    #[test]
    fn test_unlabeled_headings_are_top_level() {
        let mut b = SectionBuilder::new();
        b.open(heading(Some("3"), "Messages"));
        b.open(heading(Some("3.2"), "Framing"));
        b.open(heading(None, "Acknowledgements"));
        let tree = b.finish();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[1].title, "Acknowledgements");
        assert!(tree[1].children.is_empty());
    }

    #[test]
    fn test_ordering_indices_cover_whole_tree() {
        let mut b = SectionBuilder::new();
        b.open(heading(Some("1"), "A"));
        b.open(heading(Some("1.1"), "B"));
        b.open(heading(Some("2"), "C"));
        let tree = b.finish();
        assert_eq!(tree[0].index, 0);
        assert_eq!(tree[0].children[0].index, 1);
        assert_eq!(tree[1].index, 2);
    }
}
