//! HTML document parsing.
//!
//! Regex-based markup stripping: heading tags (`<h1>`–`<h4>`) become section
//! breaks, everything else collapses to text. Good enough for the rendered
//! RFC/draft/spec pages this gateway fetches; no attempt at full HTML
//! conformance.

use std::sync::LazyLock;

use regex::Regex;

use super::{Heading, SectionBuilder, text};
use crate::document::Section;

static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap_or_else(|_| unreachable!())
});

static H1_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").unwrap_or_else(|_| unreachable!())
});

static HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<h([1-4])[^>]*>(.*?)</h[1-4]>").unwrap_or_else(|_| unreachable!())
});

static META_AUTHOR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\s+name="author"\s+content="([^"]+)""#)
        .unwrap_or_else(|_| unreachable!())
});

static SCRIPT_STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
        .unwrap_or_else(|_| unreachable!())
});

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap_or_else(|_| unreachable!()));

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)</?(p|div|br|li|ul|ol|tr|table|section|pre|blockquote)[^>]*>")
        .unwrap_or_else(|_| unreachable!())
});

/// Result of HTML normalization.
#[derive(Debug)]
pub struct HtmlDocument {
    /// Section tree derived from heading tags.
    pub sections: Vec<Section>,
    /// Tag-stripped body text.
    pub body: String,
    /// `<title>` (or first `<h1>`) content.
    pub title: Option<String>,
    /// `<meta name="author">` values.
    pub authors: Vec<String>,
}

/// Strips markup from an HTML fragment, decoding the common entities.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    let no_scripts = SCRIPT_STYLE_RE.replace_all(html, " ");
    let with_breaks = BLOCK_TAG_RE.replace_all(&no_scripts, "\n");
    let text = TAG_RE.replace_all(&with_breaks, " ");
    let decoded = decode_entities(&text);

    // Collapse runs of spaces but keep line structure for heading detection.
    let mut out = String::with_capacity(decoded.len());
    for line in decoded.lines() {
        let cleaned = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !cleaned.is_empty() {
            out.push_str(&cleaned);
            out.push('\n');
        }
    }
    out
}

fn decode_entities(text: &str) -> String {
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
}

/// Extracts the document title from `<title>`, falling back to the first `<h1>`.
#[must_use]
pub fn extract_title(html: &str) -> Option<String> {
    let from_tag = TITLE_RE
        .captures(html)
        .map(|c| strip_tags(&c[1]).trim().to_string())
        .filter(|t| !t.is_empty());
    if from_tag.is_some() {
        return from_tag;
    }
    H1_RE
        .captures(html)
        .map(|c| strip_tags(&c[1]).trim().to_string())
        .filter(|t| !t.is_empty())
}

/// Extracts author names from `<meta name="author">` tags.
#[must_use]
pub fn extract_meta_authors(html: &str) -> Vec<String> {
    META_AUTHOR_RE
        .captures_iter(html)
        .map(|c| c[1].trim().to_string())
        .filter(|a| !a.is_empty())
        .collect()
}

/// Parses an HTML rendering into sections, body text, and metadata signals.
///
/// Heading tags are the section boundaries; the text between consecutive
/// headings becomes the earlier section's body. Headings whose text begins
/// with a dotted numeral keep it as the section label so the tree nests the
/// same way the plain-text parser would.
#[must_use]
pub fn parse_html_document(html: &str) -> HtmlDocument {
    let title = extract_title(html);
    let authors = extract_meta_authors(html);
    let body = strip_tags(html);

    let mut builder = SectionBuilder::new();
    let mut cursor = 0;
    let mut pending: Option<Heading> = None;

    for caps in HEADING_RE.captures_iter(html) {
        let whole = match caps.get(0) {
            Some(m) => m,
            None => continue,
        };
        let text_between = strip_tags(&html[cursor..whole.start()]);
        flush(&mut builder, pending.take(), &text_between);
        cursor = whole.end();

        let heading_text = strip_tags(&caps[2]).trim().to_string();
        if heading_text.is_empty() {
            continue;
        }
        pending = Some(split_heading_label(&heading_text));
    }
    let tail = strip_tags(&html[cursor..]);
    flush(&mut builder, pending.take(), &tail);

    HtmlDocument {
        sections: builder.finish(),
        body,
        title,
        authors,
    }
}

fn flush(builder: &mut SectionBuilder, heading: Option<Heading>, body: &str) {
    if let Some(heading) = heading {
        builder.open(heading);
    }
    for line in body.lines() {
        builder.push_line(line);
    }
}

/// Splits a leading dotted-numeral label off a heading's text, when present.
fn split_heading_label(heading_text: &str) -> Heading {
    text::match_numbered_heading(heading_text).map_or_else(
        || Heading {
            label: None,
            title: heading_text.to_string(),
        },
        |(label, title)| Heading {
            label: Some(label),
            title,
        },
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<html><head>
<title>The Example Protocol</title>
<meta name="author" content="J. Smith">
<style>body { color: red }</style>
</head><body>
<h1>The Example Protocol</h1>
<p>Preamble &amp; notes.</p>
<h2>1. Introduction</h2>
<p>Intro body text.</p>
<h3>1.1 Terminology</h3>
<p>Terms here.</p>
<h2>2. Messages</h2>
<p>Message body.</p>
</body></html>"#;

    #[test]
    fn test_strip_tags_decodes_entities_and_drops_style() {
        let text = strip_tags(PAGE);
        assert!(text.contains("Preamble & notes."));
        assert!(!text.contains("color: red"));
        assert!(!text.contains('<'));
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title(PAGE).as_deref(), Some("The Example Protocol"));
        assert_eq!(
            extract_title("<h1>Fallback Heading</h1>").as_deref(),
            Some("Fallback Heading")
        );
        assert_eq!(extract_title("<p>no headings</p>"), None);
    }

    #[test]
    fn test_extract_meta_authors() {
        assert_eq!(extract_meta_authors(PAGE), vec!["J. Smith".to_string()]);
    }

    #[test]
    fn test_sections_nest_by_heading_labels() {
        let parsed = parse_html_document(PAGE);
        // h1 title, then 1 (with 1.1 nested), then 2.
        assert_eq!(parsed.sections.len(), 3);
        assert_eq!(parsed.sections[0].title, "The Example Protocol");
        assert_eq!(parsed.sections[2].title, "Messages");
        let intro = &parsed.sections[1];
        assert_eq!(intro.label.as_deref(), Some("1"));
        assert_eq!(intro.title, "Introduction");
        assert!(intro.body.contains("Intro body text."));
        assert_eq!(intro.children.len(), 1);
        assert_eq!(intro.children[0].title, "Terminology");
    }

    #[test]
    fn test_parse_is_deterministic() {
        let a = parse_html_document(PAGE);
        let b = parse_html_document(PAGE);
        assert_eq!(a.sections, b.sections);
        assert_eq!(a.body, b.body);
    }
}
