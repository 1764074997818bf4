//! Plain-text document parsing.
//!
//! RFC and draft TXT renderings are paginated with form feeds, running
//! headers, and `[Page N]` footers. This module strips that boilerplate back
//! into a continuous body and detects section headings with an ordered
//! pipeline of matchers: dotted numerals, appendix labels, short all-caps
//! lines, and a table of well-known unnumbered titles.

use std::sync::LazyLock;

use regex::Regex;

use super::{Heading, SectionBuilder};
use crate::document::Section;

/// Page footer: running title plus `[Page N]`, right-aligned.
static FOOTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[Page \d+\]\s*$").unwrap_or_else(|_| unreachable!())
});

/// Running page header: document identity on the left, a date on the right.
static PAGE_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:RFC \d+|Internet-Draft|draft-[A-Za-z0-9-]+)\b.*(?:19|20)\d{2}\s*$")
        .unwrap_or_else(|_| unreachable!())
});

/// Dotted-numeral heading at column zero: `1. Introduction`, `2.1 Framing`.
static NUMBERED_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)*)\.?\s{1,3}(\S.*)$").unwrap_or_else(|_| unreachable!())
});

/// Appendix heading: `Appendix A. Examples`, `Appendix B.1 Notes`.
static APPENDIX_HEADING_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Appendix\s+([A-Z](?:\.\d+)*)\.?\s+(\S.*)$").unwrap_or_else(|_| unreachable!())
});

/// Unnumbered headings that RFC boilerplate uses verbatim.
const KNOWN_HEADINGS: &[&str] = &[
    "abstract",
    "introduction",
    "status of this memo",
    "copyright notice",
    "table of contents",
    "security considerations",
    "iana considerations",
    "acknowledgements",
    "acknowledgments",
    "references",
    "normative references",
    "informative references",
    "authors' addresses",
    "author's address",
    "contributors",
];

/// How many lines after a page break can still be running-header boilerplate.
const HEADER_WINDOW: usize = 2;

/// Strips form feeds, page footers, and running headers, rebuilding a
/// continuous body. Positional: header lines are only dropped when they sit
/// just after a page boundary, so a body line quoting "RFC 2616" survives.
#[must_use]
pub fn strip_page_boilerplate(text: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    // Large sentinel so the document's own header block is never treated as
    // a running page header.
    let mut since_break = usize::MAX;

    for line in text.lines() {
        if line.contains('\u{0c}') {
            since_break = 0;
            // Drop a trailing blank run before the break; the footer regex
            // already removed the page furniture above it.
            while out.last().is_some_and(|l| l.trim().is_empty()) {
                out.pop();
            }
            continue;
        }

        if FOOTER_RE.is_match(line) {
            continue;
        }
        if since_break <= HEADER_WINDOW {
            since_break = since_break.saturating_add(1);
            if line.trim().is_empty() || PAGE_HEADER_RE.is_match(line.trim_start()) {
                continue;
            }
            // First real content line ends the header window.
            since_break = usize::MAX;
        }
        out.push(line);
    }

    out.join("\n")
}

/// Matches a dotted-numeral heading, returning `(label, title)`.
#[must_use]
pub fn match_numbered_heading(line: &str) -> Option<(String, String)> {
    let caps = NUMBERED_HEADING_RE.captures(line)?;
    let title = caps.get(2).map(|m| m.as_str().trim())?;
    // A heading names something; a bare number column does not.
    if !title.chars().any(char::is_alphabetic) {
        return None;
    }
    Some((caps[1].to_string(), title.to_string()))
}

/// Matches an appendix heading, returning `(label, title)`.
#[must_use]
pub fn match_appendix_heading(line: &str) -> Option<(String, String)> {
    let caps = APPENDIX_HEADING_RE.captures(line)?;
    Some((caps[1].to_string(), caps[2].trim().to_string()))
}

/// Matches a short all-caps line used as an unnumbered heading.
#[must_use]
pub fn match_allcaps_heading(line: &str) -> Option<String> {
    let trimmed = line.trim_end();
    if trimmed.len() < 3 || trimmed.len() > 60 || trimmed.starts_with(char::is_whitespace) {
        return None;
    }
    let mut has_letter = false;
    for ch in trimmed.chars() {
        if ch.is_alphabetic() {
            if ch.is_lowercase() {
                return None;
            }
            has_letter = true;
        } else if !ch.is_whitespace() && !matches!(ch, '-' | '\'' | '.') {
            return None;
        }
    }
    has_letter.then(|| trimmed.to_string())
}

/// Matches one of the well-known unnumbered RFC headings.
#[must_use]
pub fn match_known_heading(line: &str) -> Option<String> {
    let trimmed = line.trim_end();
    if trimmed.starts_with(char::is_whitespace) {
        return None;
    }
    KNOWN_HEADINGS
        .contains(&trimmed.to_lowercase().as_str())
        .then(|| trimmed.to_string())
}

/// Heading detection pipeline, in priority order with fallthrough to `None`.
#[must_use]
pub fn detect_heading(line: &str) -> Option<Heading> {
    if let Some((label, title)) = match_numbered_heading(line) {
        return Some(Heading {
            label: Some(label),
            title,
        });
    }
    if let Some((label, title)) = match_appendix_heading(line) {
        return Some(Heading {
            label: Some(label),
            title,
        });
    }
    if let Some(title) = match_known_heading(line) {
        return Some(Heading { label: None, title });
    }
    if let Some(title) = match_allcaps_heading(line) {
        return Some(Heading { label: None, title });
    }
    None
}

/// Parses a plain-text rendering into `(section tree, continuous body)`.
#[must_use]
pub fn parse_text_document(text: &str) -> (Vec<Section>, String) {
    let body = strip_page_boilerplate(text);
    let mut builder = SectionBuilder::new();

    for line in body.lines() {
        match detect_heading(line) {
            Some(heading) => builder.open(heading),
            None => {
                if builder.has_open_section() {
                    builder.push_line(line);
                }
            }
        }
    }

    (builder.finish(), body)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use test_case::test_case;

    const PAGED: &str = "Network Working Group                                    R. Fielding\n\
\n\
                          Hypertext Transfer Protocol\n\
\n\
1. Introduction\n\
\n\
   This document specifies the protocol.\n\
\n\
Fielding, et al.            Standards Track                     [Page 1]\n\
\u{0c}\n\
RFC 2616                        HTTP/1.1                       June 1999\n\
\n\
1.1 Purpose\n\
\n\
   The purpose paragraph.\n";

    #[test]
    fn test_strip_removes_footer_and_running_header() {
        let body = strip_page_boilerplate(PAGED);
        assert!(!body.contains("[Page 1]"));
        assert!(!body.contains("June 1999"));
        assert!(body.contains("This document specifies the protocol."));
        assert!(body.contains("The purpose paragraph."));
    }

    #[test]
    fn test_strip_keeps_rfc_mentions_in_body() {
        let text = "1. Introduction\n\n   See RFC 2616 for details, updated in 2014 anyway.\n";
        let body = strip_page_boilerplate(text);
        assert!(body.contains("See RFC 2616"));
    }

    #[test_case("1. Introduction", Some(("1", "Introduction")); "top level")]
    #[test_case("2.1  Protocol Parameters", Some(("2.1", "Protocol Parameters")); "nested no dot")]
    #[test_case("10.4.5 Not Found", Some(("10.4.5", "Not Found")); "deep")]
    #[test_case("   3. Indented", None; "indented is body")]
    #[test_case("1.2.3", None; "bare number column")]
    #[test_case("Just prose here.", None; "prose")]
    fn test_numbered_heading(line: &str, expected: Option<(&str, &str)>) {
        let got = match_numbered_heading(line);
        assert_eq!(
            got,
            expected.map(|(l, t)| (l.to_string(), t.to_string()))
        );
    }

    #[test_case("Appendix A. Example Exchanges", Some(("A", "Example Exchanges")))]
    #[test_case("Appendix B.2 Edge Cases", Some(("B.2", "Edge Cases")))]
    #[test_case("Appendix text mentioning appendix a.", None)]
    fn test_appendix_heading(line: &str, expected: Option<(&str, &str)>) {
        let got = match_appendix_heading(line);
        assert_eq!(
            got,
            expected.map(|(l, t)| (l.to_string(), t.to_string()))
        );
    }

    #[test_case("SECURITY CONSIDERATIONS", true)]
    #[test_case("NOT ALL lowercase", false)]
    #[test_case("AB", false; "too short")]
    #[test_case("   INDENTED CAPS", false)]
    fn test_allcaps_heading(line: &str, matches: bool) {
        assert_eq!(match_allcaps_heading(line).is_some(), matches);
    }

    #[test]
    fn test_known_heading_is_case_insensitive() {
        assert!(match_known_heading("Abstract").is_some());
        assert!(match_known_heading("ABSTRACT").is_some());
        assert!(match_known_heading("Abstractions").is_none());
    }

    #[test]
    fn test_detect_priority_numbered_over_caps() {
        let h = detect_heading("2. IANA CONSIDERATIONS").unwrap();
        assert_eq!(h.label.as_deref(), Some("2"));
        assert_eq!(h.title, "IANA CONSIDERATIONS");
    }

    #[test]
    fn test_parse_builds_nested_tree() {
        let (sections, body) = parse_text_document(PAGED);
        assert!(!body.is_empty());
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].title, "Introduction");
        assert_eq!(sections[0].children.len(), 1);
        assert_eq!(sections[0].children[0].title, "Purpose");
        assert!(sections[0].body.contains("specifies the protocol"));
    }

    proptest! {
        #[test]
        fn prop_strip_page_boilerplate_is_idempotent(input in any::<String>()) {
            let once = strip_page_boilerplate(&input);
            prop_assert_eq!(strip_page_boilerplate(&once), once);
        }

        #[test]
        fn prop_parse_is_deterministic(input in any::<String>()) {
            let first = parse_text_document(&input);
            prop_assert_eq!(parse_text_document(&input), first);
        }
    }
}
