//! Family-specific metadata extraction heuristics.
//!
//! Every extractor is best-effort: a field that cannot be located is left
//! `None` and the parse carries on. The title cascade mirrors the layered
//! patterns needed for older RFC renderings, where the title is a centered
//! line after the header block rather than a labeled field.

use std::sync::LazyLock;

use regex::Regex;

use crate::document::DocMetadata;

static TITLE_FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:Title|Internet-Draft):[ \t]*(.+)$").unwrap_or_else(|_| unreachable!())
});

static AUTHORS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?msi)^Authors?:[ \t]*\n?(.*?)(?:\r?\n[ \t]*\r?\n)")
        .unwrap_or_else(|_| unreachable!())
});

static ABSTRACT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?msi)^Abstract[ \t]*\r?\n+[ \t]*(.*?)(?:\r?\n[ \t]*\r?\n)")
        .unwrap_or_else(|_| unreachable!())
});

static DATE_LINE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:January|February|March|April|May|June|July|August|September|October|November|December)[ \t]+(?:\d{1,2},[ \t]*)?\d{4}$",
    )
    .unwrap_or_else(|_| unreachable!())
});

static CATEGORY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?mi)^(?:Category|Intended status):[ \t]*(.+)$").unwrap_or_else(|_| unreachable!())
});

static VERSION_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-(\d+)$").unwrap_or_else(|_| unreachable!()));

static WG_NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^draft-ietf-([a-z0-9]+)-").unwrap_or_else(|_| unreachable!())
});

/// Title patterns for the last-resort scan of the likely title area.
static TITLE_SHAPE_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        // Lines naming a protocol or standard.
        r"^[^.]*(?:Protocol|Transfer|Transport|System|Method|Format|Standard|Specification)[^.]*$",
        // "Hypertext Transfer Protocol -- HTTP/1.1" shape.
        r"^[A-Z][^.]*--[^.]*$",
        // Capitalized line ending lowercase.
        r"^[A-Z][a-z].*[a-z]$",
    ]
    .iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

/// Extracts the numeric version suffix from a draft name (`-17` → `17`).
#[must_use]
pub fn extract_version(name: &str) -> Option<u32> {
    VERSION_SUFFIX_RE
        .captures(name)
        .and_then(|c| c[1].parse().ok())
}

/// Extracts the working-group acronym from an IETF draft name.
#[must_use]
pub fn extract_working_group(name: &str) -> Option<String> {
    WG_NAME_RE.captures(name).map(|c| c[1].to_string())
}

/// RFC metadata from the plain-text header block.
#[must_use]
pub fn extract_rfc_metadata(body: &str, name: &str) -> DocMetadata {
    DocMetadata {
        number: name.strip_prefix("rfc").map(String::from),
        name: Some(name.to_string()),
        title: extract_title(body),
        authors: extract_authors(body),
        date: extract_date(body),
        status: extract_status(body),
        abstract_text: extract_abstract(body),
        ..DocMetadata::default()
    }
}

/// Draft metadata: header heuristics plus filename-derived fields.
#[must_use]
pub fn extract_draft_metadata(body: &str, name: &str) -> DocMetadata {
    DocMetadata {
        name: Some(name.to_string()),
        title: extract_title(body),
        authors: extract_authors(body),
        date: extract_date(body),
        status: extract_status(body),
        abstract_text: extract_abstract(body),
        version: extract_version(name),
        working_group: extract_working_group(name),
        ..DocMetadata::default()
    }
}

/// Foundation-spec metadata. These are HTML sources, so the normalizer
/// overrides the title from the `<title>` tag when it finds one.
#[must_use]
pub fn extract_spec_metadata(body: &str, name: &str) -> DocMetadata {
    DocMetadata {
        name: Some(name.to_string()),
        title: extract_title(body),
        abstract_text: extract_abstract(body),
        ..DocMetadata::default()
    }
}

/// Title cascade: labeled field, then centered-line-after-date, then shape
/// patterns over the likely title area. `None` when nothing matches.
fn extract_title(body: &str) -> Option<String> {
    if let Some(caps) = TITLE_FIELD_RE.captures(body) {
        let title = caps[1].trim().to_string();
        if !title.is_empty() {
            return Some(title);
        }
    }

    let lines: Vec<&str> = body.lines().collect();
    if let Some(title) = title_after_date_line(&lines) {
        return Some(title);
    }
    title_by_shape(&lines)
}

fn title_after_date_line(lines: &[&str]) -> Option<String> {
    let mut found_date = false;
    for line in lines.iter().take(50) {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if DATE_LINE_RE.is_match(trimmed) {
            found_date = true;
            continue;
        }
        if !found_date {
            continue;
        }
        let lower = trimmed.to_lowercase();
        if ["status of this memo", "copyright notice", "abstract"]
            .iter()
            .any(|skip| lower.contains(skip))
        {
            continue;
        }
        if trimmed.len() > 15
            && trimmed != trimmed.to_uppercase()
            && trimmed.split_whitespace().count() > 2
            && !trimmed.starts_with("This document")
            && !trimmed.starts_with("Copyright")
        {
            return Some(trimmed.to_string());
        }
    }
    None
}

fn title_by_shape(lines: &[&str]) -> Option<String> {
    for re in TITLE_SHAPE_RES.iter() {
        for line in lines.iter().skip(20).take(20) {
            let trimmed = line.trim();
            if trimmed.len() > 15 && re.is_match(trimmed) {
                return Some(trimmed.to_string());
            }
        }
    }
    None
}

fn extract_authors(body: &str) -> Vec<String> {
    let Some(caps) = AUTHORS_BLOCK_RE.captures(body) else {
        return Vec::new();
    };
    caps[1]
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Authors:"))
        .map(String::from)
        .collect()
}

fn extract_abstract(body: &str) -> Option<String> {
    ABSTRACT_RE.captures(body).map(|caps| {
        caps[1]
            .lines()
            .map(str::trim)
            .collect::<Vec<_>>()
            .join(" ")
            .trim()
            .to_string()
    })
}

fn extract_date(body: &str) -> Option<String> {
    body.lines()
        .take(40)
        .map(str::trim)
        .find(|line| DATE_LINE_RE.is_match(line))
        .map(String::from)
}

fn extract_status(body: &str) -> Option<String> {
    CATEGORY_RE
        .captures(body)
        .map(|c| c[1].trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    const RFC_HEADER: &str = "\
Network Working Group                                     R. Fielding
Request for Comments: 2616                                UC Irvine
Category: Standards Track
                                                          June 1999

          Hypertext Transfer Protocol -- HTTP/1.1

Status of this Memo

   This document specifies an Internet standards track protocol.

Abstract

   The Hypertext Transfer Protocol (HTTP) is an application-level
   protocol for distributed, collaborative, hypermedia systems.

1. Introduction
";

    #[test_case("draft-ietf-httpbis-http2-17", Some(17))]
    #[test_case("draft-ietf-httpbis-http2-07", Some(7))]
    #[test_case("draft-ietf-httpbis-http2", None)]
    #[test_case("rfc2616", None)]
    fn test_extract_version(name: &str, expected: Option<u32>) {
        assert_eq!(extract_version(name), expected);
    }

    #[test_case("draft-ietf-httpbis-http2-17", Some("httpbis"))]
    #[test_case("draft-ietf-oauth-v2-1-10", Some("oauth"))]
    #[test_case("draft-smith-private-thing-00", None)]
    fn test_extract_working_group(name: &str, expected: Option<&str>) {
        assert_eq!(extract_working_group(name).as_deref(), expected);
    }

    #[test]
    fn test_rfc_header_block() {
        let meta = extract_rfc_metadata(RFC_HEADER, "rfc2616");
        assert_eq!(meta.number.as_deref(), Some("2616"));
        assert_eq!(
            meta.title.as_deref(),
            Some("Hypertext Transfer Protocol -- HTTP/1.1")
        );
        assert_eq!(meta.status.as_deref(), Some("Standards Track"));
        assert_eq!(meta.date.as_deref(), Some("June 1999"));
        assert!(
            meta.abstract_text
                .as_deref()
                .is_some_and(|a| a.starts_with("The Hypertext Transfer Protocol"))
        );
    }

    #[test]
    fn test_title_field_wins_over_heuristics() {
        let body = "Internet-Draft: The QUIC Transport Protocol\n\nOther text follows.\n\n";
        assert_eq!(
            extract_title(body).as_deref(),
            Some("The QUIC Transport Protocol")
        );
    }

    #[test]
    fn test_missing_fields_stay_unknown() {
        let meta = extract_draft_metadata("short body\n", "draft-ietf-quic-http-34");
        assert_eq!(meta.title, None);
        assert_eq!(meta.status, None);
        assert_eq!(meta.abstract_text, None);
        assert!(meta.authors.is_empty());
        // Filename-derived fields still work.
        assert_eq!(meta.version, Some(34));
        assert_eq!(meta.working_group.as_deref(), Some("quic"));
    }

    #[test]
    fn test_abstract_joined_to_single_paragraph() {
        let meta = extract_rfc_metadata(RFC_HEADER, "rfc2616");
        let abs = meta.abstract_text.unwrap_or_default();
        assert!(!abs.contains('\n'));
        assert!(abs.contains("application-level protocol"));
    }

    #[test]
    fn test_authors_block() {
        let body = "Authors:\n   R. Fielding\n   J. Gettys\n\nNext paragraph.\n\n";
        assert_eq!(
            extract_authors(body),
            vec!["R. Fielding".to_string(), "J. Gettys".to_string()]
        );
    }
}
