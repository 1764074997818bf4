//! Error types for standards-mcp.
//!
//! Every operation surfaces one of the variants below so callers can branch
//! on a stable kind tag instead of parsing message strings. Lower-level
//! causes (HTTP client errors, JSON decode errors) are preserved as sources
//! rather than flattened into the message.

use thiserror::Error;

/// Convenience result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// How a fetch ultimately failed after all source candidates were tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailure {
    /// Every candidate answered with a 404-class status: the document does
    /// not exist upstream.
    NotFound,
    /// At least one candidate failed for a non-404 reason (timeout, 5xx,
    /// transport error). Retrying later may succeed.
    NetworkFailure,
}

impl FetchFailure {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::NetworkFailure => "network_failure",
        }
    }
}

impl std::fmt::Display for FetchFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error taxonomy for all catalog and dispatch operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input: non-numeric RFC number, empty query, unknown format
    /// value, non-positive limit. Never retryable; always the caller's fault.
    #[error("invalid input: {0}")]
    Validation(String),

    /// The identifier, section, or catalog key does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Upstream retrieval failed after exhausting all source candidates.
    #[error("fetch failed ({kind}): {message}")]
    Fetch {
        /// Classification of the failure across all candidates.
        kind: FetchFailure,
        /// Human-readable description naming the identifier and last URL.
        message: String,
        /// The underlying transport error from the last candidate, if any.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Fetched content defeated best-effort parsing entirely. Rare: the
    /// normalizer degrades to unknown metadata rather than failing, so this
    /// only fires for structurally empty content.
    #[error("parse failed: {0}")]
    Parse(String),

    /// The dispatcher received an operation name it does not know.
    #[error("unknown operation: {0}")]
    MethodNotFound(String),
}

impl Error {
    /// Builds a fetch error with no underlying source.
    #[must_use]
    pub fn fetch(kind: FetchFailure, message: impl Into<String>) -> Self {
        Self::Fetch {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Stable kind tag for the structured error envelope.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation_error",
            Self::NotFound(_) => "not_found",
            Self::Fetch {
                kind: FetchFailure::NotFound,
                ..
            } => "fetch_not_found",
            Self::Fetch {
                kind: FetchFailure::NetworkFailure,
                ..
            } => "fetch_network_failure",
            Self::Parse(_) => "parse_error",
            Self::MethodNotFound(_) => "method_not_found",
        }
    }
}
