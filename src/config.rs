//! Server configuration with builder pattern and environment variable support.
//!
//! Configuration is resolved in order: explicit values → environment variables → defaults.

use std::time::Duration;

/// Default maximum number of cached documents.
const DEFAULT_CACHE_CAPACITY: usize = 256;
/// Default cache entry time-to-live in seconds.
const DEFAULT_CACHE_TTL_SECS: u64 = 3600;
/// Default per-candidate fetch timeout in seconds.
const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
/// Default RFC editor base URL (HTML and canonical TXT sources).
const DEFAULT_RFC_EDITOR_BASE: &str = "https://www.rfc-editor.org";
/// Default IETF mirror base URL (alternate TXT source).
const DEFAULT_IETF_BASE: &str = "https://www.ietf.org";
/// Default IETF datatracker base URL (drafts, document index, groups).
const DEFAULT_DATATRACKER_BASE: &str = "https://datatracker.ietf.org";
/// Default User-Agent header for upstream requests.
const DEFAULT_USER_AGENT: &str = concat!("standards-mcp/", env!("CARGO_PKG_VERSION"));

/// Configuration for the document gateway.
///
/// Base URLs are configurable so tests and mirrors can redirect upstream
/// traffic without code changes.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Maximum number of cached documents before oldest-first eviction.
    pub cache_capacity: usize,
    /// Time-to-live for cache entries.
    pub cache_ttl: Duration,
    /// Timeout applied independently to each fetch candidate.
    pub fetch_timeout: Duration,
    /// Base URL for RFC editor sources.
    pub rfc_editor_base: String,
    /// Base URL for the IETF mirror.
    pub ietf_base: String,
    /// Base URL for the datatracker (drafts, index API, groups).
    pub datatracker_base: String,
    /// User-Agent header sent on all upstream requests.
    pub user_agent: String,
}

impl ServerConfig {
    /// Creates a new builder for `ServerConfig`.
    #[must_use]
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// Creates configuration from environment variables with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::builder().from_env().build()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for [`ServerConfig`].
#[derive(Debug, Clone, Default)]
pub struct ServerConfigBuilder {
    cache_capacity: Option<usize>,
    cache_ttl: Option<Duration>,
    fetch_timeout: Option<Duration>,
    rfc_editor_base: Option<String>,
    ietf_base: Option<String>,
    datatracker_base: Option<String>,
    user_agent: Option<String>,
}

impl ServerConfigBuilder {
    /// Populates unset fields from `STANDARDS_MCP_*` environment variables.
    #[must_use]
    pub fn from_env(mut self) -> Self {
        if self.cache_capacity.is_none() {
            self.cache_capacity = std::env::var("STANDARDS_MCP_CACHE_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok());
        }
        if self.cache_ttl.is_none() {
            self.cache_ttl = std::env::var("STANDARDS_MCP_CACHE_TTL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        if self.fetch_timeout.is_none() {
            self.fetch_timeout = std::env::var("STANDARDS_MCP_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs);
        }
        if self.rfc_editor_base.is_none() {
            self.rfc_editor_base = std::env::var("STANDARDS_MCP_RFC_EDITOR_BASE").ok();
        }
        if self.ietf_base.is_none() {
            self.ietf_base = std::env::var("STANDARDS_MCP_IETF_BASE").ok();
        }
        if self.datatracker_base.is_none() {
            self.datatracker_base = std::env::var("STANDARDS_MCP_DATATRACKER_BASE").ok();
        }
        if self.user_agent.is_none() {
            self.user_agent = std::env::var("STANDARDS_MCP_USER_AGENT").ok();
        }
        self
    }

    /// Sets the cache capacity.
    #[must_use]
    pub const fn cache_capacity(mut self, n: usize) -> Self {
        self.cache_capacity = Some(n);
        self
    }

    /// Sets the cache time-to-live.
    #[must_use]
    pub const fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    /// Sets the per-candidate fetch timeout.
    #[must_use]
    pub const fn fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = Some(timeout);
        self
    }

    /// Sets the RFC editor base URL.
    #[must_use]
    pub fn rfc_editor_base(mut self, url: impl Into<String>) -> Self {
        self.rfc_editor_base = Some(url.into());
        self
    }

    /// Sets the IETF mirror base URL.
    #[must_use]
    pub fn ietf_base(mut self, url: impl Into<String>) -> Self {
        self.ietf_base = Some(url.into());
        self
    }

    /// Sets the datatracker base URL.
    #[must_use]
    pub fn datatracker_base(mut self, url: impl Into<String>) -> Self {
        self.datatracker_base = Some(url.into());
        self
    }

    /// Sets the User-Agent header.
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Builds the [`ServerConfig`].
    #[must_use]
    pub fn build(self) -> ServerConfig {
        ServerConfig {
            cache_capacity: self.cache_capacity.unwrap_or(DEFAULT_CACHE_CAPACITY),
            cache_ttl: self
                .cache_ttl
                .unwrap_or(Duration::from_secs(DEFAULT_CACHE_TTL_SECS)),
            fetch_timeout: self
                .fetch_timeout
                .unwrap_or(Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS)),
            rfc_editor_base: self
                .rfc_editor_base
                .unwrap_or_else(|| DEFAULT_RFC_EDITOR_BASE.to_string()),
            ietf_base: self
                .ietf_base
                .unwrap_or_else(|| DEFAULT_IETF_BASE.to_string()),
            datatracker_base: self
                .datatracker_base
                .unwrap_or_else(|| DEFAULT_DATATRACKER_BASE.to_string()),
            user_agent: self
                .user_agent
                .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }
}
