//! MCP tool parameter types.
//!
//! Defines the input schemas for MCP tools using `schemars` for automatic
//! JSON Schema generation required by the MCP protocol. Deserialization is
//! applied after the dispatcher has unwrapped the optional single-key
//! parameter envelope, so every struct here describes the flat shape.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn default_format() -> String {
    "full".to_string()
}

const fn default_limit() -> usize {
    10
}

const fn default_group_limit() -> usize {
    50
}

const fn default_true() -> bool {
    true
}

/// Parameters for the `get_rfc` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetRfcParams {
    /// RFC number, with or without the `rfc` prefix (`"2616"`, `"rfc9110"`).
    pub number: String,

    /// Output projection: `"full"`, `"metadata"`, or `"sections"`.
    #[serde(default = "default_format")]
    pub format: String,
}

/// Parameters for the `search_rfcs` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchRfcsParams {
    /// Keyword query matched against RFC titles.
    pub query: String,

    /// Maximum number of results, minimum 1.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for the `get_rfc_section` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetRfcSectionParams {
    /// RFC number, with or without the `rfc` prefix.
    pub number: String,

    /// Section title or numeric label (`"Introduction"`, `"2.1"`).
    pub section: String,
}

/// Parameters for the `get_internet_draft` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetInternetDraftParams {
    /// Draft name; a versionless name resolves to the latest version.
    pub name: String,

    /// Output projection: `"full"`, `"metadata"`, or `"sections"`.
    #[serde(default = "default_format")]
    pub format: String,
}

/// Parameters for the `search_internet_drafts` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchInternetDraftsParams {
    /// Keyword query; a full draft name gets an exact lookup first.
    pub query: String,

    /// Maximum number of results, minimum 1.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for the `get_internet_draft_section` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetInternetDraftSectionParams {
    /// Draft name; a versionless name resolves to the latest version.
    pub name: String,

    /// Section title or numeric label.
    pub section: String,
}

/// Parameters for the `get_working_group_documents` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetWorkingGroupDocumentsParams {
    /// IETF working group acronym (`"oauth"`, `"httpbis"`).
    pub working_group: String,

    /// Include the group's RFCs.
    #[serde(default = "default_true")]
    pub include_rfcs: bool,

    /// Include the group's active drafts.
    #[serde(default = "default_true")]
    pub include_drafts: bool,

    /// Maximum entries per document type, minimum 1.
    #[serde(default = "default_group_limit")]
    pub limit: usize,
}

/// Parameters for the `get_spec` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSpecParams {
    /// Catalog key or alias, matched case-insensitively with punctuation
    /// folding (`"OpenID Connect Core"`, `oidc-core`).
    pub name: String,

    /// Output projection: `"full"`, `"metadata"`, or `"sections"`.
    #[serde(default = "default_format")]
    pub format: String,
}

/// Parameters for the `search_specs` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SearchSpecsParams {
    /// Keyword query matched against catalog names, titles, and publishers.
    pub query: String,

    /// Maximum number of results, minimum 1.
    #[serde(default = "default_limit")]
    pub limit: usize,
}

/// Parameters for the `get_spec_section` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GetSpecSectionParams {
    /// Catalog key or alias.
    pub name: String,

    /// Section title or numeric label.
    pub section: String,
}
