//! Standards document gateway MCP server.
//!
//! Exposes IETF RFCs, Internet Drafts, and foundation specifications to MCP
//! clients through a small set of operations: fetch-by-identifier, keyword
//! search, section extraction, and working-group listing. Heterogeneous
//! HTML and plain-text sources are normalized into structured records
//! (metadata, section tree, full text) and served through an in-memory
//! cache with per-identifier load coalescing.
//!
//! # Layers
//!
//! - [`normalize`] — pure parsing of raw document bytes into a
//!   [`document::ParsedDocument`].
//! - [`fetch`] — identifier resolution, multi-candidate retrieval with
//!   format fallback, and the datatracker index client.
//! - [`cache`] — bounded, TTL-expiring document cache.
//! - [`catalog`] — per-family services composing the layers below.
//! - [`mcp`] — dispatcher, MCP server handler, and transports.

pub mod cache;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod document;
pub mod error;
pub mod fetch;
pub mod logging;
pub mod mcp;
pub mod normalize;

pub use config::ServerConfig;
pub use error::{Error, Result};
