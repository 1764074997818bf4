//! MCP (Model Context Protocol) server for the standards document gateway.
//!
//! Exposes the catalog services as an MCP server so a calling agent can
//! fetch and search standards documents through tool calls and resource
//! reads.
//!
//! # Architecture
//!
//! ```text
//! MCP Client (agent)
//!   ↓ tools/call, resources/read
//! StandardsMcpServer (ServerHandler)
//!   ↓ operation name + raw JSON arguments
//! Dispatcher (normalize_args → schema validation → route)
//!   ↓
//! Catalog Service (rfc / draft / spec)
//!   ├── Cache hit → return
//!   └── Cache miss → Resolver → Fetcher → Normalizer → populate cache
//! ```
//!
//! Resource URIs (`rfc://2616`, `wg://oauth/rfcs`, …) are a pure alias layer:
//! each resolves to the same dispatcher operation as the named tool call.

pub mod dispatch;
pub mod params;
pub mod server;
pub mod transport;

pub use dispatch::{Dispatcher, normalize_args, operations};
pub use server::StandardsMcpServer;
pub use transport::{serve_http, serve_stdio};
