//! CLI layer for standards-mcp.
//!
//! Provides the command-line interface using clap: transport selection
//! (stdio or streamable HTTP) plus logging flags.

pub mod commands;
pub mod parser;

pub use commands::execute;
pub use parser::{Cli, Commands};
