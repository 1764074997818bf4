//! Command-line argument parsing.
//!
//! Defines the CLI structure using clap derive macros.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Standards document gateway MCP server.
///
/// Serves IETF RFCs, Internet Drafts, and foundation specifications to MCP
/// clients as structured documents with metadata, section trees, and full
/// text.
#[derive(Parser, Debug)]
#[command(name = "standards-mcp")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory for rotating log files.
    ///
    /// When unset, logs go to stderr only. Stdout stays reserved for the
    /// MCP stdio transport either way.
    #[arg(long, env = "STANDARDS_MCP_LOG_DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// The transport to serve on. Defaults to stdio.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve MCP over stdio (default).
    ///
    /// Reads JSON-RPC from stdin and writes responses to stdout.
    Stdio,

    /// Serve MCP over streamable HTTP at /mcp.
    #[command(after_help = r#"Examples:
  standards-mcp http                         # 127.0.0.1:3000
  standards-mcp http --port 8080             # Custom port
  standards-mcp http --host 0.0.0.0          # All interfaces
"#)]
    Http {
        /// Host to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind.
        #[arg(short, long, default_value = "3000")]
        port: u16,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults_to_stdio() {
        let cli = Cli::parse_from(["standards-mcp"]);
        assert!(cli.command.is_none());
        assert_eq!(cli.log_level, "info");
        assert!(cli.log_dir.is_none());
    }

    #[test]
    fn test_http_subcommand() {
        let cli = Cli::parse_from(["standards-mcp", "http", "--port", "8080"]);
        assert!(matches!(
            cli.command,
            Some(Commands::Http { ref host, port: 8080 }) if host == "127.0.0.1"
        ));
    }

    #[test]
    fn test_global_log_flags() {
        let cli = Cli::parse_from([
            "standards-mcp",
            "--log-dir",
            "/tmp/standards-mcp",
            "--log-level",
            "debug",
            "stdio",
        ]);
        assert_eq!(cli.log_dir.as_deref(), Some(std::path::Path::new("/tmp/standards-mcp")));
        assert_eq!(cli.log_level, "debug");
    }
}
