//! CLI command implementations.
//!
//! Builds the server from environment configuration and hands it to the
//! selected transport.

use tracing::info;

use crate::cli::parser::{Cli, Commands};
use crate::config::ServerConfig;
use crate::mcp::{StandardsMcpServer, serve_http, serve_stdio};

/// Executes the parsed CLI command.
///
/// # Errors
///
/// Returns an error if the server cannot be constructed or the transport
/// fails at runtime.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = ServerConfig::from_env();
    let server = StandardsMcpServer::new(config)?;

    match cli.command.unwrap_or(Commands::Stdio) {
        Commands::Stdio => {
            info!("starting stdio server");
            serve_stdio(server).await
        }
        Commands::Http { host, port } => {
            info!(host, port, "starting http server");
            serve_http(server, &host, port).await
        }
    }
}
