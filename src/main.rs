//! Binary entry point for standards-mcp.

use clap::Parser;
use tracing::info;

use standards_mcp::cli::{self, Cli};
use standards_mcp::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Guard must outlive the server so file logs flush on shutdown.
    let _guard = logging::init(cli.log_dir.as_deref(), &cli.log_level)?;
    info!(version = env!("CARGO_PKG_VERSION"), "standards-mcp starting");

    cli::execute(cli).await
}
