use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use resume_mcp_runtime::{McpCommands, run as run_mcp};

#[derive(Parser)]
#[command(
    name = "resume-mcp",
    version,
    about = "Resume MCP server: profile document tools over stdio"
)]
struct Cli {
    /// Path to the profile document (JSON). Defaults to the config dir file or the built-in sample.
    #[arg(long, env = "RESUME_MCP_DOCUMENT")]
    document: Option<PathBuf>,

    #[command(subcommand)]
    command: McpCommands,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let code = run_mcp(cli.document, cli.command).await;
    std::process::exit(code);
}
