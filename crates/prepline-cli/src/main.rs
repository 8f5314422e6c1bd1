mod cmd_extract;
mod cmd_serve;
mod cmd_validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prepline",
    version,
    about = "Interview configuration from voice-agent transcripts"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve an interview configuration from a call log
    Extract {
        /// Call log: JSON array of messages, call object, or JSONL
        path: PathBuf,
        /// Also emit the "create interview" request for this user
        #[arg(long)]
        userid: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Validate a "create interview" request body
    Validate {
        /// JSON request body
        path: PathBuf,
    },
    /// Start the HTTP API server
    Serve {
        /// Address to bind (default: $PREPLINE_BIND or 127.0.0.1)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (default: $PREPLINE_PORT or 7433)
        #[arg(long)]
        port: Option<u16>,
    },
}

/// Log to stderr, filtered by `PREPLINE_LOG`, then `RUST_LOG`, then `warn`.
fn init_tracing() {
    let filter = EnvFilter::try_from_env("PREPLINE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Command::Extract { path, userid, json } => {
            cmd_extract::execute(&path, userid.as_deref(), json)
        }
        Command::Validate { path } => cmd_validate::execute(&path),
        Command::Serve { bind, port } => cmd_serve::execute(bind.as_deref(), port),
    }
}
