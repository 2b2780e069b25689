use clap::{Parser, Subcommand};
use tracing::error;

use crate::config;
use crate::scheduler::{RetentionPolicy, RetentionScheduler};
use crate::timeline::HttpTimelineClient;

#[derive(Parser)]
#[command(name = "feedsweep")]
#[command(about = "feedsweep - ephemeral timeline daemon")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the retention daemon
    Run,
    /// Display version information
    Version,
}

/// Dispatches the parsed CLI. `run` (and no subcommand) starts the daemon;
/// a fatal startup error exits the process with a non-zero code.
pub fn run(cli: Cli) {
    match cli.command {
        Some(Commands::Version) => {
            println!("feedsweep v{}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Run) | None => {
            if let Err(e) = run_daemon() {
                error!(error = %e, "Fatal startup error");
                eprintln!("error: {:#}", e);
                std::process::exit(1);
            }
        }
    }
}

/// Loads configuration, wires the collaborators, and blocks on the
/// scheduler until shutdown.
fn run_daemon() -> anyhow::Result<()> {
    let config = config::load_from_env()?;

    let client = HttpTimelineClient::new(config.api_base_url.as_str(), &config.credentials)?;
    let policy = RetentionPolicy {
        max_age: config.max_age(),
    };
    let scheduler = RetentionScheduler::new(client, policy, config.ping_url())?;

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(scheduler.run(config.port))
}
