use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use feedsweep::cli;

fn init_logging(verbose: bool) {
    let filter_level = if verbose { Level::DEBUG } else { Level::INFO };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(filter_level.into()))
        .with_target(true)
        .with_level(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::time())
        .init();
}

fn main() {
    let parsed = cli::Cli::parse();
    init_logging(parsed.verbose);

    tracing::info!("Starting feedsweep v{}", env!("CARGO_PKG_VERSION"));
    cli::run(parsed);
}
