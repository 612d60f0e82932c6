use clap::Parser;
use color_eyre::Result;
use tracing_subscriber::EnvFilter;

use ris3_mapa::cli::CliArgs;
use ris3_mapa::config::{debug_enabled, init_app_config};
use ris3_mapa::report;
use ris3_mapa::Snapshot;

fn main() -> Result<()> {
    // Setup error handling
    color_eyre::install()?;

    let args = CliArgs::parse();
    args.apply_env_overrides();

    // Logs go to stderr so piped JSON stays clean
    let filter = if args.debug || debug_enabled() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = init_app_config()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "loading data");
    let snapshot = Snapshot::load(&config.data_dir)?;

    let json = args.json || !is_terminal();
    report::run(&args.command, &snapshot, &config, json)
}

// Check if we're running in a terminal
fn is_terminal() -> bool {
    atty::is(atty::Stream::Stdout)
}
