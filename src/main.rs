use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use airlock::cli;
use airlock::config::Config;

/// Air quality lookups behind a local, attempt-limited login.
#[derive(Parser)]
#[command(name = "airlock", version, about)]
struct Args {
    /// Config file (default: ~/.airlock/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Account store CSV, overriding the configured path
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(store) = args.store {
        config.store.path = store.to_string_lossy().into_owned();
    }

    cli::run(&config)
}

/// Logs go to stderr so prompts stay clean. `RUST_LOG` wins over the
/// verbosity flag.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "airlock=debug" } else { "airlock=warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
