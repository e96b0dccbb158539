//! Release Reconciler - validates a canonical music catalog's artist and
//! album naming against external providers.

use clap::Parser;
use release_reconciler::cli;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Logs go to stderr so `--json` output stays clean
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("release_reconciler=info".parse()?))
        .init();

    cli::run_command(&args)
}
