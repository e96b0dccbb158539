//! CLI command definitions and dispatch.
//!
//! Each subcommand is implemented in its own submodule:
//! - `reconcile`: run releases through a provider
//! - `inspect`: strategies, similarity scores and config

mod inspect;
mod reconcile;

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

use crate::error::{Error, ResultExt};
use crate::model::CanonicalRelease;
use crate::reconcile::{CorrectionSettings, MetadataSource};

pub use inspect::{cmd_config, cmd_score, cmd_strategies};
pub use reconcile::cmd_reconcile;

/// Release Reconciler CLI
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (defaults to the OS config directory)
    #[arg(long, global = true, env = "RELEASE_RECONCILER_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile canonical release JSON files against a provider
    Reconcile {
        /// Release JSON files
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Provider to reconcile against: commercial (iTunes) or encyclopedia (MusicBrainz)
        #[arg(short, long, default_value = "commercial")]
        provider: MetadataSource,
        /// Where artist naming comes from (overrides config)
        #[arg(long)]
        artist_source: Option<MetadataSource>,
        /// Where album naming comes from (overrides config)
        #[arg(long)]
        album_source: Option<MetadataSource>,
        /// Print results as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the search strategies generated for a release
    Strategies {
        /// Release JSON file
        path: PathBuf,
        /// Where artist naming comes from (overrides config)
        #[arg(long)]
        artist_source: Option<MetadataSource>,
        /// Where album naming comes from (overrides config)
        #[arg(long)]
        album_source: Option<MetadataSource>,
    },
    /// Fuzzy similarity of two strings
    Score {
        a: String,
        b: String,
    },
    /// Show the effective configuration
    Config {
        /// Write the effective configuration to the config file
        #[arg(long)]
        save: bool,
    },
}

/// Run the specified CLI command.
pub fn run_command(cli: &Cli) -> anyhow::Result<()> {
    let config = match &cli.config {
        Some(path) => crate::config::load_from(path),
        None => crate::config::load(),
    };

    match &cli.command {
        Commands::Reconcile {
            paths,
            provider,
            artist_source,
            album_source,
            json,
        } => {
            let rt = Runtime::new()?;
            let settings = resolve_settings(config.sources, *artist_source, *album_source);
            cmd_reconcile(&rt, &config, paths, *provider, &settings, *json)
        }
        Commands::Strategies {
            path,
            artist_source,
            album_source,
        } => {
            let settings = resolve_settings(config.sources, *artist_source, *album_source);
            cmd_strategies(path, &settings)
        }
        Commands::Score { a, b } => {
            cmd_score(a, b);
            Ok(())
        }
        Commands::Config { save } => cmd_config(&config, cli.config.as_deref(), *save),
    }
}

// ============================================================================
// Shared helper functions
// ============================================================================

/// Apply command-line source overrides on top of the configured settings.
pub(crate) fn resolve_settings(
    configured: CorrectionSettings,
    artist_source: Option<MetadataSource>,
    album_source: Option<MetadataSource>,
) -> CorrectionSettings {
    CorrectionSettings::new(
        artist_source.unwrap_or(configured.artist_source),
        album_source.unwrap_or(configured.album_source),
    )
}

/// Read a canonical release from a JSON file.
pub(crate) fn read_release(path: &Path) -> crate::error::Result<CanonicalRelease> {
    if !path.exists() {
        return Err(Error::not_found(path));
    }
    let json = std::fs::read_to_string(path).with_context(format!("reading {}", path.display()))?;
    serde_json::from_str::<CanonicalRelease>(&json).with_context(format!("parsing {}", path.display()))
}
