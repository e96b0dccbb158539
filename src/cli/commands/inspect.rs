//! Inspection commands: strategies, similarity and configuration.

use std::path::{Path, PathBuf};

use crate::config::{self, Config};
use crate::reconcile::{CorrectionSettings, LookupRequest, generate_strategies, similarity};

use super::read_release;

/// Print the ordered search strategies for a release.
pub fn cmd_strategies(path: &Path, settings: &CorrectionSettings) -> anyhow::Result<()> {
    let release = read_release(path)?;
    println!("{}", release.summary());
    println!(
        "  artist source: {}, album source: {}",
        settings.artist_source, settings.album_source
    );
    println!();

    let strategies = generate_strategies(&release, LookupRequest::FullRelease, settings);
    if strategies.is_empty() {
        println!("No strategies: nothing to validate against the commercial provider");
        return Ok(());
    }
    for (i, strategy) in strategies.iter().enumerate() {
        println!("  {}. {} {:?}", i + 1, strategy.describe(), strategy.query);
    }
    Ok(())
}

/// Print the similarity of two strings with their tokens.
pub fn cmd_score(a: &str, b: &str) {
    println!("{:?} -> {:?}", a, similarity::tokenize(a));
    println!("{:?} -> {:?}", b, similarity::tokenize(b));
    println!("similarity: {:.4}", similarity::similarity_score(a, b));
}

/// Print the effective configuration, optionally saving it.
pub fn cmd_config(config: &Config, path: Option<&Path>, save: bool) -> anyhow::Result<()> {
    let target: Option<PathBuf> = path.map(Path::to_path_buf).or_else(config::config_path);
    match &target {
        Some(p) => println!("# {}", p.display()),
        None => println!("# (no config directory)"),
    }
    println!("{}", toml::to_string_pretty(config)?);

    if save {
        match path {
            Some(p) => config::save_to(config, p)?,
            None => config::save(config)?,
        }
    }
    Ok(())
}
