//! Reconcile release files against a provider.

use std::path::{Path, PathBuf};

use anyhow::bail;
use serde::Serialize;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::model::CanonicalRelease;
use crate::reconcile::names::smart_artist_display;
use crate::reconcile::{CorrectedMetadata, CorrectionSettings, MetadataSource, ReconcileService};

use super::read_release;

/// Per-file outcome, as printed with `--json`.
#[derive(Debug, Serialize)]
struct ReconcileReport {
    path: PathBuf,
    release: String,
    /// Catalog artist display after validating against the provider's artist
    #[serde(skip_serializing_if = "Option::is_none")]
    display_artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    corrected: Option<CorrectedMetadata>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Reconcile each release file in turn.
///
/// Ctrl-C cancels the in-flight reconciliation and stops the run.
pub fn cmd_reconcile(
    rt: &Runtime,
    config: &Config,
    paths: &[PathBuf],
    provider: MetadataSource,
    settings: &CorrectionSettings,
    json: bool,
) -> anyhow::Result<()> {
    if provider == MetadataSource::Canonical {
        bail!("--provider must be commercial or encyclopedia");
    }

    rt.block_on(async {
        let service = ReconcileService::from_config(&config.http)?;

        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::warn!("Interrupted, cancelling");
                on_interrupt.cancel();
            }
        });

        let reports = reconcile_files(&service, paths, provider, settings, &cancel, |report| {
            if !json {
                print_report(report);
            }
        })
        .await?;

        if json {
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        Ok::<(), anyhow::Error>(())
    })
}

/// Run every file through `service`, handing each report to `on_report` as it
/// completes. Unreadable files are reported and skipped.
async fn reconcile_files(
    service: &ReconcileService,
    paths: &[PathBuf],
    provider: MetadataSource,
    settings: &CorrectionSettings,
    cancel: &CancellationToken,
    mut on_report: impl FnMut(&ReconcileReport),
) -> anyhow::Result<Vec<ReconcileReport>> {
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let report = match read_release(path) {
            Ok(release) => reconcile_one(service, path, &release, provider, settings, cancel).await?,
            Err(e) => {
                tracing::error!("Skipping {:?}: {}", path, e);
                ReconcileReport {
                    path: path.clone(),
                    release: String::new(),
                    display_artist: None,
                    corrected: None,
                    error: Some(e.to_string()),
                }
            }
        };
        on_report(&report);
        reports.push(report);
    }
    Ok(reports)
}

async fn reconcile_one(
    service: &ReconcileService,
    path: &Path,
    release: &CanonicalRelease,
    provider: MetadataSource,
    settings: &CorrectionSettings,
    cancel: &CancellationToken,
) -> anyhow::Result<ReconcileReport> {
    let result = match provider {
        MetadataSource::Encyclopedia => {
            service
                .reconcile_with_encyclopedia_provider(release, Some(cancel))
                .await
        }
        _ => {
            service
                .reconcile_with_commercial_provider(release, settings, Some(cancel))
                .await
        }
    };

    Ok(match result {
        Ok(corrected) => ReconcileReport {
            path: path.to_path_buf(),
            release: release.summary(),
            display_artist: corrected.as_ref().map(|c| {
                smart_artist_display(&release.artists, Some(&c.artist), settings.artist_source)
            }),
            corrected,
            error: None,
        },
        Err(e) if e.is_cancellation() => bail!("Cancelled while reconciling {:?}", path),
        Err(e) => ReconcileReport {
            path: path.to_path_buf(),
            release: release.summary(),
            display_artist: None,
            corrected: None,
            error: Some(e.to_string()),
        },
    })
}

fn print_report(report: &ReconcileReport) {
    println!("{}", report.release);
    match (&report.corrected, &report.error) {
        (_, Some(error)) => println!("  ✗ {}", error),
        (None, None) => println!("  No confident match"),
        (Some(corrected), None) => {
            println!(
                "  ✓ {} match (confidence: {:.0}%)",
                corrected.source,
                corrected.score * 100.0
            );
            println!("  Artist:    {}", corrected.artist);
            if let Some(display) = &report.display_artist {
                println!("  Display:   {}", display);
            }
            if let Some(album) = &corrected.album {
                println!("  Album:     {}", album);
            }
            if let Some(genre) = &corrected.genre {
                println!("  Genre:     {}", genre);
            }
            if let Some(country) = &corrected.country {
                println!("  Country:   {}", country);
            }
            if let Some(copyright) = &corrected.copyright {
                println!("  Copyright: {}", copyright);
            }
            if corrected.explicit {
                println!("  Explicit");
            }
            if let Some(strategy) = &corrected.strategy {
                println!("  Via:       {} {:?}", strategy.describe(), strategy.query);
            }
        }
    }
    println!();
}
