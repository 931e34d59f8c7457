//! Sync command handlers. Both print JSON so the output can be piped.

use clap::Subcommand;
use ecoportal_db::PgCatalogStore;
use ecoportal_sync::{SyncCoordinator, SyncMetrics};

/// Sub-commands available under `sync`.
#[derive(Debug, Subcommand)]
pub enum SyncCommands {
    /// Run one comprehensive sync and print its metrics
    Run,
    /// Read each upstream table once and report which reads succeeded
    Probe,
}

pub(crate) async fn run(command: &SyncCommands, pool: sqlx::PgPool) -> anyhow::Result<()> {
    let coordinator = SyncCoordinator::new(PgCatalogStore::new(pool));

    let output = match command {
        SyncCommands::Run => {
            let metrics = coordinator.perform_comprehensive_sync().await?;
            log_run(&metrics);
            serde_json::to_string_pretty(&metrics)?
        }
        SyncCommands::Probe => serde_json::to_string_pretty(&coordinator.probe_store().await)?,
    };

    println!("{output}");
    Ok(())
}

/// Names of the sources that were served from fallback data, in read order.
pub(crate) fn fallback_names(metrics: &SyncMetrics) -> Vec<&'static str> {
    metrics
        .fallback_sources
        .iter()
        .map(|source| source.as_str())
        .collect()
}

fn log_run(metrics: &SyncMetrics) {
    let fallbacks = fallback_names(metrics);
    if !fallbacks.is_empty() {
        tracing::warn!(
            sources = ?fallbacks,
            "sync served some sources from fallback data"
        );
    }
    tracing::info!(
        total_brands = metrics.total_brands,
        integrity_score = metrics.integrity_score,
        "sync complete"
    );
}
