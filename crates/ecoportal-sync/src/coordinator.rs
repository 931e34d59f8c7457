//! Single-flight synchronization against the upstream store.
//!
//! Only one refresh runs at a time. A caller that arrives while a refresh is
//! in flight does not wait for it and does not start another: it gets the
//! metrics of the last completed refresh immediately, which may be stale
//! relative to the refresh still running. There is no queue of waiters.
//!
//! Each refresh builds its snapshot, index, and metrics in isolation and then
//! publishes them with one pointer swap, so lookups see either the previous
//! publication or the new one in full.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use chrono::{DateTime, Utc};
use ecoportal_core::{Brand, CatalogStore, Sector, Snapshot};
use serde::Serialize;

use crate::error::SyncError;
use crate::fallback::FallbackData;
use crate::index::CrossReferenceIndex;
use crate::integrity::integrity_score;

/// One of the three upstream reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncSource {
    Sectors,
    Brands,
    SystemStatus,
}

impl SyncSource {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SyncSource::Sectors => "sectors",
            SyncSource::Brands => "brands",
            SyncSource::SystemStatus => "system_status",
        }
    }
}

/// Counts produced by one completed refresh. All zero before the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncMetrics {
    pub total_brands: usize,
    pub core_brands: usize,
    pub subnodes: usize,
    pub sectors: usize,
    pub system_status_count: usize,
    pub cross_references: usize,
    pub integrity_score: u8,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub sync_duration_ms: u64,
    /// Reads that failed and were served from [`FallbackData`].
    pub fallback_sources: Vec<SyncSource>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub in_flight: bool,
    pub last_sync_at: Option<DateTime<Utc>>,
    pub has_index: bool,
}

/// Outcome of reading the store directly, outside the single-flight guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeReport {
    pub sectors_ok: bool,
    pub brands_ok: bool,
    pub system_status_ok: bool,
    pub succeeded: usize,
    pub attempted: usize,
}

#[derive(Debug)]
struct Publication {
    snapshot: Snapshot,
    index: CrossReferenceIndex,
    metrics: SyncMetrics,
}

/// Clears the in-flight flag when the refresh ends, including on error or
/// when the refresh future is dropped.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Shared, explicitly constructed sync state. Wrap in an [`Arc`] to hand it to
/// the HTTP layer and the scheduler.
pub struct SyncCoordinator<S> {
    store: S,
    published: ArcSwapOption<Publication>,
    in_flight: AtomicBool,
}

impl<S: CatalogStore> SyncCoordinator<S> {
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store,
            published: ArcSwapOption::empty(),
            in_flight: AtomicBool::new(false),
        }
    }

    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Refresh the published snapshot, index, and metrics.
    ///
    /// Store read failures never surface here: each failed read is replaced by
    /// [`FallbackData`] independently and logged. If a refresh is already in
    /// flight, returns the last published metrics without doing any work.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedSnapshot`] if the combined snapshot has
    /// duplicate sector or brand ids. The previous publication stays in place.
    pub async fn perform_comprehensive_sync(&self) -> Result<SyncMetrics, SyncError> {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("sync already in flight; returning last published metrics");
            return Ok(self.current_metrics());
        };

        let started = Instant::now();

        let (
            (sectors, sectors_fell_back),
            (brands, brands_fell_back),
            (system_status, status_fell_back),
        ) = tokio::join!(
            read_or_fallback(
                SyncSource::Sectors,
                self.store.list_sectors(),
                FallbackData::sectors
            ),
            read_or_fallback(
                SyncSource::Brands,
                self.store.list_brands(),
                FallbackData::brands
            ),
            read_or_fallback(
                SyncSource::SystemStatus,
                self.store.list_system_status(),
                FallbackData::system_status,
            ),
        );

        let fallback_sources: Vec<SyncSource> = [
            (SyncSource::Sectors, sectors_fell_back),
            (SyncSource::Brands, brands_fell_back),
            (SyncSource::SystemStatus, status_fell_back),
        ]
        .into_iter()
        .filter_map(|(source, fell_back)| fell_back.then_some(source))
        .collect();

        let snapshot = Snapshot {
            sectors,
            brands,
            system_status,
        };

        let index = CrossReferenceIndex::build(&snapshot.sectors, &snapshot.brands).inspect_err(
            |e| tracing::error!(error = %e, "sync aborted; keeping previous publication"),
        )?;

        let metrics = SyncMetrics {
            total_brands: snapshot.brands.len(),
            core_brands: snapshot.core_brand_count(),
            subnodes: snapshot.subnode_count(),
            sectors: snapshot.sectors.len(),
            system_status_count: snapshot.system_status.len(),
            cross_references: index.cross_reference_count(),
            integrity_score: integrity_score(&snapshot.sectors, &snapshot.brands),
            last_sync_at: Some(Utc::now()),
            sync_duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
            fallback_sources,
        };

        self.published.store(Some(Arc::new(Publication {
            snapshot,
            index,
            metrics: metrics.clone(),
        })));

        tracing::info!(
            sectors = metrics.sectors,
            brands = metrics.total_brands,
            cross_references = metrics.cross_references,
            integrity = metrics.integrity_score,
            duration_ms = metrics.sync_duration_ms,
            fallbacks = metrics.fallback_sources.len(),
            "sync complete"
        );

        Ok(metrics)
    }

    /// Issue the three reads directly and report which succeeded. Publishes
    /// nothing and ignores the single-flight guard.
    pub async fn probe_store(&self) -> ProbeReport {
        let (sectors, brands, system_status) = tokio::join!(
            self.store.list_sectors(),
            self.store.list_brands(),
            self.store.list_system_status(),
        );

        let sectors_ok = probe_ok(SyncSource::Sectors, &sectors);
        let brands_ok = probe_ok(SyncSource::Brands, &brands);
        let system_status_ok = probe_ok(SyncSource::SystemStatus, &system_status);
        let succeeded = [sectors_ok, brands_ok, system_status_ok]
            .into_iter()
            .filter(|ok| *ok)
            .count();

        ProbeReport {
            sectors_ok,
            brands_ok,
            system_status_ok,
            succeeded,
            attempted: 3,
        }
    }

    /// Metrics of the last completed refresh; zeroed before the first.
    #[must_use]
    pub fn current_metrics(&self) -> SyncMetrics {
        self.published
            .load()
            .as_ref()
            .map(|p| p.metrics.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn sync_status(&self) -> SyncStatus {
        let published = self.published.load();
        SyncStatus {
            in_flight: self.in_flight.load(Ordering::Acquire),
            last_sync_at: published.as_ref().and_then(|p| p.metrics.last_sync_at),
            has_index: published.is_some(),
        }
    }

    /// Copy of the last published snapshot, if any.
    #[must_use]
    pub fn current_snapshot(&self) -> Option<Snapshot> {
        self.published.load().as_ref().map(|p| p.snapshot.clone())
    }

    #[must_use]
    pub fn brands_by_sector(&self, sector_id: i64) -> Vec<Brand> {
        self.with_index(|index| index.brands_by_sector(sector_id).to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn sector_for_brand(&self, brand_id: i64) -> Option<Sector> {
        self.with_index(|index| index.sector_for_brand(brand_id).cloned())
            .flatten()
    }

    #[must_use]
    pub fn subnodes_by_parent(&self, parent_id: i64) -> Vec<Brand> {
        self.with_index(|index| index.subnodes_by_parent(parent_id).to_vec())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn brands_by_integration(&self, tag: &str) -> Vec<Brand> {
        self.with_index(|index| index.brands_by_integration(tag).to_vec())
            .unwrap_or_default()
    }

    fn with_index<T>(&self, f: impl FnOnce(&CrossReferenceIndex) -> T) -> Option<T> {
        self.published.load().as_ref().map(|p| f(&p.index))
    }
}

async fn read_or_fallback<T, E>(
    source: SyncSource,
    read: impl Future<Output = Result<Vec<T>, E>>,
    fallback: fn() -> Vec<T>,
) -> (Vec<T>, bool)
where
    E: std::fmt::Display,
{
    match read.await {
        Ok(rows) => (rows, false),
        Err(e) => {
            tracing::warn!(
                source = source.as_str(),
                error = %e,
                "store read failed; using fallback data"
            );
            (fallback(), true)
        }
    }
}

fn probe_ok<T, E: std::fmt::Display>(source: SyncSource, result: &Result<T, E>) -> bool {
    match result {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(source = source.as_str(), error = %e, "store probe failed");
            false
        }
    }
}
