//! Background job scheduler.
//!
//! Registers the recurring comprehensive sync so the published index stays
//! fresh without a caller hitting `complete-sync`.

use std::sync::Arc;

use ecoportal_core::CatalogStore;
use ecoportal_sync::SyncCoordinator;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// `cron` does not parse, or the scheduler fails to start.
pub async fn build_scheduler<S>(
    coordinator: Arc<SyncCoordinator<S>>,
    cron: &str,
) -> Result<JobScheduler, JobSchedulerError>
where
    S: CatalogStore + 'static,
{
    let scheduler = JobScheduler::new().await?;
    register_sync_job(&scheduler, coordinator, cron).await?;
    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the recurring comprehensive sync.
///
/// A tick that lands while another sync is running joins it instead of
/// starting a second one.
async fn register_sync_job<S>(
    scheduler: &JobScheduler,
    coordinator: Arc<SyncCoordinator<S>>,
    cron: &str,
) -> Result<(), JobSchedulerError>
where
    S: CatalogStore + 'static,
{
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let coordinator = Arc::clone(&coordinator);

        Box::pin(async move {
            match coordinator.perform_comprehensive_sync().await {
                Ok(metrics) => tracing::info!(
                    total_brands = metrics.total_brands,
                    integrity_score = metrics.integrity_score,
                    fallbacks = metrics.fallback_sources.len(),
                    "scheduler: sync complete"
                ),
                Err(e) => tracing::error!(error = %e, "scheduler: sync failed"),
            }
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: registered comprehensive sync job");
    Ok(())
}
