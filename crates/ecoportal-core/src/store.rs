//! Read boundary of the upstream catalog store.

use std::future::Future;

use crate::model::{Brand, Sector, SystemStatus};

/// The three read operations the sync layer consumes. Any of them may fail
/// independently; callers decide how to recover.
pub trait CatalogStore: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn list_sectors(&self) -> impl Future<Output = Result<Vec<Sector>, Self::Error>> + Send;

    fn list_brands(&self) -> impl Future<Output = Result<Vec<Brand>, Self::Error>> + Send;

    fn list_system_status(
        &self,
    ) -> impl Future<Output = Result<Vec<SystemStatus>, Self::Error>> + Send;
}
