use ecoportal_core::{Brand, CatalogStore, Sector, SystemStatus};
use sqlx::PgPool;

use crate::catalog::{list_brands, list_sectors, list_system_status};
use crate::DbError;

/// Postgres-backed upstream store for the sync coordinator.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl CatalogStore for PgCatalogStore {
    type Error = DbError;

    async fn list_sectors(&self) -> Result<Vec<Sector>, DbError> {
        let rows = list_sectors(&self.pool).await?;
        Ok(rows.into_iter().map(Sector::from).collect())
    }

    async fn list_brands(&self) -> Result<Vec<Brand>, DbError> {
        let rows = list_brands(&self.pool).await?;
        Ok(rows.into_iter().map(Brand::from).collect())
    }

    async fn list_system_status(&self) -> Result<Vec<SystemStatus>, DbError> {
        let rows = list_system_status(&self.pool).await?;
        Ok(rows.into_iter().map(SystemStatus::from).collect())
    }
}
