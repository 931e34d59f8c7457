//! Read queries for the `sectors`, `brands`, and `system_status` tables.

use chrono::{DateTime, Utc};
use ecoportal_core::{Brand, Sector, SystemStatus};
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `sectors` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SectorRow {
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub description: String,
    pub brand_count: i32,
    pub subnode_count: i32,
}

/// A row from the `brands` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BrandRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub integration: String,
    pub status: String,
    pub is_core: bool,
    pub sector_id: Option<i64>,
    pub parent_id: Option<i64>,
}

/// A row from the `system_status` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SystemStatusRow {
    pub id: i64,
    pub component: String,
    pub status: String,
    pub checked_at: Option<DateTime<Utc>>,
}

impl From<SectorRow> for Sector {
    fn from(row: SectorRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            emoji: row.emoji,
            description: row.description,
            brand_count: row.brand_count,
            subnode_count: row.subnode_count,
        }
    }
}

impl From<BrandRow> for Brand {
    fn from(row: BrandRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            integration: row.integration.trim().to_string(),
            status: row.status,
            is_core: row.is_core,
            sector_id: row.sector_id,
            parent_id: row.parent_id,
        }
    }
}

impl From<SystemStatusRow> for SystemStatus {
    fn from(row: SystemStatusRow) -> Self {
        Self {
            id: row.id,
            component: row.component,
            status: row.status,
            checked_at: row.checked_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Returns every sector, ordered by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_sectors(pool: &PgPool) -> Result<Vec<SectorRow>, DbError> {
    let rows = sqlx::query_as::<_, SectorRow>(
        "SELECT id, name, emoji, description, brand_count, subnode_count \
         FROM sectors \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every brand, ordered by id. Sub-nodes are included; their
/// `parent_id` is set.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_brands(pool: &PgPool) -> Result<Vec<BrandRow>, DbError> {
    let rows = sqlx::query_as::<_, BrandRow>(
        "SELECT id, name, description, integration, status, is_core, sector_id, parent_id \
         FROM brands \
         ORDER BY id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Returns every status record, ordered by component.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_system_status(pool: &PgPool) -> Result<Vec<SystemStatusRow>, DbError> {
    let rows = sqlx::query_as::<_, SystemStatusRow>(
        "SELECT id, component, status, checked_at \
         FROM system_status \
         ORDER BY component, id",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
