//! Catalog entities shared by the store, the sync layer, and the HTTP surface.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A top-level business category grouping brands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sector {
    pub id: i64,
    pub name: String,
    pub emoji: String,
    pub description: String,
    /// Denormalized count maintained by the store; not recomputed here.
    pub brand_count: i32,
    /// Denormalized count maintained by the store; not recomputed here.
    pub subnode_count: i32,
}

/// A catalog element owned by a sector, optionally nested under a parent brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub description: String,
    /// Name of the integration platform that owns this brand. May be empty.
    pub integration: String,
    pub status: String,
    pub is_core: bool,
    pub sector_id: Option<i64>,
    pub parent_id: Option<i64>,
}

impl Brand {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == "active"
    }

    /// A brand nested under another brand.
    #[must_use]
    pub fn is_subnode(&self) -> bool {
        self.parent_id.is_some()
    }
}

/// One health record reported by the upstream store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemStatus {
    pub id: i64,
    pub component: String,
    pub status: String,
    pub checked_at: Option<DateTime<Utc>>,
}

/// Sectors, brands, and status records read together for one sync pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub sectors: Vec<Sector>,
    pub brands: Vec<Brand>,
    pub system_status: Vec<SystemStatus>,
}

impl Snapshot {
    #[must_use]
    pub fn core_brand_count(&self) -> usize {
        self.brands.iter().filter(|b| b.is_core).count()
    }

    #[must_use]
    pub fn subnode_count(&self) -> usize {
        self.brands.iter().filter(|b| b.is_subnode()).count()
    }
}
