//! Fixed dataset served when a primary store read fails.
//!
//! Every `sector_id` and `parent_id` below resolves inside the dataset, so a
//! sync built purely from fallback data scores 100 on integrity.

use ecoportal_core::{Brand, Sector, SystemStatus};

/// `(id, name, emoji, description, brand_count, subnode_count)`
const SECTORS: &[(i64, &str, &str, &str, i32, i32)] = &[
    (1, "Agriculture", "🌾", "Precision farming, crop science and food supply.", 1, 2),
    (2, "Fintech", "💳", "Payments, ledgers and digital banking infrastructure.", 1, 1),
    (4, "Logistics", "🚚", "Freight, fleet and warehouse orchestration.", 1, 2),
    (5, "Energy", "⚡", "Grid, storage and renewable generation.", 1, 0),
];

/// `(id, name, integration, is_core, sector_id, parent_id)`
const BRANDS: &[(i64, &str, &str, bool, Option<i64>, Option<i64>)] = &[
    (101, "AgriVault", "shopify", true, Some(1), None),
    (102, "SeedVault", "shopify", false, Some(1), Some(101)),
    (103, "CropSync", "", false, Some(1), Some(101)),
    (201, "PayVault", "stripe", true, Some(2), None),
    (202, "LedgerSync", "stripe", false, Some(2), Some(201)),
    (401, "FreightFlow", "sap", true, Some(4), None),
    (402, "FleetTrack", "sap", false, Some(4), Some(401)),
    (403, "DataSync", "", false, Some(4), Some(401)),
    (501, "GridPulse", "", true, Some(5), None),
];

/// `(id, component, status)`
const SYSTEM_STATUS: &[(i64, &str, &str)] = &[
    (1, "database", "degraded"),
    (2, "api", "operational"),
    (3, "sync", "operational"),
];

/// Deterministic stand-in for the three store reads.
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackData;

impl FallbackData {
    #[must_use]
    pub fn sectors() -> Vec<Sector> {
        SECTORS
            .iter()
            .map(
                |&(id, name, emoji, description, brand_count, subnode_count)| Sector {
                    id,
                    name: name.to_string(),
                    emoji: emoji.to_string(),
                    description: description.to_string(),
                    brand_count,
                    subnode_count,
                },
            )
            .collect()
    }

    #[must_use]
    pub fn brands() -> Vec<Brand> {
        BRANDS
            .iter()
            .map(
                |&(id, name, integration, is_core, sector_id, parent_id)| Brand {
                    id,
                    name: name.to_string(),
                    description: format!("{name} (offline catalog)"),
                    integration: integration.to_string(),
                    status: "active".to_string(),
                    is_core,
                    sector_id,
                    parent_id,
                },
            )
            .collect()
    }

    /// Status records carry no timestamp; they were never actually checked.
    #[must_use]
    pub fn system_status() -> Vec<SystemStatus> {
        SYSTEM_STATUS
            .iter()
            .map(|&(id, component, status)| SystemStatus {
                id,
                component: component.to_string(),
                status: status.to_string(),
                checked_at: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::integrity::integrity_score;

    #[test]
    fn repeated_calls_return_identical_data() {
        assert_eq!(FallbackData::sectors(), FallbackData::sectors());
        assert_eq!(FallbackData::brands(), FallbackData::brands());
        assert_eq!(FallbackData::system_status(), FallbackData::system_status());
    }

    #[test]
    fn dataset_is_referentially_complete() {
        assert_eq!(
            integrity_score(&FallbackData::sectors(), &FallbackData::brands()),
            100
        );
    }

    #[test]
    fn ids_are_unique() {
        let sector_ids: HashSet<i64> = FallbackData::sectors().iter().map(|s| s.id).collect();
        let brand_ids: HashSet<i64> = FallbackData::brands().iter().map(|b| b.id).collect();
        assert_eq!(sector_ids.len(), SECTORS.len());
        assert_eq!(brand_ids.len(), BRANDS.len());
    }

    #[test]
    fn denormalized_counts_match_brands() {
        let brands = FallbackData::brands();
        for sector in FallbackData::sectors() {
            let owned: Vec<&Brand> = brands
                .iter()
                .filter(|b| b.sector_id == Some(sector.id))
                .collect();
            let core = owned.iter().filter(|b| !b.is_subnode()).count();
            let subnodes = owned.iter().filter(|b| b.is_subnode()).count();
            assert_eq!(usize::try_from(sector.brand_count).ok(), Some(core), "{}", sector.name);
            assert_eq!(
                usize::try_from(sector.subnode_count).ok(),
                Some(subnodes),
                "{}",
                sector.name
            );
        }
    }
}
