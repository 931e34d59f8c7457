//! Cross-reference index over one snapshot.

use std::collections::{HashMap, HashSet};

use ecoportal_core::{Brand, Sector};

use crate::error::SyncError;

/// Four lookup maps derived from one snapshot's sectors and brands.
#[derive(Debug, Clone, Default)]
pub struct CrossReferenceIndex {
    sector_brands: HashMap<i64, Vec<Brand>>,
    brand_sector: HashMap<i64, Sector>,
    parent_children: HashMap<i64, Vec<Brand>>,
    integration_brands: HashMap<String, Vec<Brand>>,
}

impl CrossReferenceIndex {
    /// Build the index in one pass over `brands`.
    ///
    /// A brand is linked to its sector in both directions only when that
    /// sector is present. Parent links are recorded without checking that the
    /// parent brand exists; the integrity score reports those gaps instead.
    ///
    /// # Errors
    ///
    /// Returns [`SyncError::MalformedSnapshot`] if two sectors or two brands
    /// share an id.
    pub fn build(sectors: &[Sector], brands: &[Brand]) -> Result<Self, SyncError> {
        let mut sectors_by_id: HashMap<i64, &Sector> = HashMap::with_capacity(sectors.len());
        for sector in sectors {
            if sectors_by_id.insert(sector.id, sector).is_some() {
                return Err(SyncError::MalformedSnapshot(format!(
                    "duplicate sector id {}",
                    sector.id
                )));
            }
        }

        let mut index = Self::default();
        let mut seen_brands: HashSet<i64> = HashSet::with_capacity(brands.len());

        for brand in brands {
            if !seen_brands.insert(brand.id) {
                return Err(SyncError::MalformedSnapshot(format!(
                    "duplicate brand id {}",
                    brand.id
                )));
            }

            if let Some(sector) = brand.sector_id.and_then(|id| sectors_by_id.get(&id)) {
                index
                    .sector_brands
                    .entry(sector.id)
                    .or_default()
                    .push(brand.clone());
                index.brand_sector.insert(brand.id, (*sector).clone());
            }

            if let Some(parent_id) = brand.parent_id {
                index
                    .parent_children
                    .entry(parent_id)
                    .or_default()
                    .push(brand.clone());
            }

            if !brand.integration.is_empty() {
                index
                    .integration_brands
                    .entry(brand.integration.clone())
                    .or_default()
                    .push(brand.clone());
            }
        }

        Ok(index)
    }

    #[must_use]
    pub fn brands_by_sector(&self, sector_id: i64) -> &[Brand] {
        self.sector_brands.get(&sector_id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn sector_for_brand(&self, brand_id: i64) -> Option<&Sector> {
        self.brand_sector.get(&brand_id)
    }

    #[must_use]
    pub fn subnodes_by_parent(&self, parent_id: i64) -> &[Brand] {
        self.parent_children.get(&parent_id).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn brands_by_integration(&self, tag: &str) -> &[Brand] {
        self.integration_brands.get(tag).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total entries across all four maps.
    #[must_use]
    pub fn cross_reference_count(&self) -> usize {
        bucket_total(&self.sector_brands)
            + self.brand_sector.len()
            + bucket_total(&self.parent_children)
            + bucket_total(&self.integration_brands)
    }

    pub fn sector_ids(&self) -> impl Iterator<Item = i64> + '_ {
        self.sector_brands.keys().copied()
    }

    pub fn integration_tags(&self) -> impl Iterator<Item = &str> {
        self.integration_brands.keys().map(String::as_str)
    }
}

fn bucket_total<K>(map: &HashMap<K, Vec<Brand>>) -> usize {
    map.values().map(Vec::len).sum()
}
