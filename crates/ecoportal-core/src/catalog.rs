//! Static sector catalog used to build the recommendation relationship graph.
//!
//! The catalog is bundled as YAML (`config/catalog.yaml`) and loaded once at
//! startup; it is independent of whatever the live store currently holds.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogBrand {
    pub name: String,
    #[serde(default)]
    pub subnodes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSector {
    /// Stable lower-case identifier, e.g. `agriculture`.
    pub key: String,
    /// Numeric id mirroring the store's sector id, when one exists.
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    #[serde(default)]
    pub emoji: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub brands: Vec<CatalogBrand>,
}

impl CatalogSector {
    /// All sub-node names across this sector's brands, in catalog order.
    pub fn subnode_names(&self) -> impl Iterator<Item = &str> {
        self.brands
            .iter()
            .flat_map(|b| b.subnodes.iter().map(String::as_str))
    }

    #[must_use]
    pub fn subnode_count(&self) -> usize {
        self.brands.iter().map(|b| b.subnodes.len()).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub sectors: Vec<CatalogSector>,
}

impl Catalog {
    #[must_use]
    pub fn sector(&self, key: &str) -> Option<&CatalogSector> {
        self.sectors.iter().find(|s| s.key == key)
    }
}

/// Load and validate the sector catalog from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::CatalogFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_catalog(&content)
}

/// Parse and validate a catalog from YAML text.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_catalog(yaml: &str) -> Result<Catalog, ConfigError> {
    let catalog: Catalog = serde_yaml::from_str(yaml)?;
    validate_catalog(&catalog)?;
    Ok(catalog)
}

fn validate_catalog(catalog: &Catalog) -> Result<(), ConfigError> {
    let mut seen_keys = HashSet::new();
    let mut seen_ids = HashSet::new();

    for sector in &catalog.sectors {
        if sector.key.trim().is_empty() {
            return Err(ConfigError::Validation(
                "sector key must be non-empty".to_string(),
            ));
        }

        if sector.key.chars().any(|c| c.is_whitespace() || c.is_uppercase()) {
            return Err(ConfigError::Validation(format!(
                "sector key '{}' must be lower-case with no whitespace",
                sector.key
            )));
        }

        if sector.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "sector '{}' has an empty name",
                sector.key
            )));
        }

        if !seen_keys.insert(sector.key.as_str()) {
            return Err(ConfigError::Validation(format!(
                "duplicate sector key: '{}'",
                sector.key
            )));
        }

        if let Some(id) = sector.id {
            if !seen_ids.insert(id) {
                return Err(ConfigError::Validation(format!(
                    "duplicate sector id {id} (on sector '{}')",
                    sector.key
                )));
            }
        }

        if let Some(brand) = sector.brands.iter().find(|b| b.name.trim().is_empty()) {
            return Err(ConfigError::Validation(format!(
                "sector '{}' has a brand with an empty name (subnodes: {:?})",
                sector.key, brand.subnodes
            )));
        }
    }

    Ok(())
}
