//! Static lookup tables keyed by catalog sector key.
//!
//! Sectors absent from a table fall back to the neutral value documented on
//! each lookup function.

use crate::profile::BusinessStage;
use crate::weights::DEFAULT_STAGE_MULTIPLIER;

/// Infrastructure terms that mark a sub-node as part of a sector's tech stack.
pub const TECH_VOCABULARY: &[&str] = &[
    "vault", "sync", "mesh", "pulse", "flow", "track", "net", "link",
];

/// Sector → sectors it is commercially compatible with. Not symmetric.
pub(crate) const COMPATIBILITY: &[(&str, &[&str])] = &[
    ("agriculture", &["logistics", "biotech", "energy"]),
    ("fintech", &["retail", "real-estate", "healthcare"]),
    ("healthcare", &["biotech", "fintech"]),
    ("logistics", &["retail", "manufacturing", "agriculture"]),
    ("energy", &["manufacturing", "real-estate"]),
    ("education", &["media"]),
    ("retail", &["logistics", "fintech"]),
    ("manufacturing", &["logistics", "energy"]),
    ("media", &["education", "tourism"]),
    ("real-estate", &["fintech", "energy"]),
    ("tourism", &["media", "real-estate"]),
    ("biotech", &["healthcare", "agriculture"]),
    ("space", &["energy", "manufacturing"]),
];

/// Coarse category used for gap-filling.
pub(crate) const CATEGORIES: &[(&str, &str)] = &[
    ("agriculture", "primary"),
    ("energy", "primary"),
    ("manufacturing", "industrial"),
    ("logistics", "industrial"),
    ("space", "industrial"),
    ("fintech", "services"),
    ("real-estate", "services"),
    ("retail", "consumer"),
    ("tourism", "consumer"),
    ("media", "consumer"),
    ("education", "knowledge"),
    ("healthcare", "life-sciences"),
    ("biotech", "life-sciences"),
];

/// Sector → upstream/downstream sectors that complete its supply chain.
pub(crate) const SUPPLY_CHAINS: &[(&str, &[&str])] = &[
    ("agriculture", &["logistics", "energy", "biotech"]),
    ("retail", &["logistics", "manufacturing", "fintech"]),
    ("manufacturing", &["energy", "logistics"]),
    ("healthcare", &["biotech", "logistics"]),
    ("logistics", &["energy", "fintech"]),
    ("energy", &["manufacturing"]),
    ("tourism", &["real-estate", "fintech"]),
    ("media", &["education"]),
    ("biotech", &["healthcare", "manufacturing"]),
    ("space", &["energy", "manufacturing", "logistics"]),
];

const STARTUP_MULTIPLIERS: &[(&str, f64)] = &[
    ("fintech", 0.9),
    ("media", 0.7),
    ("education", 0.7),
    ("retail", 0.6),
];

const GROWTH_MULTIPLIERS: &[(&str, f64)] = &[
    ("logistics", 0.8),
    ("retail", 0.8),
    ("healthcare", 0.7),
    ("fintech", 0.7),
];

const MATURE_MULTIPLIERS: &[(&str, f64)] = &[
    ("manufacturing", 0.8),
    ("energy", 0.8),
    ("real-estate", 0.7),
    ("agriculture", 0.6),
];

const ENTERPRISE_MULTIPLIERS: &[(&str, f64)] = &[
    ("logistics", 0.9),
    ("energy", 0.9),
    ("fintech", 0.8),
    ("space", 0.7),
];

pub(crate) const EMERGING: &[&str] = &["biotech", "space", "fintech", "energy"];
pub(crate) const ESTABLISHED: &[&str] = &["agriculture", "manufacturing", "real-estate", "retail"];

fn lookup<'a, T: Copy>(table: &'a [(&'a str, T)], key: &str) -> Option<T> {
    table.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
}

/// Business compatibility list for a sector; empty when unlisted.
#[must_use]
pub fn compatible_sectors(key: &str) -> &'static [&'static str] {
    lookup(COMPATIBILITY, key).unwrap_or(&[])
}

#[must_use]
pub fn category(key: &str) -> Option<&'static str> {
    lookup(CATEGORIES, key)
}

/// Supply chain for a sector; empty when unlisted.
#[must_use]
pub fn supply_chain(key: &str) -> &'static [&'static str] {
    lookup(SUPPLY_CHAINS, key).unwrap_or(&[])
}

/// Stage multiplier for a sector, [`DEFAULT_STAGE_MULTIPLIER`] when the stage
/// is unknown or the sector has no entry for it.
#[must_use]
pub fn stage_multiplier(stage: Option<BusinessStage>, key: &str) -> f64 {
    let table = match stage {
        Some(BusinessStage::Startup) => STARTUP_MULTIPLIERS,
        Some(BusinessStage::Growth) => GROWTH_MULTIPLIERS,
        Some(BusinessStage::Mature) => MATURE_MULTIPLIERS,
        Some(BusinessStage::Enterprise) => ENTERPRISE_MULTIPLIERS,
        None => return DEFAULT_STAGE_MULTIPLIER,
    };
    lookup(table, key).unwrap_or(DEFAULT_STAGE_MULTIPLIER)
}

#[must_use]
pub fn is_emerging(key: &str) -> bool {
    EMERGING.iter().any(|k| *k == key)
}

#[must_use]
pub fn is_established(key: &str) -> bool {
    ESTABLISHED.iter().any(|k| *k == key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sector_gets_neutral_values() {
        assert!(compatible_sectors("crafts").is_empty());
        assert!(supply_chain("crafts").is_empty());
        assert_eq!(category("crafts"), None);
        assert!(!is_emerging("crafts"));
        assert!(!is_established("crafts"));
        assert!(
            (stage_multiplier(Some(BusinessStage::Mature), "crafts") - DEFAULT_STAGE_MULTIPLIER)
                .abs()
                < f64::EPSILON
        );
    }

    #[test]
    fn stage_multiplier_defaults_when_stage_missing() {
        assert!((stage_multiplier(None, "fintech") - DEFAULT_STAGE_MULTIPLIER).abs() < f64::EPSILON);
        assert!((stage_multiplier(Some(BusinessStage::Startup), "fintech") - 0.9).abs() < f64::EPSILON);
    }

    #[test]
    fn compatibility_is_directional() {
        assert!(compatible_sectors("education").contains(&"media"));
        assert!(compatible_sectors("media").contains(&"education"));
        assert!(compatible_sectors("space").contains(&"energy"));
        assert!(!compatible_sectors("energy").contains(&"space"));
    }

    #[test]
    fn emerging_and_established_are_disjoint() {
        for key in EMERGING {
            assert!(!ESTABLISHED.contains(key), "{key} is in both lists");
        }
    }

    #[test]
    fn tables_reference_only_catalog_keys() {
        let known = [
            "agriculture", "fintech", "healthcare", "logistics", "energy", "education",
            "retail", "manufacturing", "media", "real-estate", "tourism", "biotech", "space",
        ];
        let referenced = COMPATIBILITY
            .iter()
            .chain(SUPPLY_CHAINS)
            .flat_map(|(k, vs)| std::iter::once(k).chain(vs.iter()));
        for key in referenced {
            assert!(known.contains(key), "unknown sector key in table: {key}");
        }
    }
}
