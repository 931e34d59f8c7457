//! Directed sector-to-sector relationship graph.
//!
//! Built once from the static catalog and never mutated afterwards. An edge
//! `a -> b` is evaluated independently of `b -> a`, so the graph is not
//! symmetric: keyword and technology overlap both count matches from the
//! source's side, and the compatibility table is one-directional.

use std::collections::{BTreeMap, BTreeSet};

use ecoportal_core::{Catalog, CatalogSector};

use crate::tables::{compatible_sectors, TECH_VOCABULARY};
use crate::weights::{
    COMPATIBILITY_EDGE_THRESHOLD, COMPATIBLE, INCOMPATIBLE, KEYWORD_EDGE_MIN, TECH_EDGE_THRESHOLD,
};

/// Lower-cased matching vocabulary derived from one catalog sector.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct SectorFeatures {
    /// Brand names, sub-node names, sector name, and sector key.
    pub keywords: BTreeSet<String>,
    /// Sub-node names containing a [`TECH_VOCABULARY`] term.
    pub tech_terms: BTreeSet<String>,
    /// Brands plus sub-nodes.
    pub portfolio_size: usize,
}

impl SectorFeatures {
    fn from_sector(sector: &CatalogSector) -> Self {
        let mut keywords = BTreeSet::new();
        let mut push = |raw: &str| {
            let word = raw.trim().to_lowercase();
            if !word.is_empty() {
                keywords.insert(word);
            }
        };

        push(&sector.key);
        push(&sector.name);
        for brand in &sector.brands {
            push(&brand.name);
            for subnode in &brand.subnodes {
                push(subnode);
            }
        }

        let tech_terms = sector
            .subnode_names()
            .map(|name| name.trim().to_lowercase())
            .filter(|name| TECH_VOCABULARY.iter().any(|term| name.contains(term)))
            .collect();

        Self {
            keywords,
            tech_terms,
            portfolio_size: sector.brands.len() + sector.subnode_count(),
        }
    }
}

/// Two entries match when either contains the other.
fn substring_match(a: &str, b: &str) -> bool {
    a.contains(b) || b.contains(a)
}

/// Number of entries in `a` that match at least one entry in `b`.
pub(crate) fn count_matches(a: &BTreeSet<String>, b: &BTreeSet<String>) -> usize {
    a.iter()
        .filter(|x| b.iter().any(|y| substring_match(x, y)))
        .count()
}

#[allow(clippy::cast_precision_loss)]
fn tech_ratio(a: &BTreeSet<String>, b: &BTreeSet<String>) -> f64 {
    let denominator = a.len().max(b.len()).max(1);
    count_matches(a, b) as f64 / denominator as f64
}

/// Business compatibility of `to` from the point of view of `from`.
#[must_use]
pub fn business_compatibility(from: &str, to: &str) -> f64 {
    if compatible_sectors(from).iter().any(|k| *k == to) {
        COMPATIBLE
    } else {
        INCOMPATIBLE
    }
}

#[derive(Debug, Clone, Default)]
pub struct SectorRelationshipGraph {
    features: BTreeMap<String, SectorFeatures>,
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl SectorRelationshipGraph {
    /// Evaluate every ordered pair of distinct catalog sectors.
    #[must_use]
    pub fn build(catalog: &Catalog) -> Self {
        let features: BTreeMap<String, SectorFeatures> = catalog
            .sectors
            .iter()
            .map(|s| (s.key.clone(), SectorFeatures::from_sector(s)))
            .collect();

        let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (from, from_features) in &features {
            let related = edges.entry(from.clone()).or_default();
            for (to, to_features) in &features {
                if from == to {
                    continue;
                }

                let keyword_overlap = count_matches(&from_features.keywords, &to_features.keywords);
                let tech_overlap = tech_ratio(&from_features.tech_terms, &to_features.tech_terms);
                let compatibility = business_compatibility(from, to);

                if keyword_overlap >= KEYWORD_EDGE_MIN
                    || tech_overlap > TECH_EDGE_THRESHOLD
                    || compatibility > COMPATIBILITY_EDGE_THRESHOLD
                {
                    related.insert(to.clone());
                }
            }
        }

        let edge_count: usize = edges.values().map(BTreeSet::len).sum();
        tracing::debug!(
            sectors = features.len(),
            edges = edge_count,
            "built sector relationship graph"
        );

        Self { features, edges }
    }

    /// Whether the directed edge `from -> to` exists.
    #[must_use]
    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.edges.get(from).is_some_and(|r| r.contains(to))
    }

    /// Sectors reachable by one edge from `key`, in key order.
    pub fn related(&self, key: &str) -> impl Iterator<Item = &str> {
        self.edges
            .get(key)
            .into_iter()
            .flat_map(|r| r.iter().map(String::as_str))
    }

    #[must_use]
    pub fn adjacency(&self) -> &BTreeMap<String, BTreeSet<String>> {
        &self.edges
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.features.contains_key(key)
    }

    /// Catalog sector keys, in key order.
    pub fn sector_keys(&self) -> impl Iterator<Item = &str> {
        self.features.keys().map(String::as_str)
    }

    /// Count of `a`'s keywords that match a keyword of `b`; 0 for unknown keys.
    #[must_use]
    pub fn keyword_overlap(&self, a: &str, b: &str) -> usize {
        match (self.features.get(a), self.features.get(b)) {
            (Some(fa), Some(fb)) => count_matches(&fa.keywords, &fb.keywords),
            _ => 0,
        }
    }

    /// Technology-stack overlap ratio of `a` against `b`; 0.0 for unknown keys.
    #[must_use]
    pub fn tech_overlap(&self, a: &str, b: &str) -> f64 {
        match (self.features.get(a), self.features.get(b)) {
            (Some(fa), Some(fb)) => tech_ratio(&fa.tech_terms, &fb.tech_terms),
            _ => 0.0,
        }
    }

    pub(crate) fn features(&self, key: &str) -> Option<&SectorFeatures> {
        self.features.get(key)
    }

    /// Largest brand-plus-sub-node count across the catalog.
    pub(crate) fn max_portfolio_size(&self) -> usize {
        self.features
            .values()
            .map(|f| f.portfolio_size)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use ecoportal_core::CatalogBrand;

    use super::*;

    fn sector(key: &str, brands: Vec<(&str, Vec<&str>)>) -> CatalogSector {
        CatalogSector {
            key: key.to_string(),
            id: None,
            name: key.to_string(),
            emoji: String::new(),
            description: String::new(),
            brands: brands
                .into_iter()
                .map(|(name, subnodes)| CatalogBrand {
                    name: name.to_string(),
                    subnodes: subnodes.into_iter().map(str::to_string).collect(),
                })
                .collect(),
        }
    }

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn count_matches_is_bidirectional_substring() {
        let a = set(&["farm", "orbital"]);
        let b = set(&["farmland", "orbit"]);
        assert_eq!(count_matches(&a, &b), 2);
    }

    #[test]
    fn tech_ratio_divides_by_larger_side() {
        let a = set(&["datasync"]);
        let b = set(&["datasync", "fleettrack", "cargolink", "dockmesh"]);
        assert!((tech_ratio(&a, &b) - 0.25).abs() < 1e-9);
        assert!((tech_ratio(&b, &a) - 0.25).abs() < 1e-9);
    }

    #[test]
    fn tech_ratio_of_two_empty_sets_is_zero() {
        assert!(tech_ratio(&BTreeSet::new(), &BTreeSet::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn features_keep_only_tech_subnodes() {
        let features = SectorFeatures::from_sector(&sector(
            "crafts",
            vec![("Artisan Guild", vec!["Pottery Studio", "LoomSync"])],
        ));
        assert_eq!(features.tech_terms, set(&["loomsync"]));
        assert!(features.keywords.contains("artisan guild"));
        assert!(features.keywords.contains("pottery studio"));
        assert!(features.keywords.contains("crafts"));
        assert_eq!(features.portfolio_size, 3);
    }

    #[test]
    fn shared_tech_stack_creates_edge() {
        let catalog = Catalog {
            sectors: vec![
                sector("alpha", vec![("A1", vec!["DataSync", "RouteTrack"])]),
                sector("beta", vec![("B1", vec!["DataSync", "ShelfTrack"])]),
            ],
        };
        let graph = SectorRelationshipGraph::build(&catalog);
        assert!(graph.has_edge("alpha", "beta"));
        assert!(graph.has_edge("beta", "alpha"));
        assert!((graph.tech_overlap("alpha", "beta") - 0.5).abs() < 1e-9);
    }

    #[test]
    fn unrelated_sectors_have_no_edge() {
        let catalog = Catalog {
            sectors: vec![
                sector("pottery", vec![("Kiln Works", vec!["Glaze Studio"])]),
                sector("aviation", vec![("Jet Group", vec!["Hangar Ops"])]),
            ],
        };
        let graph = SectorRelationshipGraph::build(&catalog);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.related("pottery").count(), 0);
    }

    #[test]
    fn compatibility_table_creates_one_directional_edge() {
        // space lists energy as compatible; energy does not list space.
        let catalog = Catalog {
            sectors: vec![
                sector("space", vec![("Orbit Co", vec![])]),
                sector("energy", vec![("Grid Co", vec![])]),
            ],
        };
        let graph = SectorRelationshipGraph::build(&catalog);
        assert!(graph.has_edge("space", "energy"));
        assert!(!graph.has_edge("energy", "space"));
    }

    #[test]
    fn keyword_overlap_can_be_asymmetric() {
        // "solar" and "solar farm" both match "solar farms"; "wind" matches nothing.
        let catalog = Catalog {
            sectors: vec![
                sector("one", vec![("Solar", vec![]), ("Solar Farm", vec![])]),
                sector("two", vec![("Solar Farms", vec![])]),
            ],
        };
        let graph = SectorRelationshipGraph::build(&catalog);
        assert_eq!(graph.keyword_overlap("one", "two"), 2);
        assert_eq!(graph.keyword_overlap("two", "one"), 1);
        assert!(graph.has_edge("one", "two"));
        assert!(!graph.has_edge("two", "one"));
    }

    #[test]
    fn unknown_keys_score_zero() {
        let graph = SectorRelationshipGraph::build(&Catalog::default());
        assert_eq!(graph.keyword_overlap("x", "y"), 0);
        assert!(graph.tech_overlap("x", "y").abs() < f64::EPSILON);
        assert!(!graph.has_edge("x", "y"));
        assert_eq!(graph.max_portfolio_size(), 0);
    }

    #[test]
    fn bundled_catalog_graph_is_asymmetric_somewhere() {
        let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../config/catalog.yaml");
        let catalog = ecoportal_core::load_catalog(&path).expect("catalog");
        let graph = SectorRelationshipGraph::build(&catalog);
        assert!(graph.edge_count() > 0);
        let asymmetric = graph
            .adjacency()
            .iter()
            .flat_map(|(from, tos)| tos.iter().map(move |to| (from, to)))
            .any(|(from, to)| !graph.has_edge(to, from));
        assert!(asymmetric, "expected at least one one-directional edge");
    }
}
