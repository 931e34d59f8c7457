//! Weighted multi-factor sector recommendations.

use std::collections::BTreeSet;
use std::path::Path;

use chrono::{DateTime, Duration, Utc};
use ecoportal_core::Catalog;
use serde::{Deserialize, Serialize};

use crate::error::RecommendError;
use crate::graph::SectorRelationshipGraph;
use crate::profile::{RiskTolerance, UserProfile};
use crate::tables::{category, is_emerging, is_established, stage_multiplier, supply_chain};
use crate::weights::{
    CATEGORY_ALREADY_COVERED, CATEGORY_GAP_FILLED, CATEGORY_UNKNOWN, COMPLEMENTARY_REASON_THRESHOLD,
    COMPLEMENTARY_WEIGHT, CONFIDENCE_INTEREST_WEIGHT, CONFIDENCE_STRATEGIC_WEIGHT,
    CONFIDENCE_SYNERGY_WEIGHT, GRAPH_EDGE_SYNERGY, INCLUSION_THRESHOLD, INTEREST_REASON_THRESHOLD,
    INTEREST_WEIGHT, MAX_CONFIDENCE, MIN_QUERY_TOKEN_LEN, NEUTRAL_SYNERGY, PORTFOLIO_WEIGHT,
    RECENT_INTERACTION_BONUS, RECENT_INTERACTION_CAP, RECENT_WINDOW_HOURS, RISK_BONUS,
    SEARCH_MATCH_WEIGHT, STAGE_WEIGHT, STRATEGIC_REASON_THRESHOLD, STRATEGIC_WEIGHT,
    SYNERGY_REASON_THRESHOLD, SYNERGY_WEIGHT,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreCategory {
    Synergy,
    Complementary,
    Expansion,
    Strategic,
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoreCategory::Synergy => write!(f, "synergy"),
            ScoreCategory::Complementary => write!(f, "complementary"),
            ScoreCategory::Expansion => write!(f, "expansion"),
            ScoreCategory::Strategic => write!(f, "strategic"),
        }
    }
}

/// The four sub-scores, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub synergy: f64,
    pub interest: f64,
    pub strategic: f64,
    pub complementary: f64,
}

impl ScoreBreakdown {
    fn total(&self) -> f64 {
        (self.synergy * SYNERGY_WEIGHT
            + self.interest * INTEREST_WEIGHT
            + self.strategic * STRATEGIC_WEIGHT
            + self.complementary * COMPLEMENTARY_WEIGHT)
            .clamp(0.0, 1.0)
    }

    fn confidence(&self) -> f64 {
        (self.synergy * CONFIDENCE_SYNERGY_WEIGHT
            + self.interest * CONFIDENCE_INTEREST_WEIGHT
            + self.strategic * CONFIDENCE_STRATEGIC_WEIGHT)
            .min(MAX_CONFIDENCE)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationScore {
    /// Catalog sector key.
    pub sector: String,
    pub name: String,
    pub emoji: String,
    /// Weighted total in `[0, 1]`.
    pub score: f64,
    pub reasoning: Vec<String>,
    /// In `[0, 0.95]`.
    pub confidence: f64,
    pub category: ScoreCategory,
    pub breakdown: ScoreBreakdown,
}

/// Ranks catalog sectors for a user. Holds the relationship graph, which is
/// built once in [`RecommendationEngine::new`] and never changes.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: Catalog,
    graph: SectorRelationshipGraph,
    max_portfolio_size: usize,
}

impl RecommendationEngine {
    /// Build the engine and its relationship graph from a catalog.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::EmptyCatalog`] if the catalog has no sectors.
    pub fn new(catalog: Catalog) -> Result<Self, RecommendError> {
        if catalog.sectors.is_empty() {
            return Err(RecommendError::EmptyCatalog);
        }
        let graph = SectorRelationshipGraph::build(&catalog);
        let max_portfolio_size = graph.max_portfolio_size();
        tracing::info!(
            sectors = catalog.sectors.len(),
            edges = graph.edge_count(),
            "recommendation engine ready"
        );
        Ok(Self {
            catalog,
            graph,
            max_portfolio_size,
        })
    }

    /// Load the catalog YAML at `path` and build the engine.
    ///
    /// # Errors
    ///
    /// Returns [`RecommendError::Catalog`] if the file cannot be loaded, or
    /// [`RecommendError::EmptyCatalog`] if it lists no sectors.
    pub fn from_catalog_path(path: &Path) -> Result<Self, RecommendError> {
        Self::new(ecoportal_core::load_catalog(path)?)
    }

    #[must_use]
    pub fn graph(&self) -> &SectorRelationshipGraph {
        &self.graph
    }

    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Ranked recommendations using the current wall clock for recency.
    #[must_use]
    pub fn generate_recommendations(
        &self,
        profile: &UserProfile,
        max_results: usize,
    ) -> Vec<RecommendationScore> {
        self.generate_recommendations_at(profile, max_results, Utc::now())
    }

    /// Ranked recommendations with an explicit clock.
    ///
    /// Excludes selected sectors and anything scoring at or below
    /// [`INCLUSION_THRESHOLD`]; sorted by score descending, ties by sector key.
    #[must_use]
    pub fn generate_recommendations_at(
        &self,
        profile: &UserProfile,
        max_results: usize,
        now: DateTime<Utc>,
    ) -> Vec<RecommendationScore> {
        let mut ranked: Vec<RecommendationScore> = self
            .score_candidates_at(profile, now)
            .into_iter()
            .filter(|s| s.score > INCLUSION_THRESHOLD)
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.sector.cmp(&b.sector))
        });
        ranked.truncate(max_results);
        ranked
    }

    /// Score every unselected catalog sector, in key order, without filtering.
    #[must_use]
    pub fn score_candidates_at(
        &self,
        profile: &UserProfile,
        now: DateTime<Utc>,
    ) -> Vec<RecommendationScore> {
        self.graph
            .sector_keys()
            .filter(|key| !profile.has_selected(key))
            .filter_map(|key| self.score_sector_at(profile, key, now))
            .collect()
    }

    /// Score one sector. Returns `None` if `key` is not in the catalog.
    #[must_use]
    pub fn score_sector_at(
        &self,
        profile: &UserProfile,
        key: &str,
        now: DateTime<Utc>,
    ) -> Option<RecommendationScore> {
        let sector = self.catalog.sector(key)?;

        let breakdown = ScoreBreakdown {
            synergy: self.synergy(profile, key),
            interest: self.interest(profile, key, now),
            strategic: self.strategic(profile, key),
            complementary: complementary(profile, key),
        };

        let (reasoning, category) = self.explain_breakdown(profile, key, &breakdown);

        Some(RecommendationScore {
            sector: key.to_string(),
            name: sector.name.clone(),
            emoji: sector.emoji.clone(),
            score: breakdown.total(),
            reasoning,
            confidence: breakdown.confidence(),
            category,
            breakdown,
        })
    }

    fn synergy(&self, profile: &UserProfile, key: &str) -> f64 {
        if profile.selected_sectors.is_empty() {
            return NEUTRAL_SYNERGY;
        }

        profile
            .selected_sectors
            .iter()
            .map(|selected| {
                if self.graph.has_edge(key, selected) {
                    GRAPH_EDGE_SYNERGY
                } else {
                    self.graph.tech_overlap(key, selected)
                }
            })
            .fold(0.0, f64::max)
    }

    #[allow(clippy::cast_precision_loss)]
    fn interest(&self, profile: &UserProfile, key: &str, now: DateTime<Utc>) -> f64 {
        let Some(features) = self.graph.features(key) else {
            return 0.0;
        };

        let mut score = 0.0;

        let total = features.keywords.len();
        if total > 0 {
            for query in &profile.search_history {
                let matched = matching_keywords(query, &features.keywords);
                if matched > 0 {
                    score += SEARCH_MATCH_WEIGHT * matched as f64 / total as f64;
                }
            }
        }

        let cutoff = now - Duration::hours(RECENT_WINDOW_HOURS);
        let recent = profile
            .interaction_history
            .iter()
            .filter(|i| i.timestamp > cutoff && i.timestamp <= now)
            .filter(|i| i.sector == key || self.graph.keyword_overlap(&i.sector, key) > 0)
            .count();
        score += (recent as f64 * RECENT_INTERACTION_BONUS).min(RECENT_INTERACTION_CAP);

        score.min(1.0)
    }

    #[allow(clippy::cast_precision_loss)]
    fn strategic(&self, profile: &UserProfile, key: &str) -> f64 {
        let stage = stage_multiplier(profile.preferences.business_stage, key) * STAGE_WEIGHT;

        let portfolio_size = self.graph.features(key).map_or(0, |f| f.portfolio_size);
        let portfolio_ratio = if self.max_portfolio_size == 0 {
            0.0
        } else {
            portfolio_size as f64 / self.max_portfolio_size as f64
        };
        let portfolio = portfolio_ratio * PORTFOLIO_WEIGHT;

        let risk = match profile.preferences.risk_tolerance {
            RiskTolerance::High if is_emerging(key) => RISK_BONUS,
            RiskTolerance::Low if is_established(key) => RISK_BONUS,
            _ => 0.0,
        };

        (stage + portfolio + risk).min(1.0)
    }

    fn explain_breakdown(
        &self,
        profile: &UserProfile,
        key: &str,
        breakdown: &ScoreBreakdown,
    ) -> (Vec<String>, ScoreCategory) {
        let mut reasoning = Vec::new();
        let mut category = None;

        if breakdown.synergy > SYNERGY_REASON_THRESHOLD {
            let linked: Vec<&str> = profile
                .selected_sectors
                .iter()
                .filter(|s| self.graph.has_edge(key, s))
                .map(|s| self.display_name(s))
                .collect();
            if linked.is_empty() {
                reasoning.push("Shares core technology with your selected sectors".to_string());
            } else {
                reasoning.push(format!("Strong synergy with {}", linked.join(", ")));
            }
            category.get_or_insert(ScoreCategory::Synergy);
        }

        if breakdown.interest > INTEREST_REASON_THRESHOLD {
            reasoning.push("Matches your recent searches and activity".to_string());
        }

        if breakdown.strategic > STRATEGIC_REASON_THRESHOLD {
            match profile.preferences.business_stage {
                Some(stage) => {
                    reasoning.push(format!("High strategic value for {stage}-stage businesses"));
                }
                None => reasoning.push("High strategic value for your business".to_string()),
            }
            category.get_or_insert(ScoreCategory::Strategic);
        }

        if breakdown.complementary > COMPLEMENTARY_REASON_THRESHOLD {
            reasoning.push("Fills a gap in your sector portfolio".to_string());
            category.get_or_insert(ScoreCategory::Complementary);
        }

        if reasoning.is_empty() {
            reasoning.push(format!(
                "Expands your ecosystem into {}",
                self.display_name(key)
            ));
        }

        (reasoning, category.unwrap_or(ScoreCategory::Expansion))
    }

    fn display_name<'a>(&'a self, key: &'a str) -> &'a str {
        self.catalog.sector(key).map_or(key, |s| s.name.as_str())
    }
}

#[allow(clippy::cast_precision_loss)]
fn complementary(profile: &UserProfile, key: &str) -> f64 {
    let gap = match category(key) {
        None => CATEGORY_UNKNOWN,
        Some(cat)
            if profile
                .selected_sectors
                .iter()
                .any(|s| category(s) == Some(cat)) =>
        {
            CATEGORY_ALREADY_COVERED
        }
        Some(_) => CATEGORY_GAP_FILLED,
    };

    let chain = supply_chain(key);
    let completeness = if chain.is_empty() {
        0.0
    } else {
        let present = chain.iter().filter(|s| profile.has_selected(s)).count();
        present as f64 / chain.len() as f64
    };

    (gap + completeness) / 2.0
}

/// Number of `keywords` that a free-text query mentions.
///
/// A keyword matches when the whole query contains it, or when it contains
/// one of the query's tokens of at least [`MIN_QUERY_TOKEN_LEN`] characters.
fn matching_keywords(query: &str, keywords: &BTreeSet<String>) -> usize {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return 0;
    }

    let tokens: Vec<&str> = query
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_QUERY_TOKEN_LEN)
        .collect();

    keywords
        .iter()
        .filter(|k| query.contains(k.as_str()) || tokens.iter().any(|t| k.contains(t)))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{BusinessStage, Interaction};
    use crate::weights::DEFAULT_MAX_RESULTS;

    fn engine() -> RecommendationEngine {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../config/catalog.yaml");
        RecommendationEngine::from_catalog_path(&path).expect("engine")
    }

    fn now() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-01T12:00:00Z")
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    fn profile_with(selected: &[&str]) -> UserProfile {
        UserProfile {
            selected_sectors: selected.iter().map(|s| (*s).to_string()).collect(),
            ..UserProfile::default()
        }
    }

    fn keywords(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn empty_catalog_is_rejected() {
        let err = RecommendationEngine::new(Catalog::default()).unwrap_err();
        assert!(matches!(err, RecommendError::EmptyCatalog));
    }

    #[test]
    fn synergy_is_neutral_without_selections() {
        let engine = engine();
        let scores = engine.score_candidates_at(&UserProfile::default(), now());
        assert_eq!(scores.len(), engine.catalog().sectors.len());
        for score in scores {
            assert!(
                (score.breakdown.synergy - NEUTRAL_SYNERGY).abs() < f64::EPSILON,
                "{} synergy was {}",
                score.sector,
                score.breakdown.synergy
            );
        }
    }

    #[test]
    fn graph_edge_gives_edge_synergy() {
        let engine = engine();
        // space lists energy in its compatibility table.
        assert!(engine.graph().has_edge("space", "energy"));
        let score = engine
            .score_sector_at(&profile_with(&["energy"]), "space", now())
            .expect("space scored");
        assert!((score.breakdown.synergy - GRAPH_EDGE_SYNERGY).abs() < f64::EPSILON);
        assert_eq!(score.category, ScoreCategory::Synergy);
        assert!(score.reasoning[0].contains("Energy"));
    }

    #[test]
    fn unrelated_candidate_scores_strategic_only_and_is_excluded() {
        let engine = engine();
        let profile = UserProfile {
            selected_sectors: keywords(&["space"]),
            preferences: crate::profile::Preferences {
                business_stage: Some(BusinessStage::Mature),
                ..Default::default()
            },
            ..UserProfile::default()
        };

        let score = engine
            .score_sector_at(&profile, "crafts", now())
            .expect("crafts scored");
        assert!(score.breakdown.synergy.abs() < f64::EPSILON);
        assert!(score.breakdown.interest.abs() < f64::EPSILON);
        assert!(score.breakdown.complementary.abs() < f64::EPSILON);
        assert!((score.score - STRATEGIC_WEIGHT * score.breakdown.strategic).abs() < 1e-9);
        assert!(score.score <= INCLUSION_THRESHOLD);
        assert_eq!(score.category, ScoreCategory::Expansion);

        let recs = engine.generate_recommendations_at(&profile, DEFAULT_MAX_RESULTS, now());
        assert!(recs.iter().all(|r| r.sector != "crafts"));
    }

    #[test]
    fn results_are_sorted_bounded_and_exclude_selected() {
        let engine = engine();
        let profile = UserProfile {
            selected_sectors: keywords(&["fintech", "logistics"]),
            search_history: vec!["solar grid storage".to_string()],
            preferences: crate::profile::Preferences {
                risk_tolerance: RiskTolerance::High,
                business_stage: Some(BusinessStage::Enterprise),
                ..Default::default()
            },
            ..UserProfile::default()
        };

        let recs = engine.generate_recommendations_at(&profile, 5, now());
        assert!(!recs.is_empty());
        assert!(recs.len() <= 5);
        for pair in recs.windows(2) {
            assert!(pair[0].score >= pair[1].score);
        }
        for rec in &recs {
            assert!(!profile.has_selected(&rec.sector));
            assert!(rec.score > INCLUSION_THRESHOLD && rec.score <= 1.0);
            assert!((0.0..=MAX_CONFIDENCE).contains(&rec.confidence));
            assert!(!rec.reasoning.is_empty());
        }
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let engine = engine();
        let profile = profile_with(&["agriculture"]);
        let first = engine.generate_recommendations_at(&profile, DEFAULT_MAX_RESULTS, now());
        let second = engine.generate_recommendations_at(&profile, DEFAULT_MAX_RESULTS, now());
        assert_eq!(first, second);
    }

    #[test]
    fn zero_max_results_returns_nothing() {
        let engine = engine();
        assert!(engine
            .generate_recommendations_at(&UserProfile::default(), 0, now())
            .is_empty());
    }

    #[test]
    fn search_history_raises_interest() {
        let engine = engine();
        let base = engine
            .score_sector_at(&UserProfile::default(), "energy", now())
            .expect("energy");
        let searching = UserProfile {
            search_history: vec!["grid pulse metering".to_string()],
            ..UserProfile::default()
        };
        let boosted = engine
            .score_sector_at(&searching, "energy", now())
            .expect("energy");
        assert!(base.breakdown.interest.abs() < f64::EPSILON);
        assert!(boosted.breakdown.interest > 0.0);
        assert!(boosted.score > base.score);
    }

    #[test]
    fn recent_interactions_are_capped() {
        let engine = engine();
        let recent = now() - Duration::hours(1);
        let profile = UserProfile {
            interaction_history: (0..10)
                .map(|_| Interaction {
                    sector: "biotech".to_string(),
                    timestamp: recent,
                    action: "view".to_string(),
                })
                .collect(),
            ..UserProfile::default()
        };
        let score = engine
            .score_sector_at(&profile, "biotech", now())
            .expect("biotech");
        assert!((score.breakdown.interest - RECENT_INTERACTION_CAP).abs() < 1e-9);
    }

    #[test]
    fn stale_interactions_are_ignored() {
        let engine = engine();
        let profile = UserProfile {
            interaction_history: vec![Interaction {
                sector: "biotech".to_string(),
                timestamp: now() - Duration::hours(RECENT_WINDOW_HOURS + 1),
                action: "view".to_string(),
            }],
            ..UserProfile::default()
        };
        let score = engine
            .score_sector_at(&profile, "biotech", now())
            .expect("biotech");
        assert!(score.breakdown.interest.abs() < f64::EPSILON);
    }

    #[test]
    fn risk_tolerance_gates_bonus() {
        let engine = engine();
        let mut profile = UserProfile::default();
        let medium = engine.score_sector_at(&profile, "biotech", now()).expect("biotech");
        profile.preferences.risk_tolerance = RiskTolerance::High;
        let high = engine.score_sector_at(&profile, "biotech", now()).expect("biotech");
        assert!(
            (high.breakdown.strategic - medium.breakdown.strategic - RISK_BONUS).abs() < 1e-9
        );
    }

    #[test]
    fn complementary_rewards_category_gap_and_supply_chain() {
        // agriculture (primary) with logistics + energy of its chain selected;
        // energy is also primary, so the category is already covered.
        let covered = complementary(&profile_with(&["logistics", "energy"]), "agriculture");
        assert!((covered - (CATEGORY_ALREADY_COVERED + 2.0 / 3.0) / 2.0).abs() < 1e-9);

        let gap = complementary(&profile_with(&["fintech"]), "agriculture");
        assert!((gap - CATEGORY_GAP_FILLED / 2.0).abs() < 1e-9);
    }

    #[test]
    fn stage_and_risk_fit_make_a_strategic_pick() {
        let engine = engine();
        let profile = UserProfile {
            selected_sectors: keywords(&["crafts"]),
            preferences: crate::profile::Preferences {
                risk_tolerance: RiskTolerance::High,
                business_stage: Some(BusinessStage::Enterprise),
                ..Default::default()
            },
            ..UserProfile::default()
        };

        let score = engine
            .score_sector_at(&profile, "energy", now())
            .expect("energy scored");

        // 0.9 * 0.4 stage + 6/9 * 0.3 portfolio + 0.3 emerging bonus.
        assert!((score.breakdown.strategic - 0.86).abs() < 1e-9);
        assert!(score.breakdown.synergy <= SYNERGY_REASON_THRESHOLD);
        assert_eq!(score.category, ScoreCategory::Strategic);
        assert_eq!(
            score.reasoning,
            vec!["High strategic value for enterprise-stage businesses".to_string()]
        );
    }

    #[test]
    fn supply_chain_gap_alone_is_complementary() {
        let engine = engine();
        // tourism has no edge to fintech; fintech covers half its chain and
        // sits in another category.
        assert!(!engine.graph().has_edge("tourism", "fintech"));

        let score = engine
            .score_sector_at(&profile_with(&["fintech"]), "tourism", now())
            .expect("tourism scored");

        assert!((score.breakdown.complementary - 0.65).abs() < 1e-9);
        assert!(score.breakdown.synergy <= SYNERGY_REASON_THRESHOLD);
        assert!(score.breakdown.strategic <= STRATEGIC_REASON_THRESHOLD);
        assert_eq!(score.category, ScoreCategory::Complementary);
        assert_eq!(
            score.reasoning,
            vec!["Fills a gap in your sector portfolio".to_string()]
        );
    }

    #[test]
    fn synergy_outranks_complementary_and_both_reasons_are_listed() {
        let engine = engine();
        let score = engine
            .score_sector_at(&profile_with(&["logistics", "biotech"]), "agriculture", now())
            .expect("agriculture scored");

        assert!((score.breakdown.synergy - GRAPH_EDGE_SYNERGY).abs() < f64::EPSILON);
        let expected = (CATEGORY_GAP_FILLED + 2.0 / 3.0) / 2.0;
        assert!((score.breakdown.complementary - expected).abs() < 1e-9);
        assert_eq!(score.category, ScoreCategory::Synergy);
        assert_eq!(
            score.reasoning,
            vec![
                "Strong synergy with Biotech, Logistics".to_string(),
                "Fills a gap in your sector portfolio".to_string(),
            ]
        );
    }

    #[test]
    fn strong_search_interest_adds_a_reason_without_a_category() {
        let engine = engine();
        let query = "crafts artisan guild pottery studio weaving loom".to_string();
        let profile = UserProfile {
            search_history: vec![query.clone(), query],
            ..UserProfile::default()
        };

        let score = engine
            .score_sector_at(&profile, "crafts", now())
            .expect("crafts scored");

        assert!(score.breakdown.interest > INTEREST_REASON_THRESHOLD);
        assert_eq!(score.category, ScoreCategory::Expansion);
        assert_eq!(
            score.reasoning,
            vec!["Matches your recent searches and activity".to_string()]
        );
    }

    #[test]
    fn matching_keywords_uses_tokens_and_phrases() {
        let kw = keywords(&["gridpulse", "solarnet", "energy", "artisan guild"]);
        assert_eq!(matching_keywords("grid", &kw), 1);
        assert_eq!(matching_keywords("Energy and SOLAR", &kw), 2);
        assert_eq!(matching_keywords("visit the artisan guild", &kw), 1);
        assert_eq!(matching_keywords("   ", &kw), 0);
        assert_eq!(matching_keywords("an", &kw), 0);
    }
}
