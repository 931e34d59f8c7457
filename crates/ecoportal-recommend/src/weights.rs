//! Scoring constants.
//!
//! Every heuristic threshold and weight used by the graph builder and the
//! scorer lives here. Changing a value changes which sectors get recommended.

// ---------------------------------------------------------------------------
// Relationship graph
// ---------------------------------------------------------------------------

/// Minimum keyword-overlap count that creates an edge on its own.
pub const KEYWORD_EDGE_MIN: usize = 2;
/// Technology overlap ratio strictly above which an edge is created.
pub const TECH_EDGE_THRESHOLD: f64 = 0.3;
/// Business compatibility strictly above which an edge is created.
pub const COMPATIBILITY_EDGE_THRESHOLD: f64 = 0.4;
/// Compatibility when the target is listed in the source's compatibility table.
pub const COMPATIBLE: f64 = 0.8;
/// Compatibility when it is not.
pub const INCOMPATIBLE: f64 = 0.2;

// ---------------------------------------------------------------------------
// Total score (weights sum to 1.0)
// ---------------------------------------------------------------------------

pub const SYNERGY_WEIGHT: f64 = 0.4;
pub const INTEREST_WEIGHT: f64 = 0.25;
pub const STRATEGIC_WEIGHT: f64 = 0.2;
pub const COMPLEMENTARY_WEIGHT: f64 = 0.15;

/// Candidates scoring at or below this are dropped from results.
pub const INCLUSION_THRESHOLD: f64 = 0.3;
pub const DEFAULT_MAX_RESULTS: usize = 8;

// ---------------------------------------------------------------------------
// Synergy
// ---------------------------------------------------------------------------

/// Synergy when nothing is selected yet.
pub const NEUTRAL_SYNERGY: f64 = 0.5;
/// Synergy contributed by a graph edge from the candidate to a selected sector.
pub const GRAPH_EDGE_SYNERGY: f64 = 0.8;

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

/// Scales the matched-keyword fraction of each search query.
pub const SEARCH_MATCH_WEIGHT: f64 = 0.3;
/// Query tokens shorter than this never match a keyword.
pub const MIN_QUERY_TOKEN_LEN: usize = 3;
pub const RECENT_INTERACTION_BONUS: f64 = 0.1;
pub const RECENT_INTERACTION_CAP: f64 = 0.4;
pub const RECENT_WINDOW_HOURS: i64 = 24;

// ---------------------------------------------------------------------------
// Strategic value
// ---------------------------------------------------------------------------

pub const DEFAULT_STAGE_MULTIPLIER: f64 = 0.5;
pub const STAGE_WEIGHT: f64 = 0.4;
pub const PORTFOLIO_WEIGHT: f64 = 0.3;
/// Bonus for emerging sectors at high risk tolerance, or established ones at low.
pub const RISK_BONUS: f64 = 0.3;

// ---------------------------------------------------------------------------
// Complementary fit
// ---------------------------------------------------------------------------

/// The candidate's category is not yet represented among selected sectors.
pub const CATEGORY_GAP_FILLED: f64 = 0.8;
/// The candidate's category is already represented.
pub const CATEGORY_ALREADY_COVERED: f64 = 0.3;
/// The candidate has no category entry.
pub const CATEGORY_UNKNOWN: f64 = 0.0;

// ---------------------------------------------------------------------------
// Confidence and categorisation
// ---------------------------------------------------------------------------

pub const CONFIDENCE_SYNERGY_WEIGHT: f64 = 0.4;
pub const CONFIDENCE_INTEREST_WEIGHT: f64 = 0.3;
pub const CONFIDENCE_STRATEGIC_WEIGHT: f64 = 0.3;
pub const MAX_CONFIDENCE: f64 = 0.95;

pub const SYNERGY_REASON_THRESHOLD: f64 = 0.7;
pub const INTEREST_REASON_THRESHOLD: f64 = 0.5;
pub const STRATEGIC_REASON_THRESHOLD: f64 = 0.7;
pub const COMPLEMENTARY_REASON_THRESHOLD: f64 = 0.6;
