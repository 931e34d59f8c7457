//! Sector recommendations for the ecosystem portal.
//!
//! A [`SectorRelationshipGraph`] is built once from the static catalog; the
//! [`RecommendationEngine`] then ranks unselected sectors for a
//! [`UserProfile`] using four weighted sub-scores (synergy, interest,
//! strategic value, complementary fit). Scoring performs no I/O.

pub mod error;
pub mod graph;
pub mod profile;
pub mod scorer;
pub mod tables;
pub mod weights;

mod explain;

pub use error::RecommendError;
pub use explain::explain_recommendation;
pub use graph::SectorRelationshipGraph;
pub use profile::{BusinessStage, Interaction, Preferences, RiskTolerance, UserProfile};
pub use scorer::{RecommendationEngine, RecommendationScore, ScoreBreakdown, ScoreCategory};
