//! Caller-supplied user profile. Every field is optional on the wire; missing
//! fields deserialize to neutral defaults so scoring never fails on input shape.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BusinessStage {
    Startup,
    Growth,
    Mature,
    Enterprise,
}

impl std::fmt::Display for BusinessStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessStage::Startup => write!(f, "startup"),
            BusinessStage::Growth => write!(f, "growth"),
            BusinessStage::Mature => write!(f, "mature"),
            BusinessStage::Enterprise => write!(f, "enterprise"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub risk_tolerance: RiskTolerance,
    pub focus_areas: Vec<String>,
    pub business_stage: Option<BusinessStage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    /// Catalog sector key the user interacted with.
    pub sector: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub action: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub selected_sectors: BTreeSet<String>,
    pub search_history: Vec<String>,
    pub interaction_history: Vec<Interaction>,
    pub preferences: Preferences,
}

impl UserProfile {
    #[must_use]
    pub fn has_selected(&self, key: &str) -> bool {
        self.selected_sectors.contains(key)
    }
}
