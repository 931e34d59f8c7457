//! Offline recommendation commands. These only need the catalog file, not the
//! database.

use std::path::Path;

use anyhow::Context;
use ecoportal_recommend::{explain_recommendation, RecommendationEngine, UserProfile};

/// Read a profile from `path`, or an empty profile when no path is given.
pub(crate) fn load_profile(path: Option<&Path>) -> anyhow::Result<UserProfile> {
    let Some(path) = path else {
        return Ok(UserProfile::default());
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing profile {}", path.display()))
}

pub(crate) fn run_recommend(
    catalog_path: &Path,
    profile_path: Option<&Path>,
    max: usize,
    json: bool,
) -> anyhow::Result<()> {
    let engine = RecommendationEngine::from_catalog_path(catalog_path)?;
    let profile = load_profile(profile_path)?;
    let recommendations = engine.generate_recommendations(&profile, max);

    if json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
        return Ok(());
    }

    if recommendations.is_empty() {
        println!("no sectors scored above the inclusion threshold");
        return Ok(());
    }

    for (rank, rec) in recommendations.iter().enumerate() {
        println!("#{} ({:.2})", rank + 1, rec.score);
        println!("{}", explain_recommendation(rec));
        println!();
    }
    Ok(())
}

pub(crate) fn run_graph(catalog_path: &Path) -> anyhow::Result<()> {
    let engine = RecommendationEngine::from_catalog_path(catalog_path)?;
    let graph = engine.graph();

    for (from, related) in graph.adjacency() {
        let targets: Vec<&str> = related.iter().map(String::as_str).collect();
        println!("{from:<16} -> {}", targets.join(", "));
    }
    println!();
    println!(
        "{} sectors, {} directed edges",
        graph.sector_keys().count(),
        graph.edge_count()
    );
    Ok(())
}
