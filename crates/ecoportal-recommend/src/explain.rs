use std::fmt::Write as _;

use crate::scorer::RecommendationScore;

/// Human-readable explanation: one bullet per reason, then confidence and
/// category.
#[must_use]
pub fn explain_recommendation(score: &RecommendationScore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} {}", score.emoji, score.name);
    for reason in &score.reasoning {
        let _ = writeln!(out, "- {reason}");
    }
    let _ = writeln!(out, "Confidence: {}%", confidence_percent(score.confidence));
    let _ = write!(out, "Category: {}", score.category);
    out
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn confidence_percent(confidence: f64) -> u32 {
    (confidence.clamp(0.0, 1.0) * 100.0).round() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scorer::{ScoreBreakdown, ScoreCategory};

    fn score(reasoning: Vec<&str>, confidence: f64, category: ScoreCategory) -> RecommendationScore {
        RecommendationScore {
            sector: "energy".to_string(),
            name: "Energy".to_string(),
            emoji: "⚡".to_string(),
            score: 0.5,
            reasoning: reasoning.into_iter().map(str::to_string).collect(),
            confidence,
            category,
            breakdown: ScoreBreakdown {
                synergy: 0.8,
                interest: 0.0,
                strategic: 0.5,
                complementary: 0.4,
            },
        }
    }

    #[test]
    fn lists_every_reason_then_confidence_and_category() {
        let text = explain_recommendation(&score(
            vec!["Strong synergy with Space", "Fills a gap in your sector portfolio"],
            0.474,
            ScoreCategory::Synergy,
        ));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "⚡ Energy",
                "- Strong synergy with Space",
                "- Fills a gap in your sector portfolio",
                "Confidence: 47%",
                "Category: synergy",
            ]
        );
    }

    #[test]
    fn confidence_rounds_to_whole_percent() {
        assert_eq!(confidence_percent(0.95), 95);
        assert_eq!(confidence_percent(0.125), 13);
        assert_eq!(confidence_percent(0.0), 0);
    }
}
