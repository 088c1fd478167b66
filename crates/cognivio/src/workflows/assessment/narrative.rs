//! Deterministic summary and recommendation text.
//!
//! The strength and growth cut-offs are read on whatever scale the caller's scores
//! use; they are not rescaled.

use super::domain::ElementScore;
use super::normalizer::{level_for, round_to};
use serde::{Deserialize, Serialize};

pub const STRENGTH_THRESHOLD: f64 = 3.0;
pub const GROWTH_THRESHOLD: f64 = 2.5;
pub const RECOMMENDATION_THRESHOLD: f64 = 3.0;
pub const PRIORITY_THRESHOLD: f64 = 2.0;

const MAX_LISTED: usize = 3;
const MAX_RECOMMENDATIONS: usize = 3;

pub const CONGRATULATORY_RECOMMENDATION: &str =
    "Excellent performance across all evaluated areas. Consider leadership or mentoring opportunities.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementRating {
    pub element_name: String,
    pub score: f64,
}

impl ElementRating {
    pub fn new(element_name: impl Into<String>, score: f64) -> Self {
        Self {
            element_name: element_name.into(),
            score,
        }
    }
}

impl From<&ElementScore> for ElementRating {
    fn from(score: &ElementScore) -> Self {
        Self::new(score.element_name(), score.score())
    }
}

pub fn summarize(ratings: &[ElementRating], overall_score: f64) -> String {
    let level = level_for(overall_score);
    let mut parts = vec![format!(
        "Overall performance: {} (Score: {}/10).",
        level.label(),
        display_score(overall_score)
    )];

    let strengths = names_where(ratings, |score| score >= STRENGTH_THRESHOLD);
    if !strengths.is_empty() {
        parts.push(format!("Key strengths include: {}.", strengths.join(", ")));
    }

    let growth = names_where(ratings, |score| score < GROWTH_THRESHOLD);
    if !growth.is_empty() {
        parts.push(format!(
            "Areas for professional growth: {}.",
            growth.join(", ")
        ));
    }

    parts.join(" ")
}

/// Up to three recommendations, worst score first. Never empty.
pub fn recommend(ratings: &[ElementRating]) -> Vec<String> {
    let mut low: Vec<&ElementRating> = ratings
        .iter()
        .filter(|rating| rating.score < RECOMMENDATION_THRESHOLD)
        .collect();
    low.sort_by(|a, b| a.score.total_cmp(&b.score));

    let mut recommendations: Vec<String> = low
        .into_iter()
        .take(MAX_RECOMMENDATIONS)
        .map(|rating| {
            if rating.score < PRIORITY_THRESHOLD {
                format!(
                    "Priority: Focus on improving {}. Consider mentorship or targeted professional development.",
                    rating.element_name
                )
            } else {
                format!(
                    "Continue developing skills in {}. Review best practices and observe peer teachers.",
                    rating.element_name
                )
            }
        })
        .collect();

    if recommendations.is_empty() {
        recommendations.push(CONGRATULATORY_RECOMMENDATION.to_string());
    }

    recommendations
}

/// Two places at most; whole numbers keep one decimal (`8.0`). Zero is the
/// no-score fallback and prints bare.
fn display_score(value: f64) -> String {
    let rounded = round_to(value, 2);
    if rounded == 0.0 {
        "0".to_string()
    } else if rounded.fract() == 0.0 {
        format!("{rounded:.1}")
    } else {
        rounded.to_string()
    }
}

fn names_where<F>(ratings: &[ElementRating], keep: F) -> Vec<&str>
where
    F: Fn(f64) -> bool,
{
    ratings
        .iter()
        .filter(|rating| keep(rating.score))
        .take(MAX_LISTED)
        .map(|rating| rating.element_name.as_str())
        .collect()
}
