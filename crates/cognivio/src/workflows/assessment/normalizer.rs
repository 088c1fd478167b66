//! Banding rules for gradient and rubric scores.
//!
//! Out-of-range input is not rejected here; it falls into whichever band its value
//! lands in. Range checks belong to the ingestion boundary.

use super::domain::{PerformanceLevel, RubricLevel};

pub const EXCELLENT_THRESHOLD: f64 = 8.0;
pub const NEEDS_IMPROVEMENT_THRESHOLD: f64 = 5.0;

/// Bands a 1-10 gradient score.
pub fn level_for(score: f64) -> PerformanceLevel {
    if score >= EXCELLENT_THRESHOLD {
        PerformanceLevel::Excellent
    } else if score >= NEEDS_IMPROVEMENT_THRESHOLD {
        PerformanceLevel::NeedsImprovement
    } else {
        PerformanceLevel::Critical
    }
}

/// Bands a raw 1-4 rubric score. Never call this with a gradient value.
pub fn rubric_level_for(score: f64) -> RubricLevel {
    if score >= 3.5 {
        RubricLevel::Distinguished
    } else if score >= 2.5 {
        RubricLevel::Proficient
    } else if score >= 1.5 {
        RubricLevel::Basic
    } else {
        RubricLevel::Unsatisfactory
    }
}

pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
