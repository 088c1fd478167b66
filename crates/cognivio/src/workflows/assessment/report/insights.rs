use super::super::aggregate::{aggregate, mean};
use super::super::domain::{AssessmentResult, TeacherId};
use super::super::narrative::{recommend, summarize, ElementRating};
use super::round_score;
use serde::Serialize;

/// How many of the most recent assessments feed a periodic insight.
pub const INSIGHT_WINDOW: usize = 50;

/// Periodic narrative across many lessons for one teacher.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeacherInsights {
    pub teacher_id: TeacherId,
    pub overall_trend_score: Option<f64>,
    pub summary: String,
    pub recommendations: Vec<String>,
}

impl TeacherInsights {
    /// The trend score averages every element score flattened across assessments,
    /// not the per-element means. Only a teacher with no assessments at all gets the
    /// blank insight; assessments without element scores still produce a narrative.
    pub fn build(teacher_id: TeacherId, assessments: &[AssessmentResult]) -> Self {
        let history: Vec<&AssessmentResult> = assessments
            .iter()
            .filter(|assessment| assessment.teacher_id == teacher_id)
            .collect();
        if history.is_empty() {
            return Self {
                teacher_id,
                overall_trend_score: None,
                summary: String::new(),
                recommendations: Vec::new(),
            };
        }

        let flattened = || {
            history
                .iter()
                .flat_map(|assessment| assessment.element_scores.iter())
        };
        let aggregates = aggregate(flattened());

        let overall_trend_score = mean(flattened().map(|score| score.score())).map(round_score);
        let ratings: Vec<ElementRating> = aggregates
            .iter()
            .map(|summary| ElementRating::new(summary.element_name.clone(), round_score(summary.mean)))
            .collect();

        let summary = summarize(&ratings, overall_trend_score.unwrap_or(0.0));
        let recommendations = recommend(&ratings);

        Self {
            teacher_id,
            overall_trend_score,
            summary,
            recommendations,
        }
    }
}
