use super::super::aggregate::{aggregate, ElementAggregates};
use super::super::domain::{AssessmentResult, DateWindow, TeacherProfile};
use super::views::{DashboardView, DateRangeView, ElementSummaryView, TrendPointView};
use super::round_score;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One point of a teacher's trend line.
#[derive(Debug, Clone, PartialEq)]
pub struct TrendPoint {
    pub assessment_id: String,
    pub analyzed_at: DateTime<Utc>,
    pub overall_score: f64,
    pub element_scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone)]
pub struct TeacherDashboard {
    pub teacher: TeacherProfile,
    pub element_summary: ElementAggregates,
    pub trend: Vec<TrendPoint>,
    pub total_assessments: usize,
    pub first_assessment: Option<DateTime<Utc>>,
    pub last_assessment: Option<DateTime<Utc>>,
}

impl TeacherDashboard {
    /// Orders the teacher's assessments chronologically, then aggregates them, so the
    /// trailing observations of each element are the most recent ones.
    pub fn build(
        teacher: TeacherProfile,
        assessments: &[AssessmentResult],
        window: &DateWindow,
    ) -> Self {
        let mut ordered: Vec<&AssessmentResult> = window
            .filter(assessments)
            .into_iter()
            .filter(|assessment| assessment.teacher_id == teacher.id)
            .collect();
        ordered.sort_by_key(|assessment| assessment.analyzed_at);

        let element_summary = aggregate(
            ordered
                .iter()
                .copied()
                .flat_map(|assessment| assessment.element_scores.iter()),
        );

        let trend = ordered
            .iter()
            .map(|assessment| TrendPoint {
                assessment_id: assessment.id.clone(),
                analyzed_at: assessment.analyzed_at,
                overall_score: assessment.overall_score,
                element_scores: assessment
                    .element_scores
                    .iter()
                    .map(|score| (score.element_id().to_string(), score.score()))
                    .collect(),
            })
            .collect();

        Self {
            total_assessments: ordered.len(),
            first_assessment: ordered.first().map(|assessment| assessment.analyzed_at),
            last_assessment: ordered.last().map(|assessment| assessment.analyzed_at),
            teacher,
            element_summary,
            trend,
        }
    }

    pub fn to_view(&self) -> DashboardView {
        DashboardView {
            teacher: self.teacher.clone(),
            element_summary: self
                .element_summary
                .iter()
                .map(|summary| ElementSummaryView {
                    element_id: summary.element_id.clone(),
                    element_name: summary.element_name.clone(),
                    average_score: round_score(summary.mean),
                    level: summary.level(),
                    assessment_count: summary.count,
                    recent_observations: summary.observations.clone(),
                })
                .collect(),
            trend_data: self
                .trend
                .iter()
                .map(|point| TrendPointView {
                    assessment_id: point.assessment_id.clone(),
                    date: point.analyzed_at,
                    overall_score: point.overall_score,
                    element_scores: point.element_scores.clone(),
                })
                .collect(),
            total_assessments: self.total_assessments,
            date_range: DateRangeView {
                start: self.first_assessment,
                end: self.last_assessment,
            },
        }
    }
}
