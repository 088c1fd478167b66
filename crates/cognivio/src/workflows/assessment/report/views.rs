use super::super::domain::{PerformanceLevel, TeacherId, TeacherProfile};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RosterCellView {
    pub score: Option<f64>,
    pub level: Option<PerformanceLevel>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterEntryView {
    pub teacher_id: TeacherId,
    pub teacher_name: String,
    pub subject: String,
    pub grade_level: String,
    pub department: Option<String>,
    pub element_scores: BTreeMap<String, RosterCellView>,
    pub overall_score: Option<f64>,
    pub assessment_count: usize,
    pub last_assessment_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RosterView {
    pub selected_elements: Vec<String>,
    pub roster: Vec<RosterEntryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ElementSummaryView {
    pub element_id: String,
    pub element_name: String,
    pub average_score: f64,
    pub level: PerformanceLevel,
    pub assessment_count: usize,
    pub recent_observations: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrendPointView {
    pub assessment_id: String,
    pub date: DateTime<Utc>,
    pub overall_score: f64,
    pub element_scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DateRangeView {
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub teacher: TeacherProfile,
    pub element_summary: Vec<ElementSummaryView>,
    pub trend_data: Vec<TrendPointView>,
    pub total_assessments: usize,
    pub date_range: DateRangeView,
}
