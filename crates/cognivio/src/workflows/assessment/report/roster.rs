use super::super::aggregate::{aggregate, mean, AggregateElementSummary};
use super::super::domain::{AssessmentResult, DateWindow, TeacherProfile};
use super::super::rubric::default_selection;
use super::views::{RosterCellView, RosterEntryView, RosterView};
use super::{round_score, round_optional};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

/// One row of the roster: a teacher's averages for each selected element.
#[derive(Debug, Clone)]
pub struct TeacherRosterEntry {
    pub teacher: TeacherProfile,
    /// `None` marks an element with no scores in the window; it is not a zero.
    pub element_scores: BTreeMap<String, Option<AggregateElementSummary>>,
    pub overall_score: Option<f64>,
    pub assessment_count: usize,
    pub last_assessment: Option<DateTime<Utc>>,
}

impl TeacherRosterEntry {
    pub fn build(
        teacher: TeacherProfile,
        assessments: &[AssessmentResult],
        selected_elements: &[String],
        window: &DateWindow,
    ) -> Self {
        let in_window = window.filter(assessments);
        let aggregates = aggregate(
            in_window
                .iter()
                .copied()
                .filter(|assessment| assessment.teacher_id == teacher.id)
                .flat_map(|assessment| assessment.element_scores.iter()),
        );

        let element_scores: BTreeMap<String, Option<AggregateElementSummary>> = selected_elements
            .iter()
            .map(|element_id| (element_id.clone(), aggregates.get(element_id).cloned()))
            .collect();

        let overall_score = mean(
            element_scores
                .values()
                .flatten()
                .map(|summary| summary.mean),
        );

        let teacher_assessments: Vec<&AssessmentResult> = in_window
            .into_iter()
            .filter(|assessment| assessment.teacher_id == teacher.id)
            .collect();

        Self {
            assessment_count: teacher_assessments.len(),
            last_assessment: teacher_assessments
                .iter()
                .map(|assessment| assessment.analyzed_at)
                .max(),
            teacher,
            element_scores,
            overall_score,
        }
    }

    pub fn to_view(&self) -> RosterEntryView {
        let element_scores = self
            .element_scores
            .iter()
            .map(|(element_id, summary)| {
                let cell = match summary {
                    Some(summary) => RosterCellView {
                        score: Some(round_score(summary.mean)),
                        level: Some(summary.level()),
                    },
                    None => RosterCellView {
                        score: None,
                        level: None,
                    },
                };
                (element_id.clone(), cell)
            })
            .collect();

        RosterEntryView {
            teacher_id: self.teacher.id.clone(),
            teacher_name: self.teacher.name.clone(),
            subject: self.teacher.subject.clone(),
            grade_level: self.teacher.grade_level.clone(),
            department: self.teacher.department.clone(),
            element_scores,
            overall_score: round_optional(self.overall_score),
            assessment_count: self.assessment_count,
            last_assessment_date: self.last_assessment,
        }
    }
}

/// Roster across many teachers for a fixed element selection.
#[derive(Debug, Clone)]
pub struct Roster {
    pub selected_elements: Vec<String>,
    pub entries: Vec<TeacherRosterEntry>,
}

impl Roster {
    /// Builds one entry per teacher. Assessments belonging to other teachers are ignored
    /// per entry, so a single combined slice may be passed.
    pub fn build(
        teachers: &[TeacherProfile],
        assessments: &[AssessmentResult],
        selected_elements: Vec<String>,
        window: &DateWindow,
    ) -> Self {
        let entries = teachers
            .iter()
            .map(|teacher| {
                TeacherRosterEntry::build(teacher.clone(), assessments, &selected_elements, window)
            })
            .collect();

        Self {
            selected_elements,
            entries,
        }
    }

    pub fn to_view(&self) -> RosterView {
        RosterView {
            selected_elements: self.selected_elements.clone(),
            roster: self.entries.iter().map(TeacherRosterEntry::to_view).collect(),
        }
    }
}

/// Single roster row over an unbounded window.
pub fn roster_entry(
    teacher: TeacherProfile,
    assessments: &[AssessmentResult],
    selected_elements: &[String],
) -> TeacherRosterEntry {
    TeacherRosterEntry::build(teacher, assessments, selected_elements, &DateWindow::default())
}

/// Roster for many teachers. A missing or empty selection means every Danielson element.
pub fn build_roster(
    teachers: &[TeacherProfile],
    assessments: &[AssessmentResult],
    selected_elements: Option<Vec<String>>,
    window: &DateWindow,
) -> Roster {
    let selected_elements = selected_elements
        .filter(|selection| !selection.is_empty())
        .unwrap_or_else(default_selection);
    Roster::build(teachers, assessments, selected_elements, window)
}
