use super::*;
use crate::workflows::assessment::domain::{
    AssessmentDraft, AssessmentResult, DateWindow, ElementScore, PerformanceLevel, TeacherId,
    TeacherProfile,
};
use crate::workflows::assessment::narrative::CONGRATULATORY_RECOMMENDATION;
use crate::workflows::assessment::rubric::FrameworkKind;
use chrono::{DateTime, TimeZone, Utc};

fn teacher(id: &str) -> TeacherProfile {
    TeacherProfile {
        id: TeacherId::from(id),
        name: format!("Teacher {id}"),
        subject: "Mathematics".to_string(),
        grade_level: "8th Grade".to_string(),
        department: Some("STEM".to_string()),
    }
}

fn day(month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, month, day, 10, 0, 0).unwrap()
}

fn assessment(
    id: &str,
    teacher_id: &str,
    analyzed_at: DateTime<Utc>,
    scores: Vec<ElementScore>,
) -> AssessmentResult {
    AssessmentResult::new(AssessmentDraft {
        id: id.to_string(),
        video_id: format!("video-{id}"),
        teacher_id: TeacherId::from(teacher_id),
        framework: FrameworkKind::Danielson,
        element_scores: scores,
        analyzed_at,
    })
}

fn score(id: &str, value: f64) -> ElementScore {
    ElementScore::new(id, format!("Element {id}"), value)
}

#[test]
fn roster_marks_unscored_elements_as_missing() {
    let assessments = vec![
        assessment("a1", "t1", day(9, 1), vec![score("d3b", 8.0), score("d2a", 5.0)]),
        assessment("a2", "t1", day(9, 8), vec![score("d3b", 7.0)]),
        assessment("a3", "t2", day(9, 3), vec![score("d3b", 2.0)]),
    ];
    let selected = vec!["d3b".to_string(), "d2a".to_string(), "d4a".to_string()];

    let roster = Roster::build(
        &[teacher("t1")],
        &assessments,
        selected.clone(),
        &DateWindow::default(),
    );

    assert_eq!(roster.selected_elements, selected);
    let entry = &roster.entries[0];
    assert_eq!(entry.assessment_count, 2);
    assert_eq!(entry.last_assessment, Some(day(9, 8)));
    assert_eq!(entry.element_scores["d3b"].as_ref().map(|s| s.mean), Some(7.5));
    assert!(entry.element_scores["d4a"].is_none());
    // (7.5 + 5.0) / 2, the missing element does not count as zero
    assert_eq!(entry.overall_score, Some(6.25));

    let view = roster.to_view();
    let cell = &view.roster[0].element_scores["d4a"];
    assert_eq!(cell.score, None);
    assert_eq!(cell.level, None);
    assert_eq!(
        view.roster[0].element_scores["d3b"].level,
        Some(PerformanceLevel::NeedsImprovement)
    );
}

#[test]
fn roster_entry_without_assessments_is_empty() {
    let roster = Roster::build(
        &[teacher("t9")],
        &[],
        vec!["d1a".to_string()],
        &DateWindow::default(),
    );

    let entry = &roster.entries[0];
    assert_eq!(entry.assessment_count, 0);
    assert_eq!(entry.overall_score, None);
    assert_eq!(entry.last_assessment, None);
    assert!(entry.element_scores["d1a"].is_none());
}

#[test]
fn roster_defaults_to_every_danielson_element() {
    let roster = build_roster(&[teacher("t1")], &[], None, &DateWindow::default());
    assert_eq!(roster.selected_elements.len(), 22);
    assert_eq!(roster.selected_elements[0], "d1a");

    let roster = build_roster(&[teacher("t1")], &[], Some(Vec::new()), &DateWindow::default());
    assert_eq!(roster.selected_elements.len(), 22);
}

#[test]
fn roster_entry_ignores_other_teachers() {
    let assessments = vec![
        assessment("a1", "t1", day(9, 1), vec![score("d3b", 6.0)]),
        assessment("a2", "t2", day(9, 2), vec![score("d3b", 2.0)]),
    ];

    let entry = roster_entry(teacher("t2"), &assessments, &["d3b".to_string()]);
    assert_eq!(entry.assessment_count, 1);
    assert_eq!(entry.overall_score, Some(2.0));
}

#[test]
fn roster_respects_date_window() {
    let assessments = vec![
        assessment("early", "t1", day(8, 20), vec![score("d3b", 2.0)]),
        assessment("inside", "t1", day(9, 10), vec![score("d3b", 9.0)]),
    ];
    let window = DateWindow::new(Some(day(9, 1)), None);

    let roster = Roster::build(&[teacher("t1")], &assessments, vec!["d3b".to_string()], &window);

    let entry = &roster.entries[0];
    assert_eq!(entry.assessment_count, 1);
    assert_eq!(entry.overall_score, Some(9.0));
}

#[test]
fn roster_view_rounds_to_two_places() {
    let assessments = vec![
        assessment("a1", "t1", day(9, 1), vec![score("d3b", 7.0)]),
        assessment("a2", "t1", day(9, 2), vec![score("d3b", 8.0)]),
        assessment("a3", "t1", day(9, 3), vec![score("d3b", 8.0)]),
    ];

    let roster = Roster::build(
        &[teacher("t1")],
        &assessments,
        vec!["d3b".to_string()],
        &DateWindow::default(),
    );

    let view = roster.to_view();
    assert_eq!(view.roster[0].element_scores["d3b"].score, Some(7.67));
    assert_eq!(view.roster[0].overall_score, Some(7.67));
}

#[test]
fn dashboard_orders_trend_chronologically() {
    let assessments = vec![
        assessment(
            "late",
            "t1",
            day(9, 20),
            vec![score("d3b", 9.0).with_observations(["late note"])],
        ),
        assessment(
            "early",
            "t1",
            day(9, 2),
            vec![score("d3b", 5.0).with_observations(["early note"])],
        ),
        assessment("other", "t2", day(9, 5), vec![score("d3b", 1.0)]),
    ];

    let dashboard = TeacherDashboard::build(teacher("t1"), &assessments, &DateWindow::default());

    assert_eq!(dashboard.total_assessments, 2);
    let order: Vec<&str> = dashboard
        .trend
        .iter()
        .map(|point| point.assessment_id.as_str())
        .collect();
    assert_eq!(order, vec!["early", "late"]);
    assert_eq!(dashboard.first_assessment, Some(day(9, 2)));
    assert_eq!(dashboard.last_assessment, Some(day(9, 20)));

    let summary = dashboard.element_summary.get("d3b").expect("d3b summary");
    assert_eq!(summary.mean, 7.0);
    assert_eq!(summary.observations, vec!["early note", "late note"]);

    let view = dashboard.to_view();
    assert_eq!(view.trend_data[1].element_scores["d3b"], 9.0);
    assert_eq!(view.date_range.start, Some(day(9, 2)));
    assert_eq!(view.element_summary[0].level, PerformanceLevel::NeedsImprovement);
}

#[test]
fn dashboard_for_unassessed_teacher_is_empty() {
    let dashboard = TeacherDashboard::build(teacher("t1"), &[], &DateWindow::default());
    assert_eq!(dashboard.total_assessments, 0);
    assert!(dashboard.element_summary.is_empty());
    assert!(dashboard.trend.is_empty());
    assert_eq!(dashboard.first_assessment, None);
}

#[test]
fn insights_average_flattened_scores() {
    let assessments = vec![
        assessment("a1", "t1", day(9, 1), vec![score("d3b", 9.0), score("d2a", 2.1)]),
        assessment("a2", "t1", day(9, 2), vec![score("d3b", 9.0)]),
    ];

    let insights = TeacherInsights::build(TeacherId::from("t1"), &assessments);

    // flattened: (9 + 2.1 + 9) / 3, per-element means would give 5.55
    assert_eq!(insights.overall_trend_score, Some(6.7));
    assert!(insights
        .summary
        .starts_with("Overall performance: Needs Improvement (Score: 6.7/10)."));
    assert!(insights.summary.contains("Areas for professional growth: Element d2a."));
    assert!(insights.summary.contains("Key strengths include: Element d3b."));
    assert_eq!(insights.recommendations.len(), 1);
    assert!(insights.recommendations[0].starts_with("Continue developing skills in Element d2a"));
}

#[test]
fn insights_for_empty_history_are_blank() {
    let insights = TeacherInsights::build(TeacherId::from("t1"), &[]);
    assert_eq!(insights.overall_trend_score, None);
    assert!(insights.summary.is_empty());
    assert!(insights.recommendations.is_empty());
}

#[test]
fn insights_for_scoreless_history_still_narrate() {
    let assessments = vec![
        assessment("a1", "t1", day(9, 3), Vec::new()),
        assessment("a2", "t2", day(9, 4), vec![score("d3b", 2.0)]),
    ];

    let insights = TeacherInsights::build(TeacherId::from("t1"), &assessments);
    assert_eq!(insights.overall_trend_score, None);
    assert_eq!(insights.summary, "Overall performance: Critical (Score: 0/10).");
    assert_eq!(
        insights.recommendations,
        vec![CONGRATULATORY_RECOMMENDATION.to_string()]
    );
}

#[test]
fn round_helpers_keep_two_places() {
    assert_eq!(round_score(6.666), 6.67);
    assert_eq!(round_optional(None), None);
    assert_eq!(round_optional(Some(1.005_1)), Some(1.01));
}
