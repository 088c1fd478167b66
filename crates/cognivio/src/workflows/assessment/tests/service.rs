use super::common::*;
use std::sync::Arc;

use crate::workflows::assessment::domain::{DateWindow, PerformanceLevel, ScoreScale, TeacherId};
use crate::workflows::assessment::repository::{AssessmentRepository, RepositoryError};
use crate::workflows::assessment::service::{AssessmentService, AssessmentServiceError};
use crate::workflows::import::ScoreImportError;

#[test]
fn record_assessment_rescales_rubric_scores_by_default() {
    let (service, assessments, _) = build_service();
    service
        .register_teacher(profile("t1", "Mathematics"))
        .expect("register");

    let result = service
        .record_assessment(submission("t1", 2, vec![raw("d3b", 4.0), raw("d2a", 2.0)]))
        .expect("record");

    assert_eq!(result.element_scores[0].score(), 10.0);
    assert_eq!(result.element_scores[1].score(), 4.0);
    assert_eq!(result.element_scores[1].level(), PerformanceLevel::Critical);
    assert_eq!(result.overall_score, 7.0);
    assert!(result.id.starts_with("asmt-"));

    let stored = assessments
        .for_teacher(&TeacherId::from("t1"), &DateWindow::default())
        .expect("fetch");
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0], result);
}

#[test]
fn record_assessment_honours_declared_and_default_scale() {
    let assessments = Arc::new(MemoryAssessments::default());
    let teachers = Arc::new(MemoryTeachers::default());
    let service =
        AssessmentService::with_default_scale(assessments, teachers, ScoreScale::Gradient);
    service
        .register_teacher(profile("t1", "Science"))
        .expect("register");

    let result = service
        .record_assessment(submission("t1", 3, vec![raw("d3b", 7.5)]))
        .expect("gradient default");
    assert_eq!(result.element_scores[0].score(), 7.5);

    let mut rubric = submission("t1", 4, vec![raw("d3b", 3.0)]);
    rubric.scale = Some(ScoreScale::Rubric);
    let result = service.record_assessment(rubric).expect("declared rubric");
    assert_eq!(result.element_scores[0].score(), 7.0);
}

#[test]
fn record_assessment_keeps_only_selected_elements() {
    let (service, _, _) = build_service();
    service
        .register_teacher(profile("t1", "Mathematics"))
        .expect("register");

    let mut selected = submission(
        "t1",
        5,
        vec![raw("d3b", 4.0), raw("d2a", 2.0), raw("m1a", 1.0)],
    );
    selected.selected_elements = vec!["d3b".to_string(), "m1a".to_string()];

    let result = service.record_assessment(selected).expect("record");
    assert_eq!(result.element_scores.len(), 1);
    assert_eq!(result.element_scores[0].element_id(), "d3b");
    assert_eq!(result.overall_score, 10.0);
}

#[test]
fn record_assessment_parses_model_replies() {
    let (service, _, _) = build_service();
    service
        .register_teacher(profile("t1", "History"))
        .expect("register");

    let mut request = submission("t1", 5, Vec::new());
    request.model_response = Some(
        "Evaluation follows. {\"element_scores\": [{\"element_id\": \"d2b\", \"element_name\": \"Establishing a Culture for Learning\", \"score\": 3, \"confidence\": 70}]}"
            .to_string(),
    );

    let result = service.record_assessment(request).expect("record");
    assert_eq!(result.element_scores.len(), 1);
    assert_eq!(result.element_scores[0].score(), 7.0);
}

#[test]
fn record_assessment_rejects_unknown_teachers_and_bad_scores() {
    let (service, _, _) = build_service();

    match service.record_assessment(submission("ghost", 1, vec![raw("d3b", 3.0)])) {
        Err(AssessmentServiceError::UnknownTeacher(id)) => assert_eq!(id.0, "ghost"),
        other => panic!("expected unknown teacher, got {other:?}"),
    }

    service
        .register_teacher(profile("t1", "Art"))
        .expect("register");
    match service.record_assessment(submission("t1", 1, vec![raw("d3b", 9.0)])) {
        Err(AssessmentServiceError::Import(ScoreImportError::ScoreOutOfRange { .. })) => {}
        other => panic!("expected range error, got {other:?}"),
    }
}

#[test]
fn register_teacher_propagates_conflicts() {
    let (service, _, _) = build_service();
    service
        .register_teacher(profile("t1", "Art"))
        .expect("first insert");

    match service.register_teacher(profile("t1", "Art")) {
        Err(AssessmentServiceError::Repository(RepositoryError::Conflict)) => {}
        other => panic!("expected conflict, got {other:?}"),
    }
}

#[test]
fn repository_failures_surface_from_rollups() {
    let teachers = Arc::new(MemoryTeachers::default());
    let service = AssessmentService::new(Arc::new(UnavailableAssessments), teachers);
    service
        .register_teacher(profile("t1", "Art"))
        .expect("register");

    match service.roster(None, &DateWindow::default()) {
        Err(AssessmentServiceError::Repository(RepositoryError::Unavailable(_))) => {}
        other => panic!("expected unavailable, got {other:?}"),
    }
}

#[test]
fn roster_covers_every_registered_teacher() {
    let (service, _, _) = build_service();
    for id in ["t1", "t2"] {
        service
            .register_teacher(profile(id, "Mathematics"))
            .expect("register");
    }
    service
        .record_assessment(submission("t1", 2, vec![raw("d3b", 3.0)]))
        .expect("record");

    let roster = service
        .roster(Some(vec!["d3b".to_string()]), &DateWindow::default())
        .expect("roster");

    assert_eq!(roster.entries.len(), 2);
    assert_eq!(roster.entries[0].overall_score, Some(7.0));
    assert_eq!(roster.entries[1].assessment_count, 0);
    assert!(roster.entries[1].element_scores["d3b"].is_none());
}

#[test]
fn insights_use_only_the_most_recent_window() {
    let (service, _, _) = build_service();
    service
        .register_teacher(profile("t1", "Mathematics"))
        .expect("register");
    service
        .record_assessment(submission("t1", 1, vec![raw("d3b", 1.0)]))
        .expect("record");
    service
        .record_assessment(submission("t1", 2, vec![raw("d3b", 4.0)]))
        .expect("record");

    let insights = service.insights(&TeacherId::from("t1")).expect("insights");
    assert_eq!(insights.overall_trend_score, Some(5.5));

    let empty = service.insights(&TeacherId::from("nobody"));
    assert!(matches!(empty, Err(AssessmentServiceError::UnknownTeacher(_))));
}

#[test]
fn peer_recommendations_exclude_the_target_and_quiet_peers() {
    let (service, _, _) = build_service();
    for (id, subject) in [("t1", "Biology"), ("t2", "Biology"), ("t3", "Art")] {
        service
            .register_teacher(profile(id, subject))
            .expect("register");
    }
    // t1: d3b = 4.0 on the gradient; t2: d3b = 10.0
    service
        .record_assessment(submission("t1", 2, vec![raw("d3b", 2.0)]))
        .expect("record");
    service
        .record_assessment(submission("t2", 3, vec![raw("d3b", 4.0)]))
        .expect("record");

    let recommendations = service
        .peer_recommendations(&TeacherId::from("t1"))
        .expect("peers");

    assert_eq!(recommendations.len(), 1);
    let recommendation = &recommendations[0];
    assert_eq!(recommendation.peer_id, TeacherId::from("t2"));
    assert!((recommendation.match_score - 0.6).abs() < 1e-9);
    assert_eq!(recommendation.reason, "Strong in Element d3b (same subject area)");
}

#[test]
fn peer_recommendations_for_unassessed_target_are_empty() {
    let (service, _, _) = build_service();
    service
        .register_teacher(profile("t1", "Biology"))
        .expect("register");

    let recommendations = service
        .peer_recommendations(&TeacherId::from("t1"))
        .expect("peers");
    assert!(recommendations.is_empty());
}

#[test]
fn dashboard_requires_a_registered_teacher() {
    let (service, _, _) = build_service();
    match service.dashboard(&TeacherId::from("ghost"), &DateWindow::default()) {
        Err(AssessmentServiceError::UnknownTeacher(_)) => {}
        other => panic!("expected unknown teacher, got {other:?}"),
    }
}
