use cognivio::workflows::assessment::{aggregate, PerformanceLevel, ScoreScale};
use cognivio::workflows::import::{ScoreImportError, ScoreImporter};

#[test]
fn rubric_export_imports_and_rescales() {
    let data = include_bytes!("fixtures/rubric_scores.csv");
    let scores =
        ScoreImporter::from_reader(&data[..], ScoreScale::Rubric).expect("fixture imports");

    assert_eq!(scores.len(), 5);
    assert_eq!(scores[0].score(), 10.0);
    assert_eq!(scores[0].observations().len(), 2);
    assert_eq!(scores[3].score(), 5.5);
    assert_eq!(scores[3].confidence(), 0.0);

    let summaries = aggregate(&scores);
    assert_eq!(summaries.len(), 4);
    let questioning = summaries.get("d3b").expect("d3b aggregated");
    // (4 + 1) / 2 after rescaling 2 -> 4 and 1 -> 1
    assert_eq!(questioning.mean, 2.5);
    assert_eq!(questioning.count, 2);
    assert_eq!(questioning.level(), PerformanceLevel::Critical);
    assert_eq!(
        questioning.observations,
        vec![
            "Mostly recall questions",
            "Few students respond",
            "Teacher answers own questions"
        ]
    );
}

#[test]
fn rubric_export_read_as_gradient_keeps_raw_values() {
    let data = include_bytes!("fixtures/rubric_scores.csv");
    let scores =
        ScoreImporter::from_reader(&data[..], ScoreScale::Gradient).expect("fixture imports");

    assert_eq!(scores[0].score(), 4.0);
    assert_eq!(scores[0].level(), PerformanceLevel::Critical);
}

#[test]
fn gradient_export_is_rejected_under_rubric_scale() {
    let csv = "Element ID,Element Name,Score,Observations,Confidence\nd1a,Content,8.5,,80\n";

    match ScoreImporter::from_reader(csv.as_bytes(), ScoreScale::Rubric) {
        Err(ScoreImportError::ScoreOutOfRange { element_id, score, .. }) => {
            assert_eq!(element_id, "d1a");
            assert_eq!(score, 8.5);
        }
        other => panic!("expected range error, got {other:?}"),
    }
}
