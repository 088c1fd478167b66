use crate::infra::{midday, parse_date, InMemoryAssessmentRepository, InMemoryTeacherDirectory};
use chrono::{Duration, NaiveDate, Utc};
use clap::Args;
use cognivio::config::AppConfig;
use cognivio::error::AppError;
use cognivio::workflows::assessment::rubric::element_name;
use cognivio::workflows::assessment::{
    level_for, AssessmentDraft, AssessmentRepository, AssessmentResult, AssessmentService,
    AssessmentSubmission, DateWindow, FrameworkKind, ScoreScale, TeacherDashboard,
    TeacherDirectory, TeacherId, TeacherInsights, TeacherProfile,
};
use cognivio::workflows::import::{RawElementScore, ScoreImporter};
use std::path::PathBuf;
use std::sync::Arc;

const DEMO_ELEMENTS: [&str; 6] = ["d1a", "d2a", "d2c", "d3b", "d3c", "d3d"];
const DEMO_WEEKS: u32 = 4;

/// Per-teacher starting gradient scores, one column per entry of `DEMO_ELEMENTS`.
const DEMO_TEACHERS: [(&str, &str, &str, &str, &str, [f64; 6]); 6] = [
    ("t-ava", "Ava Martinez", "Mathematics", "8th Grade", "STEM", [8.6, 8.2, 7.9, 8.8, 8.4, 7.6]),
    ("t-ben", "Ben Okafor", "Mathematics", "7th Grade", "STEM", [6.8, 7.1, 5.2, 4.4, 5.0, 6.1]),
    ("t-chloe", "Chloe Nguyen", "English", "8th Grade", "Humanities", [7.4, 9.1, 8.3, 7.8, 8.9, 6.2]),
    ("t-dev", "Dev Patel", "Science", "6th Grade", "STEM", [5.9, 6.4, 8.7, 6.9, 7.2, 8.8]),
    ("t-elena", "Elena Rossi", "History", "7th Grade", "Humanities", [8.1, 5.6, 4.8, 7.5, 6.6, 5.4]),
    ("t-farah", "Farah Haddad", "English", "6th Grade", "Humanities", [4.6, 6.0, 6.3, 5.1, 4.9, 5.8]),
];

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    /// CSV export with Element ID, Element Name, Score, Observations, Confidence columns
    #[arg(long)]
    pub(crate) csv: PathBuf,
    /// Scale of the raw scores (rubric or gradient). Defaults to APP_RAW_SCORE_SCALE.
    #[arg(long)]
    pub(crate) scale: Option<ScoreScale>,
    /// Framework the scores were collected against
    #[arg(long, default_value_t = FrameworkKind::Danielson)]
    pub(crate) framework: FrameworkKind,
    /// Comma-separated element ids to keep. Defaults to every row in the export.
    #[arg(long, value_delimiter = ',')]
    pub(crate) elements: Vec<String>,
    /// Teacher the imported assessment is attributed to
    #[arg(long, default_value = "imported-teacher")]
    pub(crate) teacher_id: String,
    /// Observation date (YYYY-MM-DD). Defaults to now.
    #[arg(long, value_parser = parse_date)]
    pub(crate) observed_on: Option<NaiveDate>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// First observation date (YYYY-MM-DD). Defaults to 2025-09-01.
    #[arg(long, value_parser = parse_date)]
    pub(crate) start: Option<NaiveDate>,
    /// Teacher whose dashboard, insights, and peer matches are printed
    #[arg(long, default_value = "t-ben")]
    pub(crate) teacher: String,
    /// Comma-separated roster columns. Defaults to the seeded elements.
    #[arg(long, value_delimiter = ',')]
    pub(crate) elements: Vec<String>,
}

pub(crate) fn run_import(args: ImportArgs) -> Result<(), AppError> {
    let ImportArgs {
        csv,
        scale,
        framework,
        elements,
        teacher_id,
        observed_on,
    } = args;

    let scale = match scale {
        Some(scale) => scale,
        None => AppConfig::load()?.ingest.raw_scale,
    };
    let element_scores = ScoreImporter::retain_selected(
        ScoreImporter::from_path(&csv, scale)?,
        framework,
        &elements,
    );
    let analyzed_at = observed_on.map(midday).unwrap_or_else(Utc::now);

    let result = AssessmentResult::new(AssessmentDraft {
        id: format!("import-{}", analyzed_at.format("%Y%m%d%H%M%S")),
        video_id: csv.display().to_string(),
        teacher_id: TeacherId(teacher_id),
        framework,
        element_scores,
        analyzed_at,
    });

    println!("Imported assessment");
    println!(
        "- {} scores from {} ({} scale, {})",
        result.element_scores.len(),
        csv.display(),
        scale.label(),
        framework.label()
    );
    render_assessment(&result);
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        start,
        teacher,
        elements,
    } = args;

    let start = start
        .or_else(|| NaiveDate::from_ymd_opt(2025, 9, 1))
        .unwrap_or_else(|| Utc::now().date_naive());
    let selected: Vec<String> = if elements.is_empty() {
        DEMO_ELEMENTS.iter().map(|id| id.to_string()).collect()
    } else {
        elements
    };

    let service = AssessmentService::with_default_scale(
        Arc::new(InMemoryAssessmentRepository::default()),
        Arc::new(InMemoryTeacherDirectory::default()),
        ScoreScale::Gradient,
    );
    seed(&service, start)?;

    println!("Cognivio assessment demo");
    println!(
        "Seeded {} teachers with {} weekly observations each starting {}",
        DEMO_TEACHERS.len(),
        DEMO_WEEKS,
        start
    );

    let roster = service.roster(Some(selected.clone()), &DateWindow::default())?;
    println!("\nRoster ({})", selected.join(", "));
    for entry in &roster.to_view().roster {
        let cells: Vec<String> = selected
            .iter()
            .map(|id| match entry.element_scores.get(id) {
                Some(cell) => match (cell.score, cell.level) {
                    (Some(score), Some(level)) => format!("{id} {score:.1} {}", level.label()),
                    _ => format!("{id} n/a"),
                },
                None => format!("{id} n/a"),
            })
            .collect();
        let overall = entry
            .overall_score
            .map(|score| format!("{score:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        println!(
            "- {} ({}, {}): overall {} | {}",
            entry.teacher_name,
            entry.subject,
            entry.grade_level,
            overall,
            cells.join(" | ")
        );
    }

    let focus = TeacherId(teacher);
    let dashboard = service.dashboard(&focus, &DateWindow::default())?;
    render_dashboard(&dashboard);

    let insights = service.insights(&focus)?;
    render_insights(&insights);

    let peers = service.peer_recommendations(&focus)?;
    if peers.is_empty() {
        println!("\nPeer recommendations: none");
    } else {
        println!("\nPeer recommendations");
        for peer in &peers {
            println!(
                "- {} ({}, {}): match {:.2} | {}",
                peer.peer_name, peer.subject, peer.grade_level, peer.match_score, peer.reason
            );
            for strength in &peer.strengths {
                println!("    - {} {:.1}", strength.name, strength.score);
            }
        }
    }

    Ok(())
}

fn seed<R, T>(service: &AssessmentService<R, T>, start: NaiveDate) -> Result<(), AppError>
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    for (teacher_index, (id, name, subject, grade_level, department, baseline)) in
        DEMO_TEACHERS.iter().enumerate()
    {
        service.register_teacher(TeacherProfile {
            id: TeacherId::from(*id),
            name: name.to_string(),
            subject: subject.to_string(),
            grade_level: grade_level.to_string(),
            department: Some(department.to_string()),
        })?;

        for week in 0..DEMO_WEEKS {
            let observed_on = start + Duration::days(7 * i64::from(week));
            let element_scores = DEMO_ELEMENTS
                .iter()
                .zip(baseline.iter())
                .enumerate()
                .map(|(element_index, (element_id, base))| {
                    let score = seeded_score(*base, teacher_index, element_index, week);
                    let name = element_name(element_id).unwrap_or(*element_id);
                    RawElementScore {
                        element_id: element_id.to_string(),
                        element_name: name.to_string(),
                        score,
                        observations: vec![format!(
                            "Week {} look-for: {}",
                            week + 1,
                            name.to_lowercase()
                        )],
                        confidence: 70.0 + f64::from((week * 7 + element_index as u32 * 3) % 25),
                    }
                })
                .collect();

            service.record_assessment(AssessmentSubmission {
                teacher_id: TeacherId::from(*id),
                video_id: format!("demo-{id}-week{}", week + 1),
                framework: FrameworkKind::Danielson,
                selected_elements: Vec::new(),
                scale: Some(ScoreScale::Gradient),
                element_scores,
                model_response: None,
                analyzed_at: Some(midday(observed_on)),
            })?;
        }
    }

    Ok(())
}

/// Baseline plus a small weekly drift; stays on the 1-10 gradient with one decimal.
fn seeded_score(base: f64, teacher_index: usize, element_index: usize, week: u32) -> f64 {
    let wobble = ((teacher_index + element_index + week as usize) % 3) as f64 * 0.2;
    let drift = f64::from(week) * 0.15;
    let score = (base + drift - wobble).clamp(1.0, 10.0);
    (score * 10.0).round() / 10.0
}

fn render_assessment(result: &AssessmentResult) {
    println!(
        "- Overall {} ({})",
        result.overall_score,
        level_for(result.overall_score).label()
    );
    println!("\nElement scores");
    for score in &result.element_scores {
        println!(
            "- {} {}: {:.1} ({}) confidence {:.0}%",
            score.element_id(),
            score.element_name(),
            score.score(),
            score.level().label(),
            score.confidence()
        );
        for observation in score.observations() {
            println!("    - {}", observation);
        }
    }
    println!("\nSummary\n{}", result.summary);
    println!("\nRecommendations");
    for recommendation in &result.recommendations {
        println!("- {}", recommendation);
    }
}

fn render_dashboard(dashboard: &TeacherDashboard) {
    let view = dashboard.to_view();
    println!("\nDashboard for {}", view.teacher.name);
    match (view.date_range.start, view.date_range.end) {
        (Some(first), Some(last)) => println!(
            "- {} assessments from {} to {}",
            view.total_assessments,
            first.date_naive(),
            last.date_naive()
        ),
        _ => println!("- no assessments recorded"),
    }

    println!("Element averages:");
    for summary in &view.element_summary {
        println!(
            "  - {}: {:.2} ({}) over {} scores",
            summary.element_name,
            summary.average_score,
            summary.level.label(),
            summary.assessment_count
        );
    }

    println!("Trend:");
    for point in &view.trend_data {
        println!("  - {} overall {:.2}", point.date.date_naive(), point.overall_score);
    }
}

fn render_insights(insights: &TeacherInsights) {
    println!("\nSummary insight");
    match insights.overall_trend_score {
        Some(score) => println!("- Overall trend score {:.2}", score),
        None => println!("- No assessments yet"),
    }
    if !insights.summary.is_empty() {
        println!("- {}", insights.summary);
    }
    for recommendation in &insights.recommendations {
        println!("  - {}", recommendation);
    }
}
