use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use super::aggregate::aggregate;
use super::domain::{
    AssessmentDraft, AssessmentResult, DateWindow, ScoreScale, TeacherId, TeacherProfile,
};
use super::peers::{recommend_peers, PeerCandidate, PeerRecommendation};
use super::report::{build_roster, Roster, TeacherDashboard, TeacherInsights, INSIGHT_WINDOW};
use super::repository::{AssessmentRepository, RepositoryError, TeacherDirectory};
use super::rubric::FrameworkKind;
use crate::workflows::import::{RawElementScore, ScoreImportError, ScoreImporter};

/// How many recent assessments per teacher feed peer matching.
pub const PEER_HISTORY: usize = 10;

/// Raw analysis output for one video, as submitted to the service.
///
/// Scores come either as structured records or as the unparsed model reply; when
/// both are present the structured records win. A non-empty `selected_elements`
/// drops scores for elements outside that selection of the framework.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentSubmission {
    pub teacher_id: TeacherId,
    pub video_id: String,
    #[serde(default)]
    pub framework: FrameworkKind,
    #[serde(default)]
    pub selected_elements: Vec<String>,
    #[serde(default)]
    pub scale: Option<ScoreScale>,
    #[serde(default)]
    pub element_scores: Vec<RawElementScore>,
    #[serde(default)]
    pub model_response: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<DateTime<Utc>>,
}

/// Service composing the teacher directory, assessment storage, and scoring core.
pub struct AssessmentService<R, T> {
    assessments: Arc<R>,
    teachers: Arc<T>,
    default_scale: ScoreScale,
}

static ASSESSMENT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_assessment_id() -> String {
    let id = ASSESSMENT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("asmt-{id:06}")
}

impl<R, T> AssessmentService<R, T>
where
    R: AssessmentRepository + 'static,
    T: TeacherDirectory + 'static,
{
    pub fn new(assessments: Arc<R>, teachers: Arc<T>) -> Self {
        Self::with_default_scale(assessments, teachers, ScoreScale::default())
    }

    /// `default_scale` applies to submissions that do not declare their own.
    pub fn with_default_scale(assessments: Arc<R>, teachers: Arc<T>, default_scale: ScoreScale) -> Self {
        Self {
            assessments,
            teachers,
            default_scale,
        }
    }

    pub fn register_teacher(
        &self,
        profile: TeacherProfile,
    ) -> Result<TeacherProfile, AssessmentServiceError> {
        let stored = self.teachers.insert(profile)?;
        debug!(teacher_id = %stored.id, "teacher registered");
        Ok(stored)
    }

    /// Ingest raw scores, derive the assessment, and persist it.
    pub fn record_assessment(
        &self,
        submission: AssessmentSubmission,
    ) -> Result<AssessmentResult, AssessmentServiceError> {
        self.teacher(&submission.teacher_id)?;

        let AssessmentSubmission {
            teacher_id,
            video_id,
            framework,
            selected_elements,
            scale,
            element_scores,
            model_response,
            analyzed_at,
        } = submission;

        let scale = scale.unwrap_or(self.default_scale);
        let element_scores = match model_response {
            Some(reply) if element_scores.is_empty() => {
                ScoreImporter::from_model_response(&reply, scale)?
            }
            _ => ScoreImporter::ingest(element_scores, scale)?,
        };
        let element_scores =
            ScoreImporter::retain_selected(element_scores, framework, &selected_elements);

        let result = AssessmentResult::new(AssessmentDraft {
            id: next_assessment_id(),
            video_id,
            teacher_id,
            framework,
            element_scores,
            analyzed_at: analyzed_at.unwrap_or_else(Utc::now),
        });

        let stored = self.assessments.insert(result)?;
        debug!(
            assessment_id = %stored.id,
            teacher_id = %stored.teacher_id,
            overall_score = stored.overall_score,
            elements = stored.element_scores.len(),
            "assessment recorded"
        );
        Ok(stored)
    }

    pub fn dashboard(
        &self,
        teacher_id: &TeacherId,
        window: &DateWindow,
    ) -> Result<TeacherDashboard, AssessmentServiceError> {
        let teacher = self.teacher(teacher_id)?;
        let assessments = self.assessments.for_teacher(teacher_id, window)?;
        Ok(TeacherDashboard::build(teacher, &assessments, window))
    }

    /// Roster across every registered teacher. A missing selection means every
    /// Danielson element.
    pub fn roster(
        &self,
        selected_elements: Option<Vec<String>>,
        window: &DateWindow,
    ) -> Result<Roster, AssessmentServiceError> {
        let teachers = self.teachers.list()?;
        let mut assessments = Vec::new();
        for teacher in &teachers {
            assessments.extend(self.assessments.for_teacher(&teacher.id, window)?);
        }
        Ok(build_roster(&teachers, &assessments, selected_elements, window))
    }

    /// Periodic insight over the most recent assessments.
    pub fn insights(&self, teacher_id: &TeacherId) -> Result<TeacherInsights, AssessmentServiceError> {
        self.teacher(teacher_id)?;
        let recent = self.recent(teacher_id, INSIGHT_WINDOW)?;
        Ok(TeacherInsights::build(teacher_id.clone(), &recent))
    }

    pub fn peer_recommendations(
        &self,
        teacher_id: &TeacherId,
    ) -> Result<Vec<PeerRecommendation>, AssessmentServiceError> {
        let target = self.teacher(teacher_id)?;
        let target_history = self.recent(teacher_id, PEER_HISTORY)?;
        let target_scores = aggregate(
            target_history
                .iter()
                .flat_map(|assessment| assessment.element_scores.iter()),
        );
        if target_scores.is_empty() {
            return Ok(Vec::new());
        }

        let mut peers = Vec::new();
        for profile in self.teachers.list()? {
            if profile.id == target.id {
                continue;
            }
            let history = self.recent(&profile.id, PEER_HISTORY)?;
            if history.is_empty() {
                continue;
            }
            peers.push(PeerCandidate::from_assessments(profile, &history));
        }

        Ok(recommend_peers(&target, &target_scores, &peers))
    }

    fn teacher(&self, teacher_id: &TeacherId) -> Result<TeacherProfile, AssessmentServiceError> {
        self.teachers
            .fetch(teacher_id)?
            .ok_or_else(|| AssessmentServiceError::UnknownTeacher(teacher_id.clone()))
    }

    /// Newest-first slice of a teacher's history, `limit` long at most.
    fn recent(
        &self,
        teacher_id: &TeacherId,
        limit: usize,
    ) -> Result<Vec<AssessmentResult>, AssessmentServiceError> {
        let mut history = self.assessments.for_teacher(teacher_id, &DateWindow::default())?;
        history.sort_by(|a, b| b.analyzed_at.cmp(&a.analyzed_at));
        history.truncate(limit);
        Ok(history)
    }
}

/// Error raised by the assessment service.
#[derive(Debug, thiserror::Error)]
pub enum AssessmentServiceError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Import(#[from] ScoreImportError),
    #[error("teacher '{0}' is not registered")]
    UnknownTeacher(TeacherId),
}
