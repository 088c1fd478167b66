use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::workflows::assessment::domain::{
    AssessmentResult, DateWindow, TeacherId, TeacherProfile,
};
use crate::workflows::assessment::repository::{
    AssessmentRepository, RepositoryError, TeacherDirectory,
};
use crate::workflows::assessment::service::{AssessmentService, AssessmentSubmission};
use crate::workflows::assessment::rubric::FrameworkKind;
use crate::workflows::import::RawElementScore;

pub(super) fn profile(id: &str, subject: &str) -> TeacherProfile {
    TeacherProfile {
        id: TeacherId::from(id),
        name: format!("Teacher {id}"),
        subject: subject.to_string(),
        grade_level: "7th Grade".to_string(),
        department: Some("Middle School".to_string()),
    }
}

pub(super) fn at(day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, day, 13, 0, 0).unwrap()
}

pub(super) fn raw(element_id: &str, score: f64) -> RawElementScore {
    RawElementScore {
        element_id: element_id.to_string(),
        element_name: format!("Element {element_id}"),
        score,
        observations: vec![format!("{element_id} observed")],
        confidence: 80.0,
    }
}

pub(super) fn submission(
    teacher_id: &str,
    day: u32,
    scores: Vec<RawElementScore>,
) -> AssessmentSubmission {
    AssessmentSubmission {
        teacher_id: TeacherId::from(teacher_id),
        video_id: format!("video-{teacher_id}-{day}"),
        framework: FrameworkKind::Danielson,
        selected_elements: Vec::new(),
        scale: None,
        element_scores: scores,
        model_response: None,
        analyzed_at: Some(at(day)),
    }
}

pub(super) fn build_service() -> (
    AssessmentService<MemoryAssessments, MemoryTeachers>,
    Arc<MemoryAssessments>,
    Arc<MemoryTeachers>,
) {
    let assessments = Arc::new(MemoryAssessments::default());
    let teachers = Arc::new(MemoryTeachers::default());
    let service = AssessmentService::new(assessments.clone(), teachers.clone());
    (service, assessments, teachers)
}

#[derive(Default, Clone)]
pub(super) struct MemoryAssessments {
    pub(super) records: Arc<Mutex<Vec<AssessmentResult>>>,
}

impl AssessmentRepository for MemoryAssessments {
    fn insert(&self, assessment: AssessmentResult) -> Result<AssessmentResult, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.iter().any(|existing| existing.id == assessment.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.push(assessment.clone());
        Ok(assessment)
    }

    fn for_teacher(
        &self,
        teacher_id: &TeacherId,
        window: &DateWindow,
    ) -> Result<Vec<AssessmentResult>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .iter()
            .filter(|assessment| &assessment.teacher_id == teacher_id)
            .filter(|assessment| window.contains(assessment.analyzed_at))
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryTeachers {
    profiles: Arc<Mutex<HashMap<TeacherId, TeacherProfile>>>,
    order: Arc<Mutex<Vec<TeacherId>>>,
}

impl TeacherDirectory for MemoryTeachers {
    fn insert(&self, profile: TeacherProfile) -> Result<TeacherProfile, RepositoryError> {
        let mut guard = self.profiles.lock().expect("directory mutex poisoned");
        if guard.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(profile.id.clone(), profile.clone());
        self.order
            .lock()
            .expect("directory mutex poisoned")
            .push(profile.id.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &TeacherId) -> Result<Option<TeacherProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("directory mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn list(&self) -> Result<Vec<TeacherProfile>, RepositoryError> {
        let profiles = self.profiles.lock().expect("directory mutex poisoned");
        let order = self.order.lock().expect("directory mutex poisoned");
        Ok(order
            .iter()
            .filter_map(|id| profiles.get(id).cloned())
            .collect())
    }
}

pub(super) struct UnavailableAssessments;

impl AssessmentRepository for UnavailableAssessments {
    fn insert(&self, _assessment: AssessmentResult) -> Result<AssessmentResult, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn for_teacher(
        &self,
        _teacher_id: &TeacherId,
        _window: &DateWindow,
    ) -> Result<Vec<AssessmentResult>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

pub(super) fn json_request(method: &str, uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method(method)
        .uri(uri)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(
            serde_json::to_vec(body).expect("serialize body"),
        ))
        .expect("request builds")
}

pub(super) fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}
