use chrono::{DateTime, NaiveDate, Utc};
use cognivio::workflows::assessment::{
    AssessmentRepository, AssessmentResult, DateWindow, RepositoryError, ScoreScale,
    TeacherDirectory, TeacherId, TeacherProfile,
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) raw_scale: ScoreScale,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryAssessmentRepository {
    records: Arc<Mutex<Vec<AssessmentResult>>>,
}

impl AssessmentRepository for InMemoryAssessmentRepository {
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

/// Teacher profiles in registration order.
#[derive(Default, Clone)]
pub(crate) struct InMemoryTeacherDirectory {
    profiles: Arc<Mutex<Vec<TeacherProfile>>>,
    index: Arc<Mutex<HashMap<TeacherId, usize>>>,
}

impl TeacherDirectory for InMemoryTeacherDirectory {
    fn insert(&self, profile: TeacherProfile) -> Result<TeacherProfile, RepositoryError> {
        let mut profiles = self.profiles.lock().expect("directory mutex poisoned");
        let mut index = self.index.lock().expect("directory mutex poisoned");
        if index.contains_key(&profile.id) {
            return Err(RepositoryError::Conflict);
        }
        index.insert(profile.id.clone(), profiles.len());
        profiles.push(profile.clone());
        Ok(profile)
    }

    fn fetch(&self, id: &TeacherId) -> Result<Option<TeacherProfile>, RepositoryError> {
        let profiles = self.profiles.lock().expect("directory mutex poisoned");
        let index = self.index.lock().expect("directory mutex poisoned");
        Ok(index.get(id).and_then(|&slot| profiles.get(slot)).cloned())
    }

    fn list(&self) -> Result<Vec<TeacherProfile>, RepositoryError> {
        let profiles = self.profiles.lock().expect("directory mutex poisoned");
        Ok(profiles.clone())
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Midday UTC on `date`, used for seeded assessment timestamps.
pub(crate) fn midday(date: NaiveDate) -> DateTime<Utc> {
    date.and_hms_opt(12, 0, 0)
        .map(|naive| naive.and_utc())
        .unwrap_or_else(Utc::now)
}
