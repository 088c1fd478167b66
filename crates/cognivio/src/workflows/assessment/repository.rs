use super::domain::{AssessmentResult, DateWindow, TeacherId, TeacherProfile};

/// Storage for finished assessments so the service can be exercised in isolation.
pub trait AssessmentRepository: Send + Sync {
    fn insert(&self, assessment: AssessmentResult) -> Result<AssessmentResult, RepositoryError>;
    /// Every stored assessment for `teacher_id` inside `window`, in no particular order.
    fn for_teacher(
        &self,
        teacher_id: &TeacherId,
        window: &DateWindow,
    ) -> Result<Vec<AssessmentResult>, RepositoryError>;
}

/// Teacher profiles referenced by assessments.
pub trait TeacherDirectory: Send + Sync {
    fn insert(&self, profile: TeacherProfile) -> Result<TeacherProfile, RepositoryError>;
    fn fetch(&self, id: &TeacherId) -> Result<Option<TeacherProfile>, RepositoryError>;
    fn list(&self) -> Result<Vec<TeacherProfile>, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
