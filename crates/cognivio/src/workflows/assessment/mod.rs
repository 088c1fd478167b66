//! Teacher-assessment scoring: score banding, per-element aggregation, narrative text,
//! peer matching, and the teacher rollups built on top of them.
//!
//! Everything below `service` is pure and synchronous. Scores are on the 1-10
//! gradient scale by the time they reach this module; see `workflows::import`.

pub mod aggregate;
pub mod domain;
pub mod narrative;
pub mod normalizer;
pub mod peers;
pub mod report;
pub mod repository;
pub mod router;
pub mod rubric;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregate::{aggregate, overall, AggregateElementSummary, ElementAggregates};
pub use domain::{
    AssessmentDraft, AssessmentResult, DateWindow, ElementScore, PerformanceLevel, RubricLevel,
    ScoreScale, TeacherId, TeacherProfile, UnknownScoreScale,
};
pub use narrative::{recommend, summarize, ElementRating};
pub use normalizer::{level_for, rubric_level_for};
pub use peers::{recommend_peers, PeerCandidate, PeerRecommendation, PeerStrength};
pub use report::{
    build_roster, roster_entry, Roster, TeacherDashboard, TeacherInsights, TeacherRosterEntry,
    TrendPoint,
};
pub use repository::{AssessmentRepository, RepositoryError, TeacherDirectory};
pub use router::assessment_router;
pub use rubric::{FrameworkKind, UnknownFramework};
pub use service::{AssessmentService, AssessmentServiceError, AssessmentSubmission};
