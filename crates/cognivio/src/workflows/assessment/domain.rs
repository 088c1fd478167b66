use super::aggregate::mean;
use super::narrative::{recommend, summarize, ElementRating};
use super::normalizer::{level_for, round_to};
use super::rubric::FrameworkKind;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// Band derived from a 1-10 gradient score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PerformanceLevel {
    Excellent,
    NeedsImprovement,
    Critical,
}

impl PerformanceLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::NeedsImprovement => "Needs Improvement",
            Self::Critical => "Critical",
        }
    }
}

/// Categorical band for raw 1-4 rubric output, before rescaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RubricLevel {
    Distinguished,
    Proficient,
    Basic,
    Unsatisfactory,
}

/// Numeric scale a raw score was reported on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreScale {
    /// 1-4 rubric score as requested from the vision model.
    #[default]
    Rubric,
    /// 1-10 gradient score used everywhere after ingestion.
    Gradient,
}

impl ScoreScale {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Rubric => "rubric",
            Self::Gradient => "gradient",
        }
    }

    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Self::Rubric => 1.0..=4.0,
            Self::Gradient => 1.0..=10.0,
        }
    }

    /// Maps a value on this scale onto the 1-10 gradient.
    ///
    /// Rubric values use `1 + (raw - 1) * 3`, so 1 stays 1 and 4 becomes 10.
    pub fn to_gradient(self, value: f64) -> f64 {
        match self {
            Self::Rubric => 1.0 + (value - 1.0) * 3.0,
            Self::Gradient => value,
        }
    }
}

impl FromStr for ScoreScale {
    type Err = UnknownScoreScale;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "rubric" | "1-4" | "legacy" => Ok(Self::Rubric),
            "gradient" | "1-10" => Ok(Self::Gradient),
            _ => Err(UnknownScoreScale(value.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown score scale '{0}' (expected 'rubric' or 'gradient')")]
pub struct UnknownScoreScale(pub String);

/// A single rubric measurement on the gradient scale.
///
/// The performance level is not stored; it is derived from `score` on every read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ElementScoreRecord", into = "ElementScoreRecord")]
pub struct ElementScore {
    element_id: String,
    element_name: String,
    score: f64,
    observations: Vec<String>,
    confidence: f64,
}

impl ElementScore {
    pub fn new(element_id: impl Into<String>, element_name: impl Into<String>, score: f64) -> Self {
        Self {
            element_id: element_id.into(),
            element_name: element_name.into(),
            score,
            observations: Vec::new(),
            confidence: 0.0,
        }
    }

    pub fn with_observations<I, S>(mut self, observations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.observations = observations.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn element_id(&self) -> &str {
        &self.element_id
    }

    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn level(&self) -> PerformanceLevel {
        level_for(self.score)
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }
}

/// Wire shape of [`ElementScore`]; any incoming `level` is discarded.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ElementScoreRecord {
    element_id: String,
    element_name: String,
    score: f64,
    #[serde(default, skip_deserializing)]
    level: Option<PerformanceLevel>,
    #[serde(default)]
    observations: Vec<String>,
    #[serde(default)]
    confidence: f64,
}

impl From<ElementScoreRecord> for ElementScore {
    fn from(record: ElementScoreRecord) -> Self {
        Self {
            element_id: record.element_id,
            element_name: record.element_name,
            score: record.score,
            observations: record.observations,
            confidence: record.confidence,
        }
    }
}

impl From<ElementScore> for ElementScoreRecord {
    fn from(score: ElementScore) -> Self {
        let level = Some(score.level());
        Self {
            element_id: score.element_id,
            element_name: score.element_name,
            score: score.score,
            level,
            observations: score.observations,
            confidence: score.confidence,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeacherId(pub String);

impl fmt::Display for TeacherId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TeacherId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Identity fields of a teacher; owned by the directory, referenced here by id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeacherProfile {
    pub id: TeacherId,
    pub name: String,
    pub subject: String,
    pub grade_level: String,
    #[serde(default)]
    pub department: Option<String>,
}

/// Inputs for one analysis run, before derived fields are computed.
#[derive(Debug, Clone)]
pub struct AssessmentDraft {
    pub id: String,
    pub video_id: String,
    pub teacher_id: TeacherId,
    pub framework: FrameworkKind,
    pub element_scores: Vec<ElementScore>,
    pub analyzed_at: DateTime<Utc>,
}

/// Atomic output of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentResult {
    pub id: String,
    pub video_id: String,
    pub teacher_id: TeacherId,
    pub framework: FrameworkKind,
    pub element_scores: Vec<ElementScore>,
    pub overall_score: f64,
    pub summary: String,
    pub recommendations: Vec<String>,
    pub analyzed_at: DateTime<Utc>,
}

impl AssessmentResult {
    /// Derives the overall score, summary, and recommendations for a finished run.
    ///
    /// The overall score averages the strictly positive element scores (two decimals),
    /// falling back to 0 when there are none.
    pub fn new(draft: AssessmentDraft) -> Self {
        let AssessmentDraft {
            id,
            video_id,
            teacher_id,
            framework,
            element_scores,
            analyzed_at,
        } = draft;

        let overall_score = mean(
            element_scores
                .iter()
                .map(ElementScore::score)
                .filter(|score| *score > 0.0),
        )
        .map(|value| round_to(value, 2))
        .unwrap_or(0.0);

        let ratings: Vec<ElementRating> = element_scores.iter().map(ElementRating::from).collect();
        let summary = summarize(&ratings, overall_score);
        let recommendations = recommend(&ratings);

        Self {
            id,
            video_id,
            teacher_id,
            framework,
            element_scores,
            overall_score,
            summary,
            recommendations,
            analyzed_at,
        }
    }

    pub fn ratings(&self) -> Vec<ElementRating> {
        self.element_scores.iter().map(ElementRating::from).collect()
    }
}

/// Inclusive bounds on `analyzed_at`; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateWindow {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl DateWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// Whole-day window: `start` from midnight, `end` through the last instant of the day.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            start: start
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc()),
            end: end
                .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
                .map(|naive| naive.and_utc()),
        }
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.map_or(true, |start| at >= start) && self.end.map_or(true, |end| at <= end)
    }

    pub fn filter<'a>(&self, assessments: &'a [AssessmentResult]) -> Vec<&'a AssessmentResult> {
        assessments
            .iter()
            .filter(|assessment| self.contains(assessment.analyzed_at))
            .collect()
    }
}
