//! Ingestion of raw element scores from model replies and CSV exports.
//!
//! Raw scores arrive on either the 1-4 rubric scale or the 1-10 gradient scale. They
//! are range-checked against the declared scale and rescaled onto the gradient here,
//! so nothing downstream ever sees a rubric value.

mod model;
mod normalizer;
mod parser;

use crate::workflows::assessment::domain::{ElementScore, ScoreScale};
use crate::workflows::assessment::rubric::{element_name, elements_for, FrameworkKind};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Score record as reported by a provider, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawElementScore {
    pub element_id: String,
    #[serde(default)]
    pub element_name: String,
    pub score: f64,
    #[serde(default)]
    pub observations: Vec<String>,
    #[serde(default)]
    pub confidence: f64,
}

#[derive(Debug, thiserror::Error)]
pub enum ScoreImportError {
    #[error("failed to read score export: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid score CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid score payload: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model response did not contain a JSON object")]
    MissingPayload,
    #[error("score {score} for element '{element_id}' is outside the {scale} range {min}-{max}")]
    ScoreOutOfRange {
        element_id: String,
        score: f64,
        scale: &'static str,
        min: f64,
        max: f64,
    },
    #[error("confidence {confidence} for element '{element_id}' must be between 0 and 100")]
    ConfidenceOutOfRange { element_id: String, confidence: f64 },
}

pub struct ScoreImporter;

impl ScoreImporter {
    /// Reads the `element_scores` array out of a vision-model reply.
    pub fn from_model_response(
        text: &str,
        scale: ScoreScale,
    ) -> Result<Vec<ElementScore>, ScoreImportError> {
        let json = model::extract_object(text).ok_or(ScoreImportError::MissingPayload)?;
        let records = model::parse_payload(json)?;
        debug!(count = records.len(), scale = scale.label(), "parsed model response");
        Self::ingest(records, scale)
    }

    pub fn from_path<P: AsRef<Path>>(
        path: P,
        scale: ScoreScale,
    ) -> Result<Vec<ElementScore>, ScoreImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, scale)
    }

    /// Reads a CSV export with `Element ID, Element Name, Score, Observations, Confidence`
    /// headers. Rows without an element id are skipped; repeated ids are kept as
    /// separate measurements.
    pub fn from_reader<R: Read>(
        reader: R,
        scale: ScoreScale,
    ) -> Result<Vec<ElementScore>, ScoreImportError> {
        let mut records = Vec::new();
        for (index, record) in parser::parse_records(reader)?.into_iter().enumerate() {
            match record {
                Some(record) => records.push(record),
                None => warn!(row = index + 1, "skipping score row without an element id"),
            }
        }

        debug!(count = records.len(), scale = scale.label(), "parsed score CSV");
        Self::ingest(records, scale)
    }

    /// Validates raw records against `scale` and converts them to gradient scores.
    pub fn ingest<I>(records: I, scale: ScoreScale) -> Result<Vec<ElementScore>, ScoreImportError>
    where
        I: IntoIterator<Item = RawElementScore>,
    {
        records
            .into_iter()
            .map(|record| Self::convert(record, scale))
            .collect()
    }

    /// Keeps scores for the selected elements of `framework`. An empty selection keeps
    /// everything, including ids outside the catalog.
    pub fn retain_selected(
        scores: Vec<ElementScore>,
        framework: FrameworkKind,
        selected: &[String],
    ) -> Vec<ElementScore> {
        if selected.is_empty() {
            return scores;
        }

        let wanted: HashSet<&'static str> = elements_for(framework, selected)
            .into_iter()
            .map(|element| element.id)
            .collect();
        let before = scores.len();
        let kept: Vec<ElementScore> = scores
            .into_iter()
            .filter(|score| wanted.contains(score.element_id()))
            .collect();

        if kept.len() < before {
            debug!(
                dropped = before - kept.len(),
                framework = framework.as_str(),
                "dropped scores outside the element selection"
            );
        }
        kept
    }

    fn convert(record: RawElementScore, scale: ScoreScale) -> Result<ElementScore, ScoreImportError> {
        let range = scale.range();
        if !range.contains(&record.score) {
            return Err(ScoreImportError::ScoreOutOfRange {
                element_id: record.element_id,
                score: record.score,
                scale: scale.label(),
                min: *range.start(),
                max: *range.end(),
            });
        }
        if !(0.0..=100.0).contains(&record.confidence) {
            return Err(ScoreImportError::ConfidenceOutOfRange {
                element_id: record.element_id,
                confidence: record.confidence,
            });
        }

        let name = if record.element_name.trim().is_empty() {
            element_name(&record.element_id)
                .map(str::to_string)
                .unwrap_or_else(|| record.element_id.clone())
        } else {
            record.element_name
        };

        Ok(ElementScore::new(record.element_id, name, scale.to_gradient(record.score))
            .with_observations(record.observations)
            .with_confidence(record.confidence))
    }
}
