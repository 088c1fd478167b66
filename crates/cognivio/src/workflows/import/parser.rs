use super::normalizer::{clean_identifier, split_observations};
use super::RawElementScore;
use serde::{Deserialize, Deserializer};
use std::io::Read;

/// Reads score rows; rows without an element id are returned as `None` so the
/// caller can report them.
pub(crate) fn parse_records<R: Read>(
    reader: R,
) -> Result<Vec<Option<RawElementScore>>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut records = Vec::new();

    for record in csv_reader.deserialize::<ScoreRow>() {
        let row = record?;
        let element_id = clean_identifier(&row.element_id);
        if element_id.is_empty() {
            records.push(None);
            continue;
        }

        records.push(Some(RawElementScore {
            element_id,
            element_name: row.element_name.unwrap_or_default(),
            score: row.score,
            observations: row
                .observations
                .as_deref()
                .map(split_observations)
                .unwrap_or_default(),
            confidence: row.confidence.unwrap_or(0.0),
        }));
    }

    Ok(records)
}

#[derive(Debug, Deserialize)]
struct ScoreRow {
    #[serde(rename = "Element ID", alias = "\u{feff}Element ID")]
    element_id: String,
    #[serde(
        rename = "Element Name",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    element_name: Option<String>,
    #[serde(rename = "Score")]
    score: f64,
    #[serde(
        rename = "Observations",
        default,
        deserialize_with = "empty_string_as_none"
    )]
    observations: Option<String>,
    #[serde(rename = "Confidence", default, deserialize_with = "blank_as_none")]
    confidence: Option<f64>,
}

fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    Ok(opt.filter(|value| !value.trim().is_empty()))
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let opt = Option::<String>::deserialize(deserializer)?;
    match opt.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
