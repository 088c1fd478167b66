use super::RawElementScore;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct ModelPayload {
    #[serde(default)]
    element_scores: Vec<RawElementScore>,
}

/// Outermost `{...}` span of a model reply, which may wrap the JSON in prose or
/// code fences.
pub(crate) fn extract_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

pub(crate) fn parse_payload(json: &str) -> Result<Vec<RawElementScore>, serde_json::Error> {
    let payload: ModelPayload = serde_json::from_str(json)?;
    Ok(payload.element_scores)
}
