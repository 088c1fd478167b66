pub(crate) const OBSERVATION_SEPARATOR: char = '|';

/// Strips byte-order and zero-width marks that spreadsheet exports leave on ids.
pub(crate) fn clean_identifier(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

pub(crate) fn split_observations(value: &str) -> Vec<String> {
    value
        .split(OBSERVATION_SEPARATOR)
        .map(str::trim)
        .filter(|observation| !observation.is_empty())
        .map(str::to_string)
        .collect()
}
