//! `Label: value` lines typed in by hand.

use crate::error::{Error, Result};
use crate::model::PersonRecord;

/// Split each line at its first colon. Lines without a colon or with an
/// empty label are skipped; order is kept.
pub fn parse_key_values(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Build a person from manual input.
pub fn extract_manual_person(text: &str) -> Result<PersonRecord> {
    let pairs = parse_key_values(text);
    if pairs.is_empty() {
        return Err(Error::Format("no `Label: value` lines found".to_string()));
    }
    Ok(PersonRecord::from_key_values(&pairs))
}
