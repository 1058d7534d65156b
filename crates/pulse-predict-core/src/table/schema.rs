//! Column validation against the fixed feature schema.

use serde::{Deserialize, Serialize};
use strsim::jaro_winkler;
use thiserror::Error;

use crate::models::FEATURE_COLUMNS;

/// Minimum similarity for an extra column to be offered as a hint.
const HINT_THRESHOLD: f64 = 0.85;

/// Required columns are absent from an uploaded table.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[error("Missing required columns: {}", .missing.join(", "))]
pub struct SchemaError {
    /// Missing column names, in schema order
    pub missing: Vec<String>,
    /// Likely misspellings found among the extra columns
    pub hints: Vec<ColumnHint>,
}

/// A present column that probably meant a missing one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnHint {
    pub missing: String,
    pub candidate: String,
    pub similarity: f64,
}

impl ColumnHint {
    pub fn message(&self) -> String {
        format!(
            "Column '{}' is missing; did you mean '{}'?",
            self.missing, self.candidate
        )
    }
}

/// Outcome of comparing a header row with the schema.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnCheck {
    /// Required columns not present, in schema order
    pub missing: Vec<String>,
    /// Present columns outside the schema, in input order
    pub extra: Vec<String>,
}

impl ColumnCheck {
    pub fn is_valid(&self) -> bool {
        self.missing.is_empty()
    }

    /// Convert into a schema error when anything is missing.
    pub fn into_result(self) -> Result<Vec<String>, SchemaError> {
        if self.missing.is_empty() {
            return Ok(self.extra);
        }
        let hints = suggest_columns(&self.missing, &self.extra);
        Err(SchemaError {
            missing: self.missing,
            hints,
        })
    }
}

/// Compare header names with the required columns. Matching is exact.
pub fn check_columns<'a, I>(headers: I) -> ColumnCheck
where
    I: IntoIterator<Item = &'a str>,
{
    let headers: Vec<&str> = headers.into_iter().collect();

    let missing = FEATURE_COLUMNS
        .iter()
        .filter(|col| !headers.contains(col))
        .map(|col| col.to_string())
        .collect();

    let mut extra: Vec<String> = Vec::new();
    for h in headers {
        if !FEATURE_COLUMNS.contains(&h) && !extra.iter().any(|e| e == h) {
            extra.push(h.to_string());
        }
    }

    ColumnCheck { missing, extra }
}

/// Pair each missing column with its closest extra column, if close enough.
pub fn suggest_columns(missing: &[String], extra: &[String]) -> Vec<ColumnHint> {
    missing
        .iter()
        .filter_map(|m| {
            let m_lower = m.to_lowercase();
            extra
                .iter()
                .map(|e| (e, jaro_winkler(&m_lower, &e.trim().to_lowercase())))
                .filter(|(_, score)| *score >= HINT_THRESHOLD)
                .max_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal))
                .map(|(e, score)| ColumnHint {
                    missing: m.clone(),
                    candidate: e.clone(),
                    similarity: score,
                })
        })
        .collect()
}
