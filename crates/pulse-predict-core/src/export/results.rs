//! Scoring report and its CSV/JSON exports.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classifier::ModelInfo;
use crate::models::{ScoredRecord, FEATURE_COLUMNS};

/// Suggested file name for the downloadable results.
pub const DEFAULT_EXPORT_FILE_NAME: &str = "pulsepredict_results.csv";
/// MIME type of the CSV export.
pub const CSV_MIME: &str = "text/csv";
/// Appended label column.
pub const PREDICTION_COLUMN: &str = "ArrhythmiaPrediction";
/// Appended status column.
pub const STATUS_COLUMN: &str = "Status";

/// Export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Encoding error: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type ExportResult<T> = Result<T, ExportError>;

/// Report metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    /// Unique ID of this scoring run
    pub run_id: String,
    /// Scoring timestamp (RFC 3339)
    pub scored_at: String,
    /// Fingerprint of the classifier used
    pub model_fingerprint: String,
    /// Number of scored rows
    pub row_count: usize,
    /// Rows labelled as arrhythmia
    pub arrhythmia_count: usize,
    /// Extra input columns that were dropped
    pub ignored_columns: Vec<String>,
}

impl ReportMetadata {
    pub fn new(model: &ModelInfo, records: &[ScoredRecord], ignored_columns: Vec<String>) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            scored_at: chrono::Utc::now().to_rfc3339(),
            model_fingerprint: model.fingerprint.clone(),
            row_count: records.len(),
            arrhythmia_count: records
                .iter()
                .filter(|r| r.prediction.is_arrhythmia())
                .count(),
            ignored_columns,
        }
    }
}

/// A scored table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoringReport {
    pub metadata: ReportMetadata,
    pub records: Vec<ScoredRecord>,
}

impl ScoringReport {
    /// Header of the CSV export: schema columns, then label and status.
    pub fn csv_header() -> Vec<&'static str> {
        let mut header: Vec<&str> = FEATURE_COLUMNS.to_vec();
        header.push(PREDICTION_COLUMN);
        header.push(STATUS_COLUMN);
        header
    }

    /// Export to CSV.
    ///
    /// Values use the shortest representation that parses back to the same
    /// number, so the file can be uploaded again unchanged.
    pub fn to_csv(&self) -> ExportResult<String> {
        let mut wtr = csv::Writer::from_writer(Vec::new());
        wtr.write_record(Self::csv_header())?;

        for scored in &self.records {
            let mut row: Vec<String> = scored
                .record
                .to_features()
                .iter()
                .map(|v| v.to_string())
                .collect();
            row.push(scored.prediction.as_label().to_string());
            row.push(scored.status().to_string());
            wtr.write_record(&row)?;
        }

        let bytes = wtr.into_inner().map_err(|e| e.into_error())?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Export to JSON.
    pub fn to_json(&self) -> ExportResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// (Age, Status) pairs for the on-screen table.
    pub fn preview_rows(&self) -> Vec<(String, String)> {
        self.records
            .iter()
            .map(|r| (r.record.age.to_string(), r.status().to_string()))
            .collect()
    }
}
