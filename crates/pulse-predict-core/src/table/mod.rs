//! Bulk ingestion of uploaded patient tables.
//!
//! Pipeline: CSV header → schema check → row deserialization → PatientTable

mod schema;

pub use schema::*;

use std::io::Read;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{PatientRecord, FEATURE_COLUMNS};

/// Malformed upload.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("{0}")]
    Csv(#[from] csv::Error),

    #[error("file is empty")]
    Empty,

    #[error("file has a header row but no patient rows")]
    NoRows,

    #[error("column '{0}' appears more than once")]
    DuplicateColumn(String),

    #[error("row {row}: column '{column}' is not a finite number")]
    NonFinite { row: usize, column: &'static str },
}

/// Table ingestion errors.
#[derive(Error, Debug)]
pub enum TableError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<csv::Error> for TableError {
    fn from(e: csv::Error) -> Self {
        TableError::Parse(ParseError::Csv(e))
    }
}

pub type TableResult<T> = Result<T, TableError>;

/// Validated rows, projected onto the schema.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientTable {
    pub records: Vec<PatientRecord>,
    /// Extra columns that were present and dropped
    pub ignored_columns: Vec<String>,
}

impl PatientTable {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Read a CSV table with a header row.
///
/// Required columns may appear in any order. Extra columns are reported in
/// `ignored_columns` and never parsed.
pub fn read_patient_table<R: Read>(reader: R) -> TableResult<PatientTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Fields)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    if headers.is_empty() || headers.iter().all(|h| h.trim().is_empty()) {
        return Err(ParseError::Empty.into());
    }

    let ignored_columns = match check_columns(headers.iter()).into_result() {
        Ok(extra) => extra,
        Err(e) => {
            warn!(missing = ?e.missing, "Rejected table with missing columns");
            return Err(e.into());
        }
    };

    // Missing columns are reported first, even when another one repeats
    for col in FEATURE_COLUMNS {
        if headers.iter().filter(|h| *h == col).count() > 1 {
            return Err(ParseError::DuplicateColumn(col.to_string()).into());
        }
    }
    if !ignored_columns.is_empty() {
        warn!(columns = ?ignored_columns, "Ignoring extra columns");
    }

    let mut records = Vec::new();
    for (i, row) in rdr.deserialize::<PatientRecord>().enumerate() {
        let record = row?;
        if let Some(column) = record.first_non_finite() {
            return Err(ParseError::NonFinite { row: i + 1, column }.into());
        }
        records.push(record);
    }

    if records.is_empty() {
        return Err(ParseError::NoRows.into());
    }

    debug!(rows = records.len(), "Parsed patient table");

    Ok(PatientTable {
        records,
        ignored_columns,
    })
}
