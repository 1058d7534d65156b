//! Scoring flow over an injected classifier.

mod confidence;

pub use confidence::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::classifier::{Classifier, ClassifierError, ModelInfo};
use crate::export::{ReportMetadata, ScoringReport};
use crate::models::{PatientRecord, Prediction, ScoredRecord};
use crate::table::PatientTable;

/// Scoring errors.
#[derive(Error, Debug)]
pub enum ScoringError {
    #[error("Classifier error: {0}")]
    Classifier(#[from] ClassifierError),
}

pub type ScoringResult<T> = Result<T, ScoringError>;

/// Result of scoring a single manually entered record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Assessment {
    pub prediction: Prediction,
    /// Raw signed margin from the classifier
    pub decision_score: f64,
    /// Confidence percentage in [0, 100]
    pub confidence: f64,
}

impl Assessment {
    pub fn new(prediction: Prediction, decision_score: f64) -> Self {
        Self {
            prediction,
            decision_score,
            confidence: confidence(decision_score),
        }
    }

    pub fn progress_value(&self) -> u8 {
        progress_value(self.confidence)
    }

    pub fn disease_chance(&self) -> f64 {
        disease_chance(self.prediction, self.confidence)
    }

    pub fn risk_band(&self) -> RiskBand {
        RiskBand::classify(self.disease_chance())
    }
}

/// Runs validated records through a classifier.
pub struct ScoringService<'a> {
    classifier: &'a dyn Classifier,
}

impl<'a> ScoringService<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self { classifier }
    }

    pub fn model_info(&self) -> ModelInfo {
        self.classifier.describe()
    }

    /// Batch-predict labels for the given records.
    pub fn score_records(&self, records: &[PatientRecord]) -> ScoringResult<Vec<ScoredRecord>> {
        let labels = self.classifier.predict(records)?;
        ensure_one_per_row(records.len(), labels.len())?;

        Ok(records
            .iter()
            .zip(labels)
            .map(|(record, prediction)| ScoredRecord {
                record: *record,
                prediction,
            })
            .collect())
    }

    /// Score every row of an uploaded table.
    pub fn score_table(&self, table: PatientTable) -> ScoringResult<ScoringReport> {
        let records = self.score_records(&table.records)?;
        let metadata = ReportMetadata::new(
            &self.classifier.describe(),
            &records,
            table.ignored_columns,
        );

        info!(
            run_id = %metadata.run_id,
            rows = metadata.row_count,
            arrhythmia = metadata.arrhythmia_count,
            "Scored patient table"
        );

        Ok(ScoringReport { metadata, records })
    }

    /// Predict and compute the margin for a single record.
    pub fn assess(&self, record: &PatientRecord) -> ScoringResult<Assessment> {
        let rows = std::slice::from_ref(record);

        let labels = self.classifier.predict(rows)?;
        ensure_one_per_row(1, labels.len())?;
        let scores = self.classifier.decision_function(rows)?;
        ensure_one_per_row(1, scores.len())?;

        let assessment = Assessment::new(labels[0], scores[0]);
        debug!(
            label = assessment.prediction.as_label(),
            score = assessment.decision_score,
            confidence = assessment.confidence,
            "Assessed single record"
        );

        Ok(assessment)
    }
}

fn ensure_one_per_row(expected: usize, actual: usize) -> ScoringResult<()> {
    if expected != actual {
        return Err(ClassifierError::DimensionMismatch { expected, actual }.into());
    }
    Ok(())
}
