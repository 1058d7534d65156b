//! Classifier output models.

use serde::{Deserialize, Serialize};

use super::PatientRecord;

/// Status text for a positive label.
pub const STATUS_ARRHYTHMIA: &str = "Arrhythmia Detected";
/// Status text for a negative label.
pub const STATUS_SAFE: &str = "Heart is Safe";

/// Binary label produced by the classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Prediction {
    /// Label 0
    NoArrhythmia,
    /// Label 1
    Arrhythmia,
}

impl Prediction {
    /// Numeric label as written to exports (0 or 1).
    pub fn as_label(&self) -> u8 {
        match self {
            Prediction::NoArrhythmia => 0,
            Prediction::Arrhythmia => 1,
        }
    }

    /// Parse a numeric label. Anything other than 0 or 1 is rejected.
    pub fn from_label(label: u8) -> Option<Self> {
        match label {
            0 => Some(Prediction::NoArrhythmia),
            1 => Some(Prediction::Arrhythmia),
            _ => None,
        }
    }

    /// Human-readable status string.
    pub fn status(&self) -> &'static str {
        match self {
            Prediction::NoArrhythmia => STATUS_SAFE,
            Prediction::Arrhythmia => STATUS_ARRHYTHMIA,
        }
    }

    pub fn is_arrhythmia(&self) -> bool {
        matches!(self, Prediction::Arrhythmia)
    }
}

/// A patient record with its predicted label.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoredRecord {
    pub record: PatientRecord,
    pub prediction: Prediction,
}

impl ScoredRecord {
    pub fn status(&self) -> &'static str {
        self.prediction.status()
    }
}
