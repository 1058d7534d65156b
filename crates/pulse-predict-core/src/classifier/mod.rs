//! Classifier boundary.
//!
//! The trained model is an opaque artifact. Everything downstream talks to
//! it through [`Classifier`], so tests can substitute a fixed decision rule
//! and the artifact format can change without touching the scoring flow.

mod svm;

pub use svm::*;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{PatientRecord, Prediction};

/// Classifier errors.
#[derive(Error, Debug)]
pub enum ClassifierError {
    #[error("I/O error reading model: {0}")]
    Io(#[from] std::io::Error),

    #[error("Model JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid model artifact: {0}")]
    InvalidArtifact(String),

    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}

pub type ClassifierResult<T> = Result<T, ClassifierError>;

/// Summary of a loaded model, for logging and display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelInfo {
    /// SHA-256 of the artifact bytes, hex encoded
    pub fingerprint: String,
    /// Kernel name (linear, rbf, poly, sigmoid)
    pub kernel: String,
    /// Number of support vectors
    pub support_vector_count: usize,
}

/// A pre-trained binary classifier over [`PatientRecord`] rows.
///
/// Both operations are batch-capable and return one value per input row,
/// in input order. Implementations must be deterministic.
pub trait Classifier: Send + Sync {
    /// Predict a label for each row.
    fn predict(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<Prediction>>;

    /// Signed distance from the decision boundary for each row.
    /// Positive means the arrhythmia side.
    fn decision_function(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<f64>>;

    /// Describe the loaded model.
    fn describe(&self) -> ModelInfo;
}
