//! PulsePredict Core Library
//!
//! Arrhythmia screening front-end over a pre-trained SVM classifier.
//!
//! # Architecture
//!
//! ```text
//!   CSV upload                      Manual entry form
//!       │                                  │
//!   [table] schema check             [models] validate + one-hot encode
//!       │                                  │
//!       └──────────────┬───────────────────┘
//!                      │
//!            [scoring] ScoringService ──► Classifier (loaded once, immutable)
//!                      │
//!            [frontend] Render blocks ──► UI / CLI
//!                      │
//!            [export] results CSV download
//! ```
//!
//! # Modules
//!
//! - [`models`]: Patient record, manual entry form, predictions
//! - [`classifier`]: Classifier trait and the SVM artifact
//! - [`table`]: CSV ingestion and column validation
//! - [`scoring`]: Scoring service, confidence and risk bands
//! - [`export`]: Scoring report and result exports
//! - [`frontend`]: Request handlers returning render instructions
//! - [`config`]: TOML configuration

pub mod classifier;
pub mod config;
pub mod export;
pub mod frontend;
pub mod models;
pub mod scoring;
pub mod table;

// Re-export commonly used types
pub use classifier::{Classifier, ModelInfo, SvmModel};
pub use config::Config;
pub use export::ScoringReport;
pub use frontend::{reveal_disease_percentage, Block, FormResponse, Frontend, Render};
pub use models::{ManualEntry, PatientRecord, Prediction, ScoredRecord, FEATURE_COLUMNS};
pub use scoring::{Assessment, RiskBand, ScoringService};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::Arc;

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum PulsePredictError {
    #[error("Model error: {0}")]
    ModelError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Classifier error: {0}")]
    ClassifierError(String),

    #[error("Export error: {0}")]
    ExportError(String),
}

impl From<classifier::ClassifierError> for PulsePredictError {
    fn from(e: classifier::ClassifierError) -> Self {
        PulsePredictError::ModelError(e.to_string())
    }
}

impl From<models::FormError> for PulsePredictError {
    fn from(e: models::FormError) -> Self {
        PulsePredictError::InvalidInput(e.to_string())
    }
}

impl From<frontend::HandlerError> for PulsePredictError {
    fn from(e: frontend::HandlerError) -> Self {
        match e {
            frontend::HandlerError::Scoring(e) => PulsePredictError::ClassifierError(e.to_string()),
            frontend::HandlerError::Export(e) => PulsePredictError::ExportError(e.to_string()),
        }
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Load the classifier artifact from a file.
#[uniffi::export]
pub fn load_model(path: String) -> Result<Arc<PulsePredictCore>, PulsePredictError> {
    let model = SvmModel::load(&path)?;
    Ok(Arc::new(PulsePredictCore::new(model)))
}

/// Load the classifier artifact from a JSON string (bundled resources).
#[uniffi::export]
pub fn load_model_from_json(json: String) -> Result<Arc<PulsePredictCore>, PulsePredictError> {
    let model = SvmModel::from_json_bytes(json.as_bytes())?;
    Ok(Arc::new(PulsePredictCore::new(model)))
}

// =========================================================================
// Main API Object
// =========================================================================

/// Loaded classifier plus the front-end handlers. Immutable and shareable.
#[derive(uniffi::Object)]
pub struct PulsePredictCore {
    model: Arc<SvmModel>,
    export_file_name: String,
}

impl PulsePredictCore {
    fn new(model: SvmModel) -> Self {
        Self {
            model: Arc::new(model),
            export_file_name: export::DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }

    fn frontend(&self) -> Frontend<'_> {
        Frontend::new(self.model.as_ref()).with_export_file_name(self.export_file_name.clone())
    }
}

#[uniffi::export]
impl PulsePredictCore {
    /// Summary of the loaded model.
    pub fn model_info(&self) -> FfiModelInfo {
        self.model.describe().into()
    }

    /// Score an uploaded CSV table.
    pub fn submit_table_csv(&self, csv: String) -> Result<FfiRender, PulsePredictError> {
        let render = self.frontend().submit_table(csv.as_bytes())?;
        Ok(render.into())
    }

    /// Score a manually entered record.
    pub fn submit_form(&self, entry: FfiManualEntry) -> Result<FfiFormResponse, PulsePredictError> {
        let entry = ManualEntry::try_from(entry)?;
        let response = self.frontend().submit_form(&entry)?;
        Ok(response.into())
    }

    /// Show the disease chance for an earlier assessment.
    pub fn reveal_disease_percentage(
        &self,
        assessment: FfiAssessment,
    ) -> Result<FfiRender, PulsePredictError> {
        let assessment = Assessment::try_from(assessment)?;
        Ok(reveal_disease_percentage(&assessment).into())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// FFI-safe model summary.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiModelInfo {
    pub fingerprint: String,
    pub kernel: String,
    pub support_vector_count: u32,
}

impl From<ModelInfo> for FfiModelInfo {
    fn from(info: ModelInfo) -> Self {
        Self {
            fingerprint: info.fingerprint,
            kernel: info.kernel,
            support_vector_count: info.support_vector_count as u32,
        }
    }
}

/// FFI-safe manual entry. Categorical fields carry the picker labels.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiManualEntry {
    pub age: u32,
    pub resting_bp: u32,
    pub cholesterol: u32,
    pub fasting_bs: u8,
    pub max_hr: u32,
    pub oldpeak: f64,
    pub sex: String,
    pub chest_pain_type: String,
    pub resting_ecg: String,
    pub exercise_angina: String,
    pub st_slope: String,
}

impl TryFrom<FfiManualEntry> for ManualEntry {
    type Error = models::FormError;

    fn try_from(entry: FfiManualEntry) -> Result<Self, Self::Error> {
        Ok(ManualEntry {
            age: entry.age,
            resting_bp: entry.resting_bp,
            cholesterol: entry.cholesterol,
            fasting_bs: entry.fasting_bs,
            max_hr: entry.max_hr,
            oldpeak: entry.oldpeak,
            sex: entry.sex.parse()?,
            chest_pain_type: entry.chest_pain_type.parse()?,
            resting_ecg: entry.resting_ecg.parse()?,
            exercise_angina: entry.exercise_angina.parse()?,
            st_slope: entry.st_slope.parse()?,
        })
    }
}

/// FFI-safe assessment, handed back for the disease-percentage action.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiAssessment {
    /// 0 or 1
    pub label: u8,
    pub decision_score: f64,
    pub confidence: f64,
}

impl From<Assessment> for FfiAssessment {
    fn from(a: Assessment) -> Self {
        Self {
            label: a.prediction.as_label(),
            decision_score: a.decision_score,
            confidence: a.confidence,
        }
    }
}

impl TryFrom<FfiAssessment> for Assessment {
    type Error = PulsePredictError;

    fn try_from(a: FfiAssessment) -> Result<Self, Self::Error> {
        let prediction = Prediction::from_label(a.label).ok_or_else(|| {
            PulsePredictError::InvalidInput(format!("label must be 0 or 1, got {}", a.label))
        })?;
        if !(0.0..=100.0).contains(&a.confidence) {
            return Err(PulsePredictError::InvalidInput(format!(
                "confidence must be within 0-100, got {}",
                a.confidence
            )));
        }
        Ok(Assessment {
            prediction,
            decision_score: a.decision_score,
            confidence: a.confidence,
        })
    }
}

/// FFI-safe render block.
#[derive(Debug, Clone, uniffi::Enum)]
pub enum FfiBlock {
    ErrorText { message: String },
    WarningText { message: String },
    SuccessText { message: String },
    InfoText { message: String },
    Table {
        columns: Vec<String>,
        rows: Vec<Vec<String>>,
    },
    Download {
        label: String,
        file_name: String,
        mime: String,
        data: String,
    },
    Expander {
        title: String,
        heading: String,
        items: Vec<String>,
        callout: Option<String>,
    },
    Progress { value: u8 },
    Caption { text: String },
    Metric { label: String, value: String },
}

impl From<Block> for FfiBlock {
    fn from(block: Block) -> Self {
        match block {
            Block::Error { message } => FfiBlock::ErrorText { message },
            Block::Warning { message } => FfiBlock::WarningText { message },
            Block::Success { message } => FfiBlock::SuccessText { message },
            Block::Info { message } => FfiBlock::InfoText { message },
            Block::Table { columns, rows } => FfiBlock::Table { columns, rows },
            Block::Download {
                label,
                file_name,
                mime,
                data,
            } => FfiBlock::Download {
                label,
                file_name,
                mime,
                data,
            },
            Block::Expander {
                title,
                heading,
                items,
                callout,
            } => FfiBlock::Expander {
                title,
                heading,
                items,
                callout,
            },
            Block::Progress { value } => FfiBlock::Progress { value },
            Block::Caption { text } => FfiBlock::Caption { text },
            Block::Metric { label, value } => FfiBlock::Metric { label, value },
        }
    }
}

/// FFI-safe render instructions.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiRender {
    pub blocks: Vec<FfiBlock>,
}

impl From<Render> for FfiRender {
    fn from(render: Render) -> Self {
        Self {
            blocks: render.blocks.into_iter().map(|b| b.into()).collect(),
        }
    }
}

/// FFI-safe form response.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiFormResponse {
    pub render: FfiRender,
    pub assessment: Option<FfiAssessment>,
}

impl From<FormResponse> for FfiFormResponse {
    fn from(response: FormResponse) -> Self {
        Self {
            render: response.render.into(),
            assessment: response.assessment.map(|a| a.into()),
        }
    }
}
