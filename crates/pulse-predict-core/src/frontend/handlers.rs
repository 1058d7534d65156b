//! Handlers for submit-table, submit-form and reveal-disease-percentage.

use std::io::Read;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use super::advice::*;
use super::render::{format_percent, Block, Render};
use crate::classifier::Classifier;
use crate::export::{ExportError, CSV_MIME, DEFAULT_EXPORT_FILE_NAME, STATUS_COLUMN};
use crate::models::ManualEntry;
use crate::scoring::{Assessment, RiskBand, ScoringError, ScoringService};
use crate::table::{read_patient_table, TableError};

/// Faults that abort a request instead of being rendered.
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error(transparent)]
    Scoring(#[from] ScoringError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

pub type HandlerResult<T> = Result<T, HandlerError>;

/// Response to a form submission.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FormResponse {
    pub render: Render,
    /// Present when the form was valid and scored; feeds
    /// [`reveal_disease_percentage`].
    pub assessment: Option<Assessment>,
}

/// Front-end request handling over a loaded classifier.
pub struct Frontend<'a> {
    service: ScoringService<'a>,
    export_file_name: String,
}

impl<'a> Frontend<'a> {
    pub fn new(classifier: &'a dyn Classifier) -> Self {
        Self {
            service: ScoringService::new(classifier),
            export_file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        }
    }

    /// Override the suggested download file name.
    pub fn with_export_file_name(mut self, name: impl Into<String>) -> Self {
        self.export_file_name = name.into();
        self
    }

    pub fn service(&self) -> &ScoringService<'a> {
        &self.service
    }

    /// Handle an uploaded CSV table.
    pub fn submit_table<R: Read>(&self, reader: R) -> HandlerResult<Render> {
        let mut render = Render::new();

        let table = match read_patient_table(reader) {
            Ok(table) => table,
            Err(TableError::Schema(e)) => {
                render.error(e.to_string());
                for hint in &e.hints {
                    render.info(hint.message());
                }
                return Ok(render);
            }
            Err(TableError::Parse(e)) => {
                warn!(error = %e, "Failed to parse uploaded table");
                render.error(format!("Error processing file: {}", e));
                return Ok(render);
            }
        };

        if !table.ignored_columns.is_empty() {
            render.warning(format!(
                "Extra columns detected and ignored: {}",
                table.ignored_columns.join(", ")
            ));
        }

        let report = self.service.score_table(table)?;
        let data = report.to_csv()?;

        render.success(PREDICTIONS_COMPLETE);
        render.push(Block::Table {
            columns: vec!["Age".to_string(), STATUS_COLUMN.to_string()],
            rows: report
                .preview_rows()
                .into_iter()
                .map(|(age, status)| vec![age, status])
                .collect(),
        });
        render.push(Block::Download {
            label: DOWNLOAD_LABEL.to_string(),
            file_name: self.export_file_name.clone(),
            mime: CSV_MIME.to_string(),
            data,
        });

        Ok(render)
    }

    /// Handle a manual entry form submission.
    pub fn submit_form(&self, entry: &ManualEntry) -> HandlerResult<FormResponse> {
        let mut render = Render::new();

        let record = match entry.encode() {
            Ok(record) => record,
            Err(e) => {
                render.error(format!("Invalid input: {}", e));
                return Ok(FormResponse {
                    render,
                    assessment: None,
                });
            }
        };

        let assessment = self.service.assess(&record)?;

        if assessment.prediction.is_arrhythmia() {
            render.error(ARRHYTHMIA_ALERT);
            render.push(Block::Expander {
                title: PRECAUTIONS_TITLE.to_string(),
                heading: PRECAUTIONS_HEADING.to_string(),
                items: PRECAUTIONS.iter().map(|s| s.to_string()).collect(),
                callout: Some(EMERGENCY_WARNING.to_string()),
            });
        } else {
            render.success(HEART_SAFE_MESSAGE);
        }

        render.push(Block::Progress {
            value: assessment.progress_value(),
        });
        render.push(Block::Caption {
            text: format!("Model confidence: {}", format_percent(assessment.confidence)),
        });

        Ok(FormResponse {
            render,
            assessment: Some(assessment),
        })
    }
}

/// Show the disease chance for an earlier assessment.
pub fn reveal_disease_percentage(assessment: &Assessment) -> Render {
    let chance = assessment.disease_chance();
    let band = RiskBand::classify(chance);

    let mut render = Render::new();
    render.push(Block::Metric {
        label: DISEASE_CHANCE_LABEL.to_string(),
        value: format_percent(chance),
    });
    match band {
        RiskBand::High => render.warning(band.message()),
        RiskBand::Moderate => render.info(band.message()),
        RiskBand::Low => render.success(band.message()),
    };

    render
}
