//! End-to-end tests for the bulk (uploaded table) path.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use pulse_predict_core::classifier::{Classifier, ClassifierResult, ModelInfo};
use pulse_predict_core::export::ScoringReport;
use pulse_predict_core::table::{read_patient_table, TableError};
use pulse_predict_core::{
    Block, Frontend, PatientRecord, Prediction, ScoringService, SvmModel, FEATURE_COLUMNS,
};

fn fixture_model() -> SvmModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/rbf_model.json");
    SvmModel::load(path).unwrap()
}

const ROWS: [&str; 4] = [
    "58,150,270,1,110,2.5,1,0,0,0,0,1,1,1,0",
    "34,118,210,0,178,0,0,1,0,0,1,0,0,0,1",
    "61,140,0,1,105,1.8,1,0,0,0,0,1,1,1,0",
    "45,125,230,0,160,0.4,1,0,1,0,1,0,0,0,1",
];

fn table_csv() -> String {
    let mut csv = FEATURE_COLUMNS.join(",");
    csv.push('\n');
    for row in ROWS {
        csv.push_str(row);
        csv.push('\n');
    }
    csv
}

/// Counts predict calls; always answers "no arrhythmia".
#[derive(Default)]
struct CountingClassifier {
    calls: AtomicUsize,
}

impl Classifier for CountingClassifier {
    fn predict(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<Prediction>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![Prediction::NoArrhythmia; rows.len()])
    }

    fn decision_function(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<f64>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(vec![-1.0; rows.len()])
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            fingerprint: "counting".into(),
            kernel: "none".into(),
            support_vector_count: 0,
        }
    }
}

fn score(model: &dyn Classifier, csv: &str) -> ScoringReport {
    let table = read_patient_table(csv.as_bytes()).unwrap();
    ScoringService::new(model).score_table(table).unwrap()
}

#[test]
fn test_fixture_model_separates_profiles() {
    let model = fixture_model();
    let report = score(&model, &table_csv());

    let labels: Vec<u8> = report.records.iter().map(|r| r.prediction.as_label()).collect();
    assert_eq!(labels, vec![1, 0, 1, 0]);
    assert_eq!(report.metadata.arrhythmia_count, 2);
    assert_eq!(report.metadata.model_fingerprint, model.describe().fingerprint);
}

#[test]
fn test_missing_columns_skip_prediction() {
    let classifier = CountingClassifier::default();
    let header: Vec<&str> = FEATURE_COLUMNS
        .iter()
        .copied()
        .filter(|c| !c.starts_with("ST_Slope"))
        .collect();
    let csv = format!("{}\n{}\n", header.join(","), "1,2,3,4,5,6,7,8,9,10,11,12,13");

    match read_patient_table(csv.as_bytes()) {
        Err(TableError::Schema(e)) => {
            assert_eq!(e.missing, vec!["ST_Slope_Flat", "ST_Slope_Up"]);
        }
        other => panic!("expected schema error, got {:?}", other),
    }

    let render = Frontend::new(&classifier).submit_table(csv.as_bytes()).unwrap();
    assert!(render.has_error());
    assert_eq!(classifier.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_extras_warned_and_dropped() {
    let model = fixture_model();
    let mut csv = format!("PatientId,{},Notes\n", FEATURE_COLUMNS.join(","));
    for (i, row) in ROWS.iter().enumerate() {
        csv.push_str(&format!("P{},{},seen\n", i, row));
    }

    let render = Frontend::new(&model).submit_table(csv.as_bytes()).unwrap();
    assert!(matches!(
        &render.blocks[0],
        Block::Warning { message } if message == "Extra columns detected and ignored: PatientId, Notes"
    ));

    let Some(Block::Download { data, .. }) = render.download() else {
        panic!("expected a download block");
    };
    let header = data.lines().next().unwrap();
    assert!(!header.contains("PatientId"));
    assert!(!header.contains("Notes"));
    assert_eq!(header.split(',').count(), FEATURE_COLUMNS.len() + 2);
}

#[test]
fn test_export_round_trip_is_deterministic() {
    let model = fixture_model();
    let first = score(&model, &table_csv());
    let exported = first.to_csv().unwrap();

    // Strip ArrhythmiaPrediction and Status, then score again
    let stripped: String = exported
        .lines()
        .map(|line| {
            let cells: Vec<&str> = line.split(',').collect();
            format!("{}\n", cells[..cells.len() - 2].join(","))
        })
        .collect();
    let second = score(&model, &stripped);

    let records: Vec<PatientRecord> = first.records.iter().map(|r| r.record).collect();
    let again: Vec<PatientRecord> = second.records.iter().map(|r| r.record).collect();
    assert_eq!(records, again);

    let labels = |r: &ScoringReport| -> Vec<Prediction> {
        r.records.iter().map(|s| s.prediction).collect()
    };
    assert_eq!(labels(&first), labels(&second));
    assert_eq!(
        model.decision_function(&records).unwrap(),
        model.decision_function(&again).unwrap()
    );
}

#[test]
fn test_export_reingested_with_appended_columns() {
    let model = fixture_model();
    let exported = score(&model, &table_csv()).to_csv().unwrap();

    // Uploading the results file as-is treats the appended columns as extras
    let table = read_patient_table(exported.as_bytes()).unwrap();
    assert_eq!(table.ignored_columns, vec!["ArrhythmiaPrediction", "Status"]);
    assert_eq!(table.len(), ROWS.len());
}

#[test]
fn test_malformed_file_reports_error() {
    let model = fixture_model();
    let csv = format!("{}\n{}\n", FEATURE_COLUMNS.join(","), "58,150,\"unterminated");

    let render = Frontend::new(&model).submit_table(csv.as_bytes()).unwrap();
    assert_eq!(render.blocks.len(), 1);
    assert!(matches!(
        &render.blocks[0],
        Block::Error { message } if message.starts_with("Error processing file:")
    ));
}
