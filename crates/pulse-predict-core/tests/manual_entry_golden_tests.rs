//! Golden tests for manual entry encoding and the single-record path.
//!
//! Encoding must match the one-hot layout the classifier was trained with,
//! where reference categories contribute all-zero indicators.

use std::path::PathBuf;

use pulse_predict_core::models::{
    ChestPainType, ExerciseAngina, ManualEntry, RestingEcg, Sex, StSlope,
};
use pulse_predict_core::scoring::RiskBand;
use pulse_predict_core::{reveal_disease_percentage, Block, Frontend, Prediction, SvmModel};

/// Test case from golden file.
struct GoldenCase {
    id: &'static str,
    sex: &'static str,
    chest_pain_type: &'static str,
    resting_ecg: &'static str,
    exercise_angina: &'static str,
    st_slope: &'static str,
    /// Sex_M, CP_ATA, CP_NAP, CP_TA, ECG_Normal, ECG_ST, Angina_Y, Flat, Up
    expected_indicators: [f64; 9],
}

fn get_golden_cases() -> Vec<GoldenCase> {
    vec![
        GoldenCase {
            id: "reference-example",
            sex: "Male",
            chest_pain_type: "ASY",
            resting_ecg: "Normal",
            exercise_angina: "Yes",
            st_slope: "Flat",
            expected_indicators: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0],
        },
        GoldenCase {
            id: "all-reference-categories",
            sex: "Female",
            chest_pain_type: "ASY",
            resting_ecg: "LVH",
            exercise_angina: "No",
            st_slope: "Down",
            expected_indicators: [0.0; 9],
        },
        GoldenCase {
            id: "atypical-angina",
            sex: "Female",
            chest_pain_type: "ATA",
            resting_ecg: "ST",
            exercise_angina: "No",
            st_slope: "Up",
            expected_indicators: [0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
        },
        GoldenCase {
            id: "non-anginal-pain",
            sex: "Male",
            chest_pain_type: "NAP",
            resting_ecg: "LVH",
            exercise_angina: "Yes",
            st_slope: "Down",
            expected_indicators: [1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0],
        },
        GoldenCase {
            id: "typical-angina",
            sex: "Male",
            chest_pain_type: "TA",
            resting_ecg: "Normal",
            exercise_angina: "No",
            st_slope: "Up",
            expected_indicators: [1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        },
        GoldenCase {
            id: "lowercase-labels",
            sex: "female",
            chest_pain_type: "nap",
            resting_ecg: "st",
            exercise_angina: "yes",
            st_slope: "flat",
            expected_indicators: [0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 1.0, 0.0],
        },
    ]
}

fn entry_for(case: &GoldenCase) -> ManualEntry {
    ManualEntry {
        age: 55,
        resting_bp: 140,
        cholesterol: 260,
        fasting_bs: 0,
        max_hr: 150,
        oldpeak: 1.5,
        sex: case.sex.parse().unwrap(),
        chest_pain_type: case.chest_pain_type.parse().unwrap(),
        resting_ecg: case.resting_ecg.parse().unwrap(),
        exercise_angina: case.exercise_angina.parse().unwrap(),
        st_slope: case.st_slope.parse().unwrap(),
    }
}

#[test]
fn test_golden_encodings() {
    for case in get_golden_cases() {
        let record = entry_for(&case).encode().unwrap();
        let features = record.to_features();

        assert_eq!(
            &features[..6],
            &[55.0, 140.0, 260.0, 0.0, 150.0, 1.5],
            "case {}: raw measurements",
            case.id
        );
        assert_eq!(
            features[6..],
            case.expected_indicators,
            "case {}: indicators",
            case.id
        );
    }
}

#[test]
fn test_encoding_is_deterministic() {
    for case in get_golden_cases() {
        let entry = entry_for(&case);
        assert_eq!(entry.encode().unwrap(), entry.encode().unwrap(), "case {}", case.id);
    }
}

fn fixture_model() -> SvmModel {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/rbf_model.json");
    SvmModel::load(path).unwrap()
}

fn high_risk_entry() -> ManualEntry {
    ManualEntry {
        age: 58,
        resting_bp: 150,
        cholesterol: 270,
        fasting_bs: 1,
        max_hr: 110,
        oldpeak: 2.5,
        sex: Sex::Male,
        chest_pain_type: ChestPainType::Asy,
        resting_ecg: RestingEcg::St,
        exercise_angina: ExerciseAngina::Yes,
        st_slope: StSlope::Flat,
    }
}

fn low_risk_entry() -> ManualEntry {
    ManualEntry {
        age: 34,
        resting_bp: 118,
        cholesterol: 210,
        fasting_bs: 0,
        max_hr: 178,
        oldpeak: 0.0,
        sex: Sex::Female,
        chest_pain_type: ChestPainType::Ata,
        resting_ecg: RestingEcg::Normal,
        exercise_angina: ExerciseAngina::No,
        st_slope: StSlope::Up,
    }
}

#[test]
fn test_single_record_flow_with_fixture_model() {
    let model = fixture_model();
    let frontend = Frontend::new(&model);

    let response = frontend.submit_form(&high_risk_entry()).unwrap();
    let assessment = response.assessment.unwrap();
    assert_eq!(assessment.prediction, Prediction::Arrhythmia);
    assert!(assessment.decision_score > 0.0);
    assert!(assessment.confidence > 0.0 && assessment.confidence < 100.0);
    assert!(matches!(response.render.blocks[1], Block::Expander { .. }));

    let response = frontend.submit_form(&low_risk_entry()).unwrap();
    let assessment = response.assessment.unwrap();
    assert_eq!(assessment.prediction, Prediction::NoArrhythmia);
    assert!(assessment.decision_score < 0.0);
    assert!(matches!(response.render.blocks[0], Block::Success { .. }));
}

#[test]
fn test_single_record_matches_batch_label() {
    let model = fixture_model();
    let frontend = Frontend::new(&model);
    let records = [
        high_risk_entry().encode().unwrap(),
        low_risk_entry().encode().unwrap(),
    ];

    let batch = frontend.service().score_records(&records).unwrap();
    for (scored, record) in batch.iter().zip(&records) {
        let single = frontend.service().assess(record).unwrap();
        assert_eq!(single.prediction, scored.prediction);
    }
}

#[test]
fn test_reveal_follows_assessment() {
    let model = fixture_model();
    let response = Frontend::new(&model)
        .submit_form(&low_risk_entry())
        .unwrap();
    let assessment = response.assessment.unwrap();

    // Negative label: disease chance is the complement of confidence
    let chance = 100.0 - assessment.confidence;
    assert_eq!(assessment.disease_chance(), chance);

    let render = reveal_disease_percentage(&assessment);
    match &render.blocks[0] {
        Block::Metric { value, .. } => assert_eq!(value, &format!("{:.2}%", chance)),
        other => panic!("expected metric, got {:?}", other),
    }
    let expected_band = RiskBand::classify(chance);
    assert_eq!(assessment.risk_band(), expected_band);
}
