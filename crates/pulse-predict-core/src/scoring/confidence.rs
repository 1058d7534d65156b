//! Confidence and risk banding derived from the decision score.
//!
//! All functions here are pure.

use serde::{Deserialize, Serialize};

use crate::models::Prediction;

/// Lower bound (inclusive) of the high-risk band, in percent.
pub const HIGH_RISK_THRESHOLD: f64 = 75.0;
/// Lower bound (inclusive) of the moderate-risk band, in percent.
pub const MODERATE_RISK_THRESHOLD: f64 = 50.0;

/// Squash an unbounded margin into a percentage: |s| / (|s| + 1) * 100.
///
/// Zero maps to 0 and the result approaches 100 as |s| grows. A NaN score
/// yields 0.
pub fn confidence(score: f64) -> f64 {
    if score.is_nan() {
        return 0.0;
    }
    let m = score.abs();
    if m.is_infinite() {
        return 100.0;
    }
    m / (m + 1.0) * 100.0
}

/// Progress bar value: the rounded confidence, capped at 100.
pub fn progress_value(confidence: f64) -> u8 {
    confidence.round().clamp(0.0, 100.0) as u8
}

/// Chance of disease as shown to the user.
pub fn disease_chance(prediction: Prediction, confidence: f64) -> f64 {
    match prediction {
        Prediction::Arrhythmia => confidence,
        Prediction::NoArrhythmia => 100.0 - confidence,
    }
}

/// Risk band for a disease-chance percentage.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum RiskBand {
    Low,
    Moderate,
    High,
}

impl RiskBand {
    pub fn classify(disease_chance: f64) -> Self {
        if disease_chance >= HIGH_RISK_THRESHOLD {
            RiskBand::High
        } else if disease_chance >= MODERATE_RISK_THRESHOLD {
            RiskBand::Moderate
        } else {
            RiskBand::Low
        }
    }

    /// Advice shown alongside the band.
    pub fn message(&self) -> &'static str {
        match self {
            RiskBand::High => "High likelihood of arrhythmia. Consult a cardiologist.",
            RiskBand::Moderate => "Moderate risk. Consider regular monitoring.",
            RiskBand::Low => "Low risk. Keep maintaining a healthy lifestyle.",
        }
    }
}
