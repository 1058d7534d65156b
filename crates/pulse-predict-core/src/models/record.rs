//! Patient record in the classifier's fixed feature layout.

use serde::{Deserialize, Serialize};

/// Number of features the classifier was trained on.
pub const FEATURE_COUNT: usize = 15;

/// Column names in the exact order the classifier expects them.
pub const FEATURE_COLUMNS: [&str; FEATURE_COUNT] = [
    "Age",
    "RestingBP",
    "Cholesterol",
    "FastingBS",
    "MaxHR",
    "Oldpeak",
    "Sex_M",
    "ChestPainType_ATA",
    "ChestPainType_NAP",
    "ChestPainType_TA",
    "RestingECG_Normal",
    "RestingECG_ST",
    "ExerciseAngina_Y",
    "ST_Slope_Flat",
    "ST_Slope_Up",
];

/// One patient row: raw measurements followed by one-hot indicators.
///
/// Reference categories (Female, ASY, LVH, no angina, Down slope) have no
/// column of their own and show up as all-zero indicator groups.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PatientRecord {
    /// Age in years
    #[serde(rename = "Age")]
    pub age: f64,
    /// Resting blood pressure (mm Hg)
    #[serde(rename = "RestingBP")]
    pub resting_bp: f64,
    /// Serum cholesterol (mg/dl)
    #[serde(rename = "Cholesterol")]
    pub cholesterol: f64,
    /// 1 if fasting blood sugar > 120 mg/dl
    #[serde(rename = "FastingBS")]
    pub fasting_bs: f64,
    /// Maximum heart rate achieved
    #[serde(rename = "MaxHR")]
    pub max_hr: f64,
    /// ST depression
    #[serde(rename = "Oldpeak")]
    pub oldpeak: f64,
    #[serde(rename = "Sex_M")]
    pub sex_m: f64,
    #[serde(rename = "ChestPainType_ATA")]
    pub chest_pain_ata: f64,
    #[serde(rename = "ChestPainType_NAP")]
    pub chest_pain_nap: f64,
    #[serde(rename = "ChestPainType_TA")]
    pub chest_pain_ta: f64,
    #[serde(rename = "RestingECG_Normal")]
    pub resting_ecg_normal: f64,
    #[serde(rename = "RestingECG_ST")]
    pub resting_ecg_st: f64,
    #[serde(rename = "ExerciseAngina_Y")]
    pub exercise_angina_y: f64,
    #[serde(rename = "ST_Slope_Flat")]
    pub st_slope_flat: f64,
    #[serde(rename = "ST_Slope_Up")]
    pub st_slope_up: f64,
}

impl PatientRecord {
    /// Feature vector in `FEATURE_COLUMNS` order.
    pub fn to_features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age,
            self.resting_bp,
            self.cholesterol,
            self.fasting_bs,
            self.max_hr,
            self.oldpeak,
            self.sex_m,
            self.chest_pain_ata,
            self.chest_pain_nap,
            self.chest_pain_ta,
            self.resting_ecg_normal,
            self.resting_ecg_st,
            self.exercise_angina_y,
            self.st_slope_flat,
            self.st_slope_up,
        ]
    }

    /// Build a record from a feature vector in `FEATURE_COLUMNS` order.
    pub fn from_features(f: [f64; FEATURE_COUNT]) -> Self {
        Self {
            age: f[0],
            resting_bp: f[1],
            cholesterol: f[2],
            fasting_bs: f[3],
            max_hr: f[4],
            oldpeak: f[5],
            sex_m: f[6],
            chest_pain_ata: f[7],
            chest_pain_nap: f[8],
            chest_pain_ta: f[9],
            resting_ecg_normal: f[10],
            resting_ecg_st: f[11],
            exercise_angina_y: f[12],
            st_slope_flat: f[13],
            st_slope_up: f[14],
        }
    }

    /// Name of the first column holding a NaN or infinite value, if any.
    pub fn first_non_finite(&self) -> Option<&'static str> {
        self.to_features()
            .iter()
            .position(|v| !v.is_finite())
            .map(|i| FEATURE_COLUMNS[i])
    }
}
