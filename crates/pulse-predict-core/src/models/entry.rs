//! Manual entry form and categorical encoding.
//!
//! Each categorical attribute has one reference category that owns no
//! indicator column. Selecting it yields all zeros across the attribute's
//! indicators:
//!
//! | Attribute       | Reference | Indicator columns                 |
//! |-----------------|-----------|-----------------------------------|
//! | Sex             | Female    | `Sex_M`                           |
//! | ChestPainType   | ASY       | `ChestPainType_{ATA,NAP,TA}`      |
//! | RestingECG      | LVH       | `RestingECG_{Normal,ST}`          |
//! | ExerciseAngina  | No        | `ExerciseAngina_Y`                |
//! | ST_Slope        | Down      | `ST_Slope_{Flat,Up}`              |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::PatientRecord;

/// Form validation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FormError {
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },

    #[error("{field} must be one of {allowed}, got '{value}'")]
    UnknownOption {
        field: &'static str,
        value: String,
        allowed: String,
    },
}

pub type FormResult<T> = Result<T, FormError>;

fn unknown_option(field: &'static str, value: &str, options: &[&str]) -> FormError {
    FormError::UnknownOption {
        field,
        value: value.to_string(),
        allowed: options.join(", "),
    }
}

/// Biological sex.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub const OPTIONS: [&'static str; 2] = ["Male", "Female"];

    pub fn label(&self) -> &'static str {
        match self {
            Sex::Male => "Male",
            Sex::Female => "Female",
        }
    }
}

impl FromStr for Sex {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "male" => Ok(Sex::Male),
            "female" => Ok(Sex::Female),
            _ => Err(unknown_option("Sex", s, &Self::OPTIONS)),
        }
    }
}

/// Chest pain type. ASY (asymptomatic) is the reference category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ChestPainType {
    /// Atypical angina
    Ata,
    /// Non-anginal pain
    Nap,
    /// Typical angina
    Ta,
    /// Asymptomatic
    Asy,
}

impl ChestPainType {
    pub const OPTIONS: [&'static str; 4] = ["ATA", "NAP", "TA", "ASY"];

    pub fn label(&self) -> &'static str {
        match self {
            ChestPainType::Ata => "ATA",
            ChestPainType::Nap => "NAP",
            ChestPainType::Ta => "TA",
            ChestPainType::Asy => "ASY",
        }
    }
}

impl FromStr for ChestPainType {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s.trim().to_uppercase().as_str() {
            "ATA" => Ok(ChestPainType::Ata),
            "NAP" => Ok(ChestPainType::Nap),
            "TA" => Ok(ChestPainType::Ta),
            "ASY" => Ok(ChestPainType::Asy),
            _ => Err(unknown_option("ChestPainType", s, &Self::OPTIONS)),
        }
    }
}

/// Resting ECG result. LVH is the reference category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RestingEcg {
    Normal,
    /// ST-T wave abnormality
    St,
    /// Left ventricular hypertrophy
    Lvh,
}

impl RestingEcg {
    pub const OPTIONS: [&'static str; 3] = ["Normal", "ST", "LVH"];

    pub fn label(&self) -> &'static str {
        match self {
            RestingEcg::Normal => "Normal",
            RestingEcg::St => "ST",
            RestingEcg::Lvh => "LVH",
        }
    }
}

impl FromStr for RestingEcg {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "normal" => Ok(RestingEcg::Normal),
            "st" => Ok(RestingEcg::St),
            "lvh" => Ok(RestingEcg::Lvh),
            _ => Err(unknown_option("RestingECG", s, &Self::OPTIONS)),
        }
    }
}

/// Exercise-induced angina.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ExerciseAngina {
    Yes,
    No,
}

impl ExerciseAngina {
    pub const OPTIONS: [&'static str; 2] = ["Yes", "No"];

    pub fn label(&self) -> &'static str {
        match self {
            ExerciseAngina::Yes => "Yes",
            ExerciseAngina::No => "No",
        }
    }
}

impl FromStr for ExerciseAngina {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "yes" => Ok(ExerciseAngina::Yes),
            "no" => Ok(ExerciseAngina::No),
            _ => Err(unknown_option("ExerciseAngina", s, &Self::OPTIONS)),
        }
    }
}

/// Slope of the peak exercise ST segment. Down is the reference category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl StSlope {
    pub const OPTIONS: [&'static str; 3] = ["Up", "Flat", "Down"];

    pub fn label(&self) -> &'static str {
        match self {
            StSlope::Up => "Up",
            StSlope::Flat => "Flat",
            StSlope::Down => "Down",
        }
    }
}

impl FromStr for StSlope {
    type Err = FormError;

    fn from_str(s: &str) -> FormResult<Self> {
        match s.trim().to_lowercase().as_str() {
            "up" => Ok(StSlope::Up),
            "flat" => Ok(StSlope::Flat),
            "down" => Ok(StSlope::Down),
            _ => Err(unknown_option("ST_Slope", s, &Self::OPTIONS)),
        }
    }
}

macro_rules! impl_display_label {
    ($($t:ty),*) => {
        $(impl fmt::Display for $t {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        })*
    };
}

impl_display_label!(Sex, ChestPainType, RestingEcg, ExerciseAngina, StSlope);

/// Input bounds enforced by the manual entry form.
pub mod limits {
    pub const AGE: (u32, u32) = (1, 120);
    pub const RESTING_BP: (u32, u32) = (0, 300);
    pub const CHOLESTEROL: (u32, u32) = (0, 600);
    pub const MAX_HR: (u32, u32) = (60, 250);
    pub const OLDPEAK: (f64, f64) = (0.0, 10.0);
}

/// Values collected from the manual entry form.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ManualEntry {
    pub age: u32,
    pub resting_bp: u32,
    pub cholesterol: u32,
    /// 1 if fasting blood sugar > 120 mg/dl, else 0
    pub fasting_bs: u8,
    pub max_hr: u32,
    /// ST depression, entered in steps of 0.1
    pub oldpeak: f64,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_ecg: RestingEcg,
    pub exercise_angina: ExerciseAngina,
    pub st_slope: StSlope,
}

fn check_range(field: &'static str, value: u32, (min, max): (u32, u32)) -> FormResult<()> {
    if value < min || value > max {
        return Err(FormError::OutOfRange {
            field,
            min: min as f64,
            max: max as f64,
            value: value as f64,
        });
    }
    Ok(())
}

impl ManualEntry {
    /// Check every field against the form's bounds.
    pub fn validate(&self) -> FormResult<()> {
        check_range("Age", self.age, limits::AGE)?;
        check_range("RestingBP", self.resting_bp, limits::RESTING_BP)?;
        check_range("Cholesterol", self.cholesterol, limits::CHOLESTEROL)?;
        if self.fasting_bs > 1 {
            return Err(unknown_option(
                "FastingBS",
                &self.fasting_bs.to_string(),
                &["0", "1"],
            ));
        }
        check_range("MaxHR", self.max_hr, limits::MAX_HR)?;

        let (min, max) = limits::OLDPEAK;
        // NaN fails both comparisons, so test the accepted range directly
        if !(self.oldpeak >= min && self.oldpeak <= max) {
            return Err(FormError::OutOfRange {
                field: "Oldpeak",
                min,
                max,
                value: self.oldpeak,
            });
        }
        Ok(())
    }

    /// Validate and one-hot encode into the classifier's feature layout.
    pub fn encode(&self) -> FormResult<PatientRecord> {
        self.validate()?;

        let flag = |b: bool| if b { 1.0 } else { 0.0 };

        Ok(PatientRecord {
            age: self.age as f64,
            resting_bp: self.resting_bp as f64,
            cholesterol: self.cholesterol as f64,
            fasting_bs: self.fasting_bs as f64,
            max_hr: self.max_hr as f64,
            oldpeak: round_to_step(self.oldpeak),
            sex_m: flag(self.sex == Sex::Male),
            chest_pain_ata: flag(self.chest_pain_type == ChestPainType::Ata),
            chest_pain_nap: flag(self.chest_pain_type == ChestPainType::Nap),
            chest_pain_ta: flag(self.chest_pain_type == ChestPainType::Ta),
            resting_ecg_normal: flag(self.resting_ecg == RestingEcg::Normal),
            resting_ecg_st: flag(self.resting_ecg == RestingEcg::St),
            exercise_angina_y: flag(self.exercise_angina == ExerciseAngina::Yes),
            st_slope_flat: flag(self.st_slope == StSlope::Flat),
            st_slope_up: flag(self.st_slope == StSlope::Up),
        })
    }
}

/// Snap an Oldpeak value to the form's 0.1 step.
fn round_to_step(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
