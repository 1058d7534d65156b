//! Support-vector machine artifact.
//!
//! The artifact is a JSON document holding the trained dual form:
//!
//! ```text
//! decision(x) = Σ dual_coef[i] · K(sv[i], scale(x)) + intercept
//! label(x)    = 1 if decision(x) > 0 else 0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info};

use super::{Classifier, ClassifierError, ClassifierResult, ModelInfo};
use crate::models::{PatientRecord, Prediction, FEATURE_COLUMNS, FEATURE_COUNT};

/// Kernel function and its hyperparameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Kernel {
    Linear,
    Rbf { gamma: f64 },
    Poly { gamma: f64, coef0: f64, degree: u32 },
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Kernel {
    pub fn name(&self) -> &'static str {
        match self {
            Kernel::Linear => "linear",
            Kernel::Rbf { .. } => "rbf",
            Kernel::Poly { .. } => "poly",
            Kernel::Sigmoid { .. } => "sigmoid",
        }
    }

    /// Evaluate K(a, b).
    pub fn apply(&self, a: &[f64], b: &[f64]) -> f64 {
        match self {
            Kernel::Linear => dot(a, b),
            Kernel::Rbf { gamma } => {
                let dist_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum();
                (-gamma * dist_sq).exp()
            }
            Kernel::Poly { gamma, coef0, degree } => {
                // degree is bounded by check() at load time
                let exp = i32::try_from(*degree).unwrap_or(i32::MAX);
                (gamma * dot(a, b) + coef0).powi(exp)
            }
            Kernel::Sigmoid { gamma, coef0 } => (gamma * dot(a, b) + coef0).tanh(),
        }
    }

    fn check(&self) -> ClassifierResult<()> {
        let params = match self {
            Kernel::Linear => vec![],
            Kernel::Rbf { gamma } => vec![*gamma],
            Kernel::Poly { gamma, coef0, .. } | Kernel::Sigmoid { gamma, coef0 } => {
                vec![*gamma, *coef0]
            }
        };
        if params.iter().any(|p| !p.is_finite()) {
            return Err(ClassifierError::InvalidArtifact(format!(
                "{} kernel has non-finite parameters",
                self.name()
            )));
        }
        match self {
            Kernel::Rbf { gamma } if *gamma <= 0.0 => Err(ClassifierError::InvalidArtifact(
                "rbf gamma must be positive".into(),
            )),
            Kernel::Poly { degree, .. } if i32::try_from(*degree).is_err() => {
                Err(ClassifierError::InvalidArtifact(format!(
                    "poly degree {} is out of range",
                    degree
                )))
            }
            _ => Ok(()),
        }
    }
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

/// Standardization applied to inputs before the kernel: (x - mean) / scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Scaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl Scaler {
    fn transform(&self, x: &mut [f64]) {
        for ((v, m), s) in x.iter_mut().zip(&self.mean).zip(&self.scale) {
            *v = (*v - m) / s;
        }
    }
}

/// On-disk representation of a trained SVM.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SvmArtifact {
    /// Feature names the model was trained on, in order
    pub feature_names: Vec<String>,
    pub kernel: Kernel,
    pub support_vectors: Vec<Vec<f64>>,
    /// Dual coefficients (alpha_i * y_i), one per support vector
    pub dual_coef: Vec<f64>,
    pub intercept: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scaler: Option<Scaler>,
}

impl SvmArtifact {
    /// Check the artifact against the fixed feature schema.
    pub fn validate(&self) -> ClassifierResult<()> {
        if self.feature_names.len() != FEATURE_COUNT {
            return Err(ClassifierError::DimensionMismatch {
                expected: FEATURE_COUNT,
                actual: self.feature_names.len(),
            });
        }
        for (i, (got, want)) in self.feature_names.iter().zip(FEATURE_COLUMNS).enumerate() {
            if got != want {
                return Err(ClassifierError::InvalidArtifact(format!(
                    "feature {} is '{}', expected '{}'",
                    i, got, want
                )));
            }
        }

        if self.support_vectors.is_empty() {
            return Err(ClassifierError::InvalidArtifact(
                "model has no support vectors".into(),
            ));
        }
        if self.dual_coef.len() != self.support_vectors.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.support_vectors.len(),
                actual: self.dual_coef.len(),
            });
        }
        for sv in &self.support_vectors {
            if sv.len() != FEATURE_COUNT {
                return Err(ClassifierError::DimensionMismatch {
                    expected: FEATURE_COUNT,
                    actual: sv.len(),
                });
            }
        }

        let all_finite = self
            .support_vectors
            .iter()
            .flatten()
            .chain(&self.dual_coef)
            .chain(std::iter::once(&self.intercept))
            .all(|v| v.is_finite());
        if !all_finite {
            return Err(ClassifierError::InvalidArtifact(
                "model contains non-finite coefficients".into(),
            ));
        }

        self.kernel.check()?;

        if let Some(scaler) = &self.scaler {
            for len in [scaler.mean.len(), scaler.scale.len()] {
                if len != FEATURE_COUNT {
                    return Err(ClassifierError::DimensionMismatch {
                        expected: FEATURE_COUNT,
                        actual: len,
                    });
                }
            }
            if scaler.scale.iter().any(|s| *s == 0.0 || !s.is_finite()) {
                return Err(ClassifierError::InvalidArtifact(
                    "scaler scale must be finite and non-zero".into(),
                ));
            }
        }

        Ok(())
    }
}

/// A loaded, validated SVM. Immutable once constructed.
#[derive(Debug, Clone)]
pub struct SvmModel {
    artifact: SvmArtifact,
    fingerprint: String,
}

impl SvmModel {
    /// Load a model from a JSON artifact file.
    pub fn load<P: AsRef<Path>>(path: P) -> ClassifierResult<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Reading classifier artifact");
        let bytes = std::fs::read(path)?;
        Self::from_json_bytes(&bytes)
    }

    /// Parse and validate a JSON artifact.
    pub fn from_json_bytes(bytes: &[u8]) -> ClassifierResult<Self> {
        let artifact: SvmArtifact = serde_json::from_slice(bytes)?;
        artifact.validate()?;

        let model = Self {
            artifact,
            fingerprint: hex::encode(Sha256::digest(bytes)),
        };

        info!(
            fingerprint = %model.fingerprint,
            kernel = model.artifact.kernel.name(),
            support_vectors = model.artifact.support_vectors.len(),
            "Loaded classifier artifact"
        );

        Ok(model)
    }

    /// Build a model from an in-memory artifact. The fingerprint is taken
    /// over its canonical JSON serialization.
    pub fn from_artifact(artifact: SvmArtifact) -> ClassifierResult<Self> {
        let bytes = serde_json::to_vec(&artifact)?;
        Self::from_json_bytes(&bytes)
    }

    pub fn artifact(&self) -> &SvmArtifact {
        &self.artifact
    }

    fn decision(&self, record: &PatientRecord) -> f64 {
        let mut x = record.to_features();
        if let Some(scaler) = &self.artifact.scaler {
            scaler.transform(&mut x);
        }

        let kernel = &self.artifact.kernel;
        self.artifact
            .support_vectors
            .iter()
            .zip(&self.artifact.dual_coef)
            .map(|(sv, coef)| coef * kernel.apply(sv, &x))
            .sum::<f64>()
            + self.artifact.intercept
    }
}

impl Classifier for SvmModel {
    fn predict(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<Prediction>> {
        Ok(self
            .decision_function(rows)?
            .into_iter()
            .map(|d| {
                if d > 0.0 {
                    Prediction::Arrhythmia
                } else {
                    Prediction::NoArrhythmia
                }
            })
            .collect())
    }

    fn decision_function(&self, rows: &[PatientRecord]) -> ClassifierResult<Vec<f64>> {
        Ok(rows.iter().map(|r| self.decision(r)).collect())
    }

    fn describe(&self) -> ModelInfo {
        ModelInfo {
            fingerprint: self.fingerprint.clone(),
            kernel: self.artifact.kernel.name().to_string(),
            support_vector_count: self.artifact.support_vectors.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Linear model whose decision is `age - 50`.
    fn age_artifact() -> SvmArtifact {
        let mut sv = vec![0.0; FEATURE_COUNT];
        sv[0] = 1.0;
        SvmArtifact {
            feature_names: FEATURE_COLUMNS.iter().map(|s| s.to_string()).collect(),
            kernel: Kernel::Linear,
            support_vectors: vec![sv],
            dual_coef: vec![1.0],
            intercept: -50.0,
            scaler: None,
        }
    }

    fn record_with_age(age: f64) -> PatientRecord {
        let mut r = PatientRecord::from_features([0.0; FEATURE_COUNT]);
        r.age = age;
        r
    }

    #[test]
    fn test_linear_decision_and_labels() {
        let model = SvmModel::from_artifact(age_artifact()).unwrap();
        let rows = [record_with_age(40.0), record_with_age(50.0), record_with_age(62.5)];

        let scores = model.decision_function(&rows).unwrap();
        assert_eq!(scores, vec![-10.0, 0.0, 12.5]);

        let labels = model.predict(&rows).unwrap();
        assert_eq!(
            labels,
            vec![
                Prediction::NoArrhythmia,
                Prediction::NoArrhythmia, // zero margin is not positive
                Prediction::Arrhythmia
            ]
        );
    }

    #[test]
    fn test_scaler_applied_before_kernel() {
        let mut artifact = age_artifact();
        artifact.intercept = 0.0;
        let mut mean = vec![0.0; FEATURE_COUNT];
        mean[0] = 50.0;
        let mut scale = vec![1.0; FEATURE_COUNT];
        scale[0] = 10.0;
        artifact.scaler = Some(Scaler { mean, scale });

        let model = SvmModel::from_artifact(artifact).unwrap();
        let scores = model.decision_function(&[record_with_age(70.0)]).unwrap();
        assert!((scores[0] - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_rbf_kernel() {
        let k = Kernel::Rbf { gamma: 0.5 };
        assert!((k.apply(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-12);
        // distance squared 2 → exp(-1)
        assert!((k.apply(&[0.0, 0.0], &[1.0, 1.0]) - (-1.0f64).exp()).abs() < 1e-12);
    }

    #[test]
    fn test_poly_and_sigmoid_kernels() {
        let poly = Kernel::Poly { gamma: 1.0, coef0: 1.0, degree: 2 };
        assert_eq!(poly.apply(&[1.0, 1.0], &[1.0, 2.0]), 16.0);

        let sig = Kernel::Sigmoid { gamma: 1.0, coef0: 0.0 };
        assert_eq!(sig.apply(&[0.0], &[5.0]), 0.0);
    }

    #[test]
    fn test_rejects_wrong_feature_names() {
        let mut artifact = age_artifact();
        artifact.feature_names.swap(0, 1);
        let err = SvmModel::from_artifact(artifact).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidArtifact(_)));
    }

    #[test]
    fn test_rejects_dimension_mismatch() {
        let mut artifact = age_artifact();
        artifact.dual_coef.push(2.0);
        assert!(matches!(
            SvmModel::from_artifact(artifact),
            Err(ClassifierError::DimensionMismatch { expected: 1, actual: 2 })
        ));

        let mut artifact = age_artifact();
        artifact.support_vectors[0].pop();
        assert!(matches!(
            SvmModel::from_artifact(artifact),
            Err(ClassifierError::DimensionMismatch { expected: 15, actual: 14 })
        ));
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut artifact = age_artifact();
        artifact.scaler = Some(Scaler {
            mean: vec![0.0; FEATURE_COUNT],
            scale: vec![0.0; FEATURE_COUNT],
        });
        assert!(matches!(
            SvmModel::from_artifact(artifact),
            Err(ClassifierError::InvalidArtifact(_))
        ));
    }

    #[test]
    fn test_rejects_non_positive_rbf_gamma() {
        let mut artifact = age_artifact();
        artifact.kernel = Kernel::Rbf { gamma: 0.0 };
        assert!(SvmModel::from_artifact(artifact).is_err());
    }

    #[test]
    fn test_rejects_out_of_range_poly_degree() {
        let mut artifact = age_artifact();
        artifact.kernel = Kernel::Poly {
            gamma: 1.0,
            coef0: 0.0,
            degree: u32::MAX,
        };
        assert!(matches!(
            SvmModel::from_artifact(artifact),
            Err(ClassifierError::InvalidArtifact(msg)) if msg.contains("degree")
        ));
    }

    #[test]
    fn test_kernel_json_shape() {
        let json = r#"{"type":"rbf","gamma":0.1}"#;
        let kernel: Kernel = serde_json::from_str(json).unwrap();
        assert_eq!(kernel, Kernel::Rbf { gamma: 0.1 });
        assert_eq!(
            serde_json::to_string(&Kernel::Linear).unwrap(),
            r#"{"type":"linear"}"#
        );
    }

    #[test]
    fn test_fingerprint_is_stable() {
        let a = SvmModel::from_artifact(age_artifact()).unwrap();
        let b = SvmModel::from_artifact(age_artifact()).unwrap();
        let info = a.describe();

        assert_eq!(info.fingerprint, b.describe().fingerprint);
        assert_eq!(info.fingerprint.len(), 64);
        assert_eq!(info.kernel, "linear");
        assert_eq!(info.support_vector_count, 1);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, serde_json::to_vec(&age_artifact()).unwrap()).unwrap();

        let model = SvmModel::load(&path).unwrap();
        assert_eq!(model.artifact().intercept, -50.0);

        let missing = SvmModel::load(dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ClassifierError::Io(_))));
    }
}
