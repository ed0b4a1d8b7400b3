use crate::domain::prediction::PredictionLabel;
use crate::domain::snapshot::MarketReading;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

const MODEL_KIND_LOGISTIC: &str = "logistic_regression";

/// Feature layout the artifact was trained on: one row, two columns.
pub const FEATURE_ORDER: [&str; 2] = ["vix", "sp500"];

/// Serialized form of the pre-trained model. Training happens elsewhere; this
/// crate only loads and evaluates the artifact.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub model: String,
    pub feature_order: Vec<String>,
    pub coefficients: [f64; 2],
    pub intercept: f64,
    pub threshold: f64,
}

/// Pre-trained binary crash classifier. Loaded once at startup, read-only
/// afterwards.
#[derive(Debug, Clone)]
pub struct CrashClassifier {
    coefficients: [f64; 2],
    intercept: f64,
    threshold: f64,
}

impl CrashClassifier {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read model artifact {}", path.display()))?;
        let artifact = serde_json::from_str::<ModelArtifact>(&raw)
            .with_context(|| format!("failed to parse model artifact {}", path.display()))?;
        Self::from_artifact(artifact)
    }

    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self> {
        anyhow::ensure!(
            artifact.model == MODEL_KIND_LOGISTIC,
            "unsupported model kind: {}",
            artifact.model
        );
        anyhow::ensure!(
            artifact
                .feature_order
                .iter()
                .map(String::as_str)
                .eq(FEATURE_ORDER),
            "unexpected feature order: {:?} (want {FEATURE_ORDER:?})",
            artifact.feature_order
        );
        anyhow::ensure!(
            artifact.coefficients.iter().all(|c| c.is_finite()) && artifact.intercept.is_finite(),
            "model weights must be finite"
        );
        anyhow::ensure!(
            artifact.threshold > 0.0 && artifact.threshold < 1.0,
            "threshold must be in (0, 1), got {}",
            artifact.threshold
        );

        Ok(Self {
            coefficients: artifact.coefficients,
            intercept: artifact.intercept,
            threshold: artifact.threshold,
        })
    }

    /// Crash probability for a complete reading.
    pub fn crash_probability(&self, reading: &MarketReading) -> f64 {
        let row = [reading.vix, reading.sp500];
        let z = self.intercept
            + self
                .coefficients
                .iter()
                .zip(row.iter())
                .map(|(w, x)| w * x)
                .sum::<f64>();
        sigmoid(z)
    }

    pub fn predict(&self, reading: &MarketReading) -> PredictionLabel {
        if self.crash_probability(reading) >= self.threshold {
            PredictionLabel::CrashLikely
        } else {
            PredictionLabel::Stable
        }
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn artifact(coefficients: [f64; 2], intercept: f64, threshold: f64) -> ModelArtifact {
        ModelArtifact {
            model: MODEL_KIND_LOGISTIC.to_string(),
            feature_order: vec!["vix".to_string(), "sp500".to_string()],
            coefficients,
            intercept,
            threshold,
        }
    }

    #[test]
    fn parses_artifact_json() {
        let v = json!({
            "model": "logistic_regression",
            "feature_order": ["vix", "sp500"],
            "coefficients": [0.4, -0.004],
            "intercept": 4.0,
            "threshold": 0.5
        });
        let parsed: ModelArtifact = serde_json::from_value(v).unwrap();
        let clf = CrashClassifier::from_artifact(parsed).unwrap();

        let stressed = MarketReading {
            vix: 35.0,
            sp500: 4000.0,
        };
        assert_eq!(clf.predict(&stressed), PredictionLabel::CrashLikely);

        let calm = MarketReading {
            vix: 15.0,
            sp500: 4600.0,
        };
        assert_eq!(clf.predict(&calm), PredictionLabel::Stable);
    }

    #[test]
    fn rejects_unknown_model_kind() {
        let mut a = artifact([1.0, 0.0], 0.0, 0.5);
        a.model = "random_forest".to_string();
        assert!(CrashClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn rejects_wrong_feature_order() {
        let mut a = artifact([1.0, 0.0], 0.0, 0.5);
        a.feature_order = vec!["sp500".to_string(), "vix".to_string()];
        assert!(CrashClassifier::from_artifact(a).is_err());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        assert!(CrashClassifier::from_artifact(artifact([1.0, 0.0], 0.0, 0.0)).is_err());
        assert!(CrashClassifier::from_artifact(artifact([1.0, 0.0], 0.0, 1.0)).is_err());
        assert!(CrashClassifier::from_artifact(artifact([1.0, 0.0], 0.0, f64::NAN)).is_err());
    }

    #[test]
    fn rejects_non_finite_weights() {
        assert!(CrashClassifier::from_artifact(artifact([f64::NAN, 0.0], 0.0, 0.5)).is_err());
        assert!(
            CrashClassifier::from_artifact(artifact([1.0, 0.0], f64::INFINITY, 0.5)).is_err()
        );
    }

    #[test]
    fn probability_at_threshold_is_a_crash() {
        // weights chosen so z = 0 exactly: sigmoid(0) = 0.5 = threshold.
        let clf = CrashClassifier::from_artifact(artifact([1.0, 0.0], -20.0, 0.5)).unwrap();
        let reading = MarketReading {
            vix: 20.0,
            sp500: 4500.0,
        };
        assert_eq!(clf.crash_probability(&reading), 0.5);
        assert_eq!(clf.predict(&reading), PredictionLabel::CrashLikely);
    }

    #[test]
    fn sigmoid_is_stable_for_large_magnitudes() {
        assert!(sigmoid(1000.0) <= 1.0);
        assert!(sigmoid(-1000.0) >= 0.0);
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-12);
    }
}
