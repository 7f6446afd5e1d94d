//! Win-rate model loading and inference.
//!
//! The model is fitted outside this crate (a binomial GLM on the scraped
//! data) and exported as JSON coefficients.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

use crate::scraper::PlayerRecord;

/// Feature names in model input order
pub const FEATURE_NAMES: [&str; 4] = ["kill_death_ratio", "hs", "adr", "rounds"];

/// Inputs to the win-rate model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerFeatures {
    pub kill_death_ratio: f64,
    /// Headshot percentage
    pub hs: f64,
    pub adr: f64,
    pub rounds: u32,
}

impl PlayerFeatures {
    pub fn to_array(&self) -> [f64; 4] {
        [self.kill_death_ratio, self.hs, self.adr, self.rounds as f64]
    }
}

impl From<&PlayerRecord> for PlayerFeatures {
    fn from(record: &PlayerRecord) -> Self {
        Self {
            kill_death_ratio: record.kill_death_ratio(),
            hs: record.stats.headshot,
            adr: record.stats.adr,
            rounds: record.stats.rounds,
        }
    }
}

/// A fitted model answering "what share of maps does this player win".
pub trait WinrateModel: Send + Sync {
    fn predict(&self, features: &PlayerFeatures) -> Result<f64>;

    fn describe(&self) -> serde_json::Value;
}

/// Logistic regression coefficients, one per feature
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Coefficients {
    pub kill_death_ratio: f64,
    pub hs: f64,
    pub adr: f64,
    pub rounds: f64,
}

impl Coefficients {
    fn to_array(&self) -> [f64; 4] {
        [self.kill_death_ratio, self.hs, self.adr, self.rounds]
    }
}

/// Binomial GLM with logit link; predictions are on the response scale.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: Coefficients,
}

impl LogisticModel {
    /// Load coefficients from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read model file {}", path.display()))?;
        let model: LogisticModel =
            serde_json::from_str(&content).context("Failed to parse model coefficients")?;

        let all = std::iter::once(model.intercept).chain(model.coefficients.to_array());
        if all.into_iter().any(|c| !c.is_finite()) {
            anyhow::bail!("Model coefficients must be finite numbers");
        }

        Ok(model)
    }

    fn linear_predictor(&self, features: &PlayerFeatures) -> f64 {
        self.coefficients
            .to_array()
            .iter()
            .zip(features.to_array())
            .fold(self.intercept, |acc, (b, x)| acc + b * x)
    }
}

impl WinrateModel for LogisticModel {
    fn predict(&self, features: &PlayerFeatures) -> Result<f64> {
        if features.to_array().iter().any(|x| !x.is_finite()) {
            anyhow::bail!("Features must be finite numbers: {:?}", features);
        }
        let eta = self.linear_predictor(features);
        Ok(1.0 / (1.0 + (-eta).exp()))
    }

    fn describe(&self) -> serde_json::Value {
        serde_json::json!({
            "kind": "logistic",
            "intercept": self.intercept,
            "coefficients": self.coefficients,
        })
    }
}

/// Thread-safe model handle for use in web handlers.
pub type SharedModel = Arc<dyn WinrateModel>;

/// Create a shared model instance.
pub fn create_shared_model<P: AsRef<Path>>(path: P) -> Result<SharedModel> {
    let model = LogisticModel::from_file(path)?;
    Ok(Arc::new(model))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scraper::player::PlayerStats;

    fn model() -> LogisticModel {
        LogisticModel {
            intercept: -2.0,
            coefficients: Coefficients {
                kill_death_ratio: 1.5,
                hs: 0.01,
                adr: 0.005,
                rounds: 0.0,
            },
        }
    }

    #[test]
    fn test_feature_names() {
        assert_eq!(FEATURE_NAMES.len(), 4);
        assert_eq!(FEATURE_NAMES[0], "kill_death_ratio");
        assert_eq!(FEATURE_NAMES[3], "rounds");
    }

    #[test]
    fn test_predict_response_scale() {
        // eta = -2 + 1.5*1.0 + 0.01*50 + 0.005*0 = 0 -> 0.5
        let features = PlayerFeatures {
            kill_death_ratio: 1.0,
            hs: 50.0,
            adr: 0.0,
            rounds: 1000,
        };
        let p = model().predict(&features).unwrap();
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_predict_is_monotonic_in_kdr() {
        let low = PlayerFeatures {
            kill_death_ratio: 0.8,
            hs: 40.0,
            adr: 70.0,
            rounds: 500,
        };
        let high = PlayerFeatures {
            kill_death_ratio: 1.3,
            ..low
        };
        let m = model();
        assert!(m.predict(&high).unwrap() > m.predict(&low).unwrap());
    }

    #[test]
    fn test_predict_rejects_nan() {
        let features = PlayerFeatures {
            kill_death_ratio: f64::NAN,
            hs: 40.0,
            adr: 70.0,
            rounds: 500,
        };
        assert!(model().predict(&features).is_err());
    }

    #[test]
    fn test_features_from_record() {
        let record = PlayerRecord {
            path: "1/a".to_string(),
            win: 3,
            loss: 1,
            stats: PlayerStats {
                kills: 300,
                deaths: 200,
                headshot: 45.0,
                adr: 80.0,
                rounds: 900,
            },
        };
        let features = PlayerFeatures::from(&record);
        assert_eq!(features.kill_death_ratio, 1.5);
        assert_eq!(features.hs, 45.0);
        assert_eq!(features.rounds, 900);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("winrates.json");
        std::fs::write(
            &path,
            r#"{"intercept": -2.0, "coefficients": {"kill_death_ratio": 1.5, "hs": 0.01, "adr": 0.005, "rounds": 0.0}}"#,
        )
        .unwrap();

        let loaded = LogisticModel::from_file(&path).unwrap();
        assert_eq!(loaded, model());
    }

    #[test]
    fn test_from_file_missing_coefficient() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("winrates.json");
        std::fs::write(&path, r#"{"intercept": 0.1, "coefficients": {"hs": 0.01}}"#).unwrap();

        assert!(LogisticModel::from_file(&path).is_err());
    }
}
