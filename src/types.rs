//! Request and response types for the prediction API.

use serde::{Deserialize, Serialize};

use crate::model::PlayerFeatures;

/// Form body of `POST /predict`
#[derive(Debug, Clone, Deserialize)]
pub struct PredictForm {
    /// Kill/death ratio
    pub kdr: f64,
    /// Headshot percentage
    pub hs: f64,
    /// Average damage per round
    pub adr: f64,
    pub rounds: u32,
}

impl PredictForm {
    /// Check values the form decoder accepts but the model cannot use.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("kdr", self.kdr), ("hs", self.hs), ("adr", self.adr)] {
            if !value.is_finite() {
                return Err(format!("{} must be a finite number", name));
            }
            if value < 0.0 {
                return Err(format!("{} must not be negative", name));
            }
        }
        Ok(())
    }
}

impl From<&PredictForm> for PlayerFeatures {
    fn from(form: &PredictForm) -> Self {
        Self {
            kill_death_ratio: form.kdr,
            hs: form.hs,
            adr: form.adr,
            rounds: form.rounds,
        }
    }
}

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Model info response
#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    pub model_path: String,
    pub feature_names: Vec<String>,
    pub model: serde_json::Value,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// One row of `predict` CLI output
#[derive(Debug, Clone, Serialize)]
pub struct PlayerPrediction {
    pub path: String,
    pub kill_death_ratio: f64,
    pub hs: f64,
    pub adr: f64,
    pub rounds: u32,
    /// Share of maps won in the scraped matches
    pub observed_win_rate: Option<f64>,
    pub predicted_win_rate: f64,
}
