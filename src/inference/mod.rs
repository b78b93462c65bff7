//! Model probing and prediction.
//!
//! The engine is constructed once at startup and shared read-only with the
//! handlers. This build carries no tensor runtime: the engine records whether
//! a model file is present and always evaluates the built-in linear formula,
//! marking its output as a dummy prediction.

use anyhow::Result;
use tracing::{info, warn};

use crate::config::Config;

/// Outcome of a single prediction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub y: f32,
    /// False while the dummy formula is answering.
    pub used_model: bool,
}

/// Inference engine, loaded once before the accept loop starts.
pub struct Engine {
    model_present: bool,
}

impl Engine {
    /// Probes the configured model path and decides whether startup may
    /// proceed. A missing model is fatal only when the config says so;
    /// otherwise the engine serves dummy predictions.
    pub fn load(cfg: &Config) -> Result<Self> {
        let model_present = std::path::Path::new(&cfg.model_path).exists();

        if model_present {
            info!(path = %cfg.model_path, "Model present but binary built without a tensor runtime; using dummy inference");
        } else {
            info!("No model file found; using dummy inference");
        }

        if !model_present && cfg.fail_on_missing_model {
            warn!("FAIL_ON_MISSING_MODEL set and model missing, refusing to start");
            anyhow::bail!("model file missing: {}", cfg.model_path);
        }

        Ok(Self { model_present })
    }

    pub fn model_present(&self) -> bool {
        self.model_present
    }

    /// Evaluates the prediction for one input.
    pub fn predict(&self, x: f32) -> Prediction {
        Prediction {
            y: 3.0 * x + 0.5,
            used_model: false,
        }
    }
}
