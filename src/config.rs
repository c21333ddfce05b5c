use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::AnalysisError;
use crate::core::concurrency::ConcurrencyParams;
use crate::core::evaluate::Metric;
use crate::core::probability::DEFAULT_SNAP_SIZE;
use crate::core::spike_tensor::{DEFAULT_DURATION, DEFAULT_TAU, TimeGrid};
use crate::sim::SimParams;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Discretization step in seconds.
    #[serde(default = "AnalysisConfig::default_tau_s")]
    pub tau_s: f64,
    /// Observation window in seconds.
    #[serde(default = "AnalysisConfig::default_duration_s")]
    pub duration_s: f64,
    /// Snapshot window width in bins (odd).
    #[serde(default = "AnalysisConfig::default_snap_size")]
    pub snap_size: usize,
    #[serde(default)]
    pub concurrency: ConcurrencyParams,
}

impl AnalysisConfig {
    fn default_tau_s() -> f64 {
        DEFAULT_TAU
    }
    fn default_duration_s() -> f64 {
        DEFAULT_DURATION
    }
    fn default_snap_size() -> usize {
        DEFAULT_SNAP_SIZE
    }

    /// Time grid for these settings; validates tau/duration.
    pub fn grid(&self) -> Result<TimeGrid, AnalysisError> {
        TimeGrid::new(self.tau_s, self.duration_s)
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tau_s: Self::default_tau_s(),
            duration_s: Self::default_duration_s(),
            snap_size: Self::default_snap_size(),
            concurrency: ConcurrencyParams::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct EvalConfig {
    #[serde(default)]
    pub metric: Metric,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub eval: EvalConfig,
    #[serde(default)]
    pub sim: SimParams,
}

impl AppConfig {
    /// Read a TOML config; on a missing file, write the defaults there and
    /// return them. A malformed file falls back to defaults with a warning.
    pub fn load_or_default(path: &str) -> Self {
        let path_obj = Path::new(path);
        if path_obj.exists() {
            match fs::read_to_string(path_obj) {
                Ok(contents) => match toml::from_str(&contents) {
                    Ok(cfg) => return cfg,
                    Err(err) => {
                        eprintln!("Failed to parse config {path}: {err}. Using defaults.");
                    }
                },
                Err(err) => {
                    eprintln!("Failed to read config {path}: {err}. Using defaults.");
                }
            }
            return Self::default();
        }

        let default_cfg = Self::default();
        match toml::to_string_pretty(&default_cfg) {
            Ok(text) => {
                if let Err(err) = fs::write(path_obj, text) {
                    eprintln!("Failed to write default config to {path}: {err}");
                }
            }
            Err(err) => {
                eprintln!("Failed to serialize default config: {err}");
            }
        }
        default_cfg
    }
}
