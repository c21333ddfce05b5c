//! Boundary to the auditory-periphery simulator.
//!
//! The crate does not model the periphery; it consumes its output. A
//! [`Periphery`] turns a pressure waveform into a [`Nervegram`]: zero-padded
//! spike timestamps per characteristic-frequency channel and fiber.
//! [`poisson::PoissonPeriphery`] is a seeded statistical surrogate for tests
//! and demos, not an auditory model.

pub mod poisson;

use serde::{Deserialize, Serialize};

use crate::core::AnalysisError;
use crate::core::spike_train::SpikeTrains;

/// Parameters handed to a periphery simulation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SimParams {
    /// Number of characteristic-frequency channels.
    #[serde(default = "SimParams::default_num_cf")]
    pub num_cf: usize,
    /// Lowest CF in Hz.
    #[serde(default = "SimParams::default_min_cf_hz")]
    pub min_cf_hz: f64,
    /// Highest CF in Hz.
    #[serde(default = "SimParams::default_max_cf_hz")]
    pub max_cf_hz: f64,
    /// Fiber slots per channel; inactive fibers stay zero-padded.
    #[serde(default = "SimParams::default_fibers_per_channel")]
    pub fibers_per_channel: usize,
    /// Timestamp slots per fiber (array width, zero-padded).
    #[serde(default = "SimParams::default_max_spikes_per_train")]
    pub max_spikes_per_train: usize,
    /// Stochastic trials per note.
    #[serde(default = "SimParams::default_num_trials")]
    pub num_trials: usize,
    /// Base RNG seed; trials derive their own seeds from it.
    #[serde(default)]
    pub seed: u64,
}

impl SimParams {
    fn default_num_cf() -> usize {
        3500
    }
    fn default_min_cf_hz() -> f64 {
        20.0
    }
    fn default_max_cf_hz() -> f64 {
        16_000.0
    }
    fn default_fibers_per_channel() -> usize {
        18
    }
    fn default_max_spikes_per_train() -> usize {
        200
    }
    fn default_num_trials() -> usize {
        30
    }
}

impl Default for SimParams {
    fn default() -> Self {
        Self {
            num_cf: Self::default_num_cf(),
            min_cf_hz: Self::default_min_cf_hz(),
            max_cf_hz: Self::default_max_cf_hz(),
            fibers_per_channel: Self::default_fibers_per_channel(),
            max_spikes_per_train: Self::default_max_spikes_per_train(),
            num_trials: Self::default_num_trials(),
            seed: 0,
        }
    }
}

/// Output of one periphery run.
#[derive(Clone, Debug)]
pub struct Nervegram {
    pub spike_times: SpikeTrains,
    /// CF per channel in Hz, ascending.
    pub cf_hz: Vec<f64>,
}

/// A periphery simulation: pressure waveform in, spike timestamps out.
pub trait Periphery {
    fn simulate(
        &self,
        signal: &[f64],
        sample_rate: f64,
        params: &SimParams,
    ) -> Result<Nervegram, AnalysisError>;
}
