//! core/spatial.rs — spike counts across the fiber population.

use crate::core::AnalysisError;
use crate::core::spike_train::SpikeTrains;

/// Nonzero-spike count per (channel, fiber) train, flattened channel-major.
pub fn count_spikes(trains: &SpikeTrains) -> Vec<usize> {
    trains
        .iter_trains()
        .map(|(_, _, train)| train.iter().filter(|&&t| t != 0.0).count())
        .collect()
}

/// Mean signed and absolute per-train count difference between two notes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CountComparison {
    pub mean_diff: f64,
    pub mean_abs_diff: f64,
}

pub fn compare_counts(
    a: &SpikeTrains,
    b: &SpikeTrains,
) -> Result<CountComparison, AnalysisError> {
    if a.shape() != b.shape() {
        return Err(AnalysisError::ShapeMismatch);
    }
    let counts_a = count_spikes(a);
    let counts_b = count_spikes(b);
    let n = counts_a.len();
    if n == 0 {
        return Err(AnalysisError::EmptyInput);
    }
    let mut sum = 0.0;
    let mut abs_sum = 0.0;
    for (&ca, &cb) in counts_a.iter().zip(&counts_b) {
        let diff = ca as f64 - cb as f64;
        sum += diff;
        abs_sum += diff.abs();
    }
    Ok(CountComparison {
        mean_diff: sum / n as f64,
        mean_abs_diff: abs_sum / n as f64,
    })
}
