//! core/pulse.rs — population pulse vector.
//!
//! Counts spikes per time bin summed over every channel and fiber. Unlike the
//! per-fiber occupancy tensor this keeps multiplicity, and it uses a
//! truncating `floor(t/tau)` bin convention: the vector answers "how many
//! spikes landed in this slice of the window", not "which cell fired".

use crate::core::spike_tensor::TimeGrid;
use crate::core::spike_train::SpikeTrains;

/// Population spike counts per bin; out-of-range spikes are dropped.
pub fn pulse_vector(trains: &SpikeTrains, grid: &TimeGrid) -> Vec<u32> {
    let mut pulse = vec![0u32; grid.num_bins()];
    for (_, _, train) in trains.iter_trains() {
        for &t in train {
            if t == 0.0 {
                continue;
            }
            let bin = (t / grid.tau()) as usize;
            if bin < pulse.len() {
                pulse[bin] += 1;
            }
        }
    }
    pulse
}
