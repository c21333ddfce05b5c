//! core/temporal.rs — inter-spike interval statistics.

use crate::core::spike_train::SpikeTrains;

/// Average inter-spike interval of one zero-padded train.
///
/// Padding zeros are dropped and an implicit spike at t=0 anchors the first
/// interval, so `[1, 2, 3, 0, 0, 0]` → 1.0. A train with no spikes yields 0.0.
pub fn calc_avg_isi(train: &[f64]) -> f64 {
    let mut prev = 0.0;
    let mut sum = 0.0;
    let mut count = 0usize;
    for &t in train {
        if t == 0.0 {
            continue;
        }
        sum += t - prev;
        prev = t;
        count += 1;
    }
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/// Average ISI for every (channel, fiber) train, flattened channel-major.
pub fn avg_isi(trains: &SpikeTrains) -> Vec<f64> {
    trains
        .iter_trains()
        .map(|(_, _, train)| calc_avg_isi(train))
        .collect()
}
