//! core/concurrency.rs — per-channel spike-concurrency histograms.
//!
//! Groups raw (non-discretized) timestamps across all fibers of one channel by
//! rounded value and histograms how many fibers fired at each distinct
//! instant: bucket `k` counts instants with exactly `k+1` simultaneous spikes.

use serde::{Deserialize, Serialize};

use crate::core::round_decimals;
use crate::core::spike_train::SpikeTrains;
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct ConcurrencyParams {
    /// Histogram length; concurrency counts beyond it clamp into the last
    /// bucket rather than overflowing.
    #[serde(default = "ConcurrencyParams::default_profile_len")]
    pub profile_len: usize,
    /// Decimal precision used to group timestamps into one instant.
    #[serde(default = "ConcurrencyParams::default_round_decimals")]
    pub round_decimals: u32,
    /// Rescale counts to percentages summing to 100.
    #[serde(default = "ConcurrencyParams::default_normalize")]
    pub normalize: bool,
}

impl ConcurrencyParams {
    fn default_profile_len() -> usize {
        18
    }
    fn default_round_decimals() -> u32 {
        8
    }
    fn default_normalize() -> bool {
        true
    }
}

impl Default for ConcurrencyParams {
    fn default() -> Self {
        Self {
            profile_len: Self::default_profile_len(),
            round_decimals: Self::default_round_decimals(),
            normalize: Self::default_normalize(),
        }
    }
}

/// Concurrency profile over one channel's fiber trains.
///
/// A channel with no spikes yields an all-zero profile (the percentage
/// normalization is skipped rather than dividing by zero).
pub fn concurrency_profile<'a, I>(fibers: I, params: &ConcurrencyParams) -> Vec<f64>
where
    I: IntoIterator<Item = &'a [f64]>,
{
    let scale = 10f64.powi(params.round_decimals as i32);
    let mut occurrences: HashMap<i64, usize> = HashMap::new();
    for train in fibers {
        for &t in train {
            if t == 0.0 {
                continue; // padding
            }
            let key = (round_decimals(t, params.round_decimals) * scale)
                .round_ties_even() as i64;
            *occurrences.entry(key).or_insert(0) += 1;
        }
    }

    let mut profile = vec![0.0; params.profile_len];
    if params.profile_len == 0 {
        return profile;
    }
    for (_, count) in occurrences {
        let bucket = (count - 1).min(params.profile_len - 1);
        profile[bucket] += 1.0;
    }

    if params.normalize {
        let total: f64 = profile.iter().sum();
        if total > 0.0 {
            for v in &mut profile {
                *v = (*v / total) * 100.0;
            }
        }
    }
    profile
}

/// One profile per channel.
pub fn concurrency_profiles(
    trains: &SpikeTrains,
    params: &ConcurrencyParams,
) -> Vec<Vec<f64>> {
    (0..trains.shape().channels)
        .map(|c| concurrency_profile(trains.channel_trains(c), params))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts() -> ConcurrencyParams {
        ConcurrencyParams {
            normalize: false,
            ..ConcurrencyParams::default()
        }
    }

    #[test]
    fn groups_fibers_by_rounded_instant() {
        // Three fibers fire at 0.10, two at 0.20, one at 0.30.
        let fibers: [&[f64]; 3] = [
            &[0.1, 0.2, 0.3],
            &[0.1, 0.2, 0.0],
            &[0.1, 0.0, 0.0],
        ];
        let profile = concurrency_profile(fibers, &counts());
        assert_eq!(profile[0], 1.0); // one instant with a single spike
        assert_eq!(profile[1], 1.0); // one with two
        assert_eq!(profile[2], 1.0); // one with three
        assert!(profile[3..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn rounding_merges_near_identical_instants() {
        let fibers: [&[f64]; 2] = [&[0.100000001], &[0.100000002]];
        let profile = concurrency_profile(fibers, &counts());
        assert_eq!(profile[1], 1.0);
    }

    #[test]
    fn silent_channel_is_all_zero_even_normalized() {
        let fibers: [&[f64]; 2] = [&[0.0, 0.0], &[0.0, 0.0]];
        let profile = concurrency_profile(fibers, &ConcurrencyParams::default());
        assert!(profile.iter().all(|&v| v == 0.0));
        assert_eq!(profile.len(), 18);
    }

    #[test]
    fn overflow_clamps_into_last_bucket() {
        let train = [0.5];
        let fibers: Vec<&[f64]> = (0..25).map(|_| &train[..]).collect();
        let profile = concurrency_profile(fibers, &counts());
        assert_eq!(profile[17], 1.0);
        assert!(profile[..17].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn normalized_profile_sums_to_100() {
        let fibers: [&[f64]; 3] = [&[0.1, 0.2], &[0.1, 0.0], &[0.3, 0.0]];
        let profile = concurrency_profile(fibers, &ConcurrencyParams::default());
        let total: f64 = profile.iter().sum();
        assert!((total - 100.0).abs() < 1e-9);
    }
}
