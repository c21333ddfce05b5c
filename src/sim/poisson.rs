//! sim/poisson.rs — seeded Poisson surrogate for the periphery boundary.
//!
//! Produces spike-timestamp arrays with the right shape, padding convention
//! and trial statistics so the analysis pipeline can be exercised end to end
//! without the external auditory model. Per-channel active fiber counts are
//! Poisson(15) clipped to [10, 20], matching the reference pipeline's fiber
//! allocation; spike times are uniform over the observation window.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::AnalysisError;
use crate::core::erb::erb_cf_list;
use crate::core::evaluate::SpikeSource;
use crate::core::musical::Note;
use crate::core::spike_train::{SpikeTrains, TrainShape};
use crate::sim::{Nervegram, Periphery, SimParams};

const FIBER_COUNT_LAMBDA: f64 = 15.0;
const FIBER_COUNT_RANGE: (u32, u32) = (10, 20);

/// Statistical stand-in for the periphery; deterministic per (note, seed).
#[derive(Clone, Debug)]
pub struct PoissonPeriphery {
    params: SimParams,
    /// Observation window in seconds.
    duration: f64,
    /// Mean firing rate per active fiber (spikes/s).
    rate_hz: f64,
}

impl PoissonPeriphery {
    pub fn new(params: SimParams, duration: f64, rate_hz: f64) -> Self {
        Self {
            params,
            duration,
            rate_hz,
        }
    }

    #[inline]
    pub fn params(&self) -> &SimParams {
        &self.params
    }

    fn trains_with_seed(&self, seed: u64, rate_hz: f64) -> SpikeTrains {
        let p = &self.params;
        let shape = TrainShape {
            channels: p.num_cf,
            fibers: p.fibers_per_channel,
            slots: p.max_spikes_per_train,
        };
        let mut rng = StdRng::seed_from_u64(seed);
        let mut data = vec![0.0; shape.cells()];
        for c in 0..shape.channels {
            let active = clipped_poisson(
                &mut rng,
                FIBER_COUNT_LAMBDA,
                FIBER_COUNT_RANGE.0,
                FIBER_COUNT_RANGE.1,
            )
            .min(shape.fibers as u32) as usize;
            for f in 0..active {
                let count =
                    (poisson(&mut rng, rate_hz * self.duration) as usize).min(shape.slots);
                let base = (c * shape.fibers + f) * shape.slots;
                let mut times: Vec<f64> = (0..count)
                    .map(|_| loop {
                        let t = rng.random_range(0.0..self.duration);
                        if t > 0.0 {
                            break t;
                        }
                    })
                    .collect();
                times.sort_by(|a, b| a.total_cmp(b));
                data[base..base + count].copy_from_slice(&times);
            }
        }
        // Shape and values are valid by construction.
        SpikeTrains::from_flat(shape, data).unwrap_or_else(|_| unreachable!())
    }

    fn note_seed(&self, note: Note, trial: u64) -> u64 {
        // splitmix-style mix so adjacent notes/trials decorrelate
        let mut z = self
            .params
            .seed
            .wrapping_add(note.semitone() as u64)
            .wrapping_mul(0x9e37_79b9_7f4a_7c15)
            .wrapping_add(trial);
        z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
        z ^ (z >> 31)
    }
}

impl Periphery for PoissonPeriphery {
    fn simulate(
        &self,
        signal: &[f64],
        _sample_rate: f64,
        params: &SimParams,
    ) -> Result<Nervegram, AnalysisError> {
        if signal.is_empty() {
            return Err(AnalysisError::EmptyInput);
        }
        let rms =
            (signal.iter().map(|&s| s * s).sum::<f64>() / signal.len() as f64).sqrt();
        let surrogate = Self::new(*params, self.duration, self.rate_hz * rms.max(1e-3));
        Ok(Nervegram {
            spike_times: surrogate.trains_with_seed(params.seed, surrogate.rate_hz),
            cf_hz: erb_cf_list(params.min_cf_hz, params.max_cf_hz, params.num_cf),
        })
    }
}

impl SpikeSource for PoissonPeriphery {
    fn spikes(&self, note: Note) -> Result<SpikeTrains, AnalysisError> {
        Ok(self.trains_with_seed(self.note_seed(note, 0), self.rate_hz))
    }

    fn trial_spikes(&self, note: Note) -> Result<Vec<SpikeTrains>, AnalysisError> {
        Ok((0..self.params.num_trials)
            .map(|trial| {
                self.trains_with_seed(self.note_seed(note, trial as u64 + 1), self.rate_hz)
            })
            .collect())
    }
}

/// Knuth Poisson sampler; fine for the small lambdas used here.
fn poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64) -> u32 {
    if lambda <= 0.0 {
        return 0;
    }
    let limit = (-lambda).exp();
    let mut k = 0u32;
    let mut product = 1.0;
    loop {
        product *= rng.random::<f64>();
        if product <= limit {
            return k;
        }
        k += 1;
    }
}

/// Rejection-sample Poisson(lambda) until the draw lands in [lo, hi].
fn clipped_poisson<R: Rng + ?Sized>(rng: &mut R, lambda: f64, lo: u32, hi: u32) -> u32 {
    loop {
        let k = poisson(rng, lambda);
        if (lo..=hi).contains(&k) {
            return k;
        }
    }
}
