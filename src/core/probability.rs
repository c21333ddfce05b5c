//! core/probability.rs — reductions over a trial set of spike tensors.
//!
//! All reductions preserve shape: `[trial] x [channel][fiber][bin]` →
//! `[channel][fiber][bin]`. Trials are read-only during reduction, so the
//! trial axis is embarrassingly parallel; the implementations here stay
//! single-threaded and leave fan-out to `analysis_worker`.
//!
//! Division policy: every denominator that can reach zero is guarded and the
//! affected cells stay 0 — reductions never emit NaN.

use crate::core::AnalysisError;
use crate::core::spike_tensor::{SpikeTensor, TensorShape};

/// Default snapshot window (bins, odd).
pub const DEFAULT_SNAP_SIZE: usize = 5;

/// Float tensor with the same shape as one spike tensor.
#[derive(Clone, Debug, PartialEq)]
pub struct Field {
    shape: TensorShape,
    data: Vec<f64>,
}

impl Field {
    pub fn zeros(shape: TensorShape) -> Self {
        Self {
            shape,
            data: vec![0.0; shape.cells()],
        }
    }

    /// Wrap an existing flat buffer (test fixtures).
    pub fn from_flat(shape: TensorShape, data: Vec<f64>) -> Result<Self, AnalysisError> {
        if data.len() != shape.cells() {
            return Err(AnalysisError::DataLengthMismatch {
                expected: shape.cells(),
                got: data.len(),
            });
        }
        Ok(Self { shape, data })
    }

    #[inline]
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, channel: usize, fiber: usize, bin: usize) -> f64 {
        self.data[self.shape.index(channel, fiber, bin)]
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

fn trial_shape(trials: &[SpikeTensor]) -> Result<TensorShape, AnalysisError> {
    let first = trials.first().ok_or(AnalysisError::EmptyInput)?;
    let shape = first.shape();
    if trials.iter().any(|t| t.shape() != shape) {
        return Err(AnalysisError::ShapeMismatch);
    }
    Ok(shape)
}

fn firing_counts(trials: &[SpikeTensor], shape: TensorShape) -> Vec<u32> {
    let mut counts = vec![0u32; shape.cells()];
    for tensor in trials {
        for (count, &bit) in counts.iter_mut().zip(tensor.as_slice()) {
            *count += bit as u32;
        }
    }
    counts
}

/// Fraction of trials firing at each cell: mean of the trial tensors.
///
/// Counts first, divides once, so a cell that fires in every trial is exactly
/// 1.0 rather than n accumulated copies of 1/n.
pub fn simple_probability(trials: &[SpikeTensor]) -> Result<Field, AnalysisError> {
    let shape = trial_shape(trials)?;
    let n = trials.len() as f64;
    let mut field = Field::zeros(shape);
    for (acc, count) in field.data.iter_mut().zip(firing_counts(trials, shape)) {
        *acc = count as f64 / n;
    }
    Ok(field)
}

/// Signed firing tendency: each trial contributes `+1/n` where it fired and
/// `-1/n` where it did not, giving cell values in `[-1, 1]`.
pub fn simple_posneg(trials: &[SpikeTensor]) -> Result<Field, AnalysisError> {
    let shape = trial_shape(trials)?;
    let n = trials.len() as f64;
    let mut field = Field::zeros(shape);
    for (acc, count) in field.data.iter_mut().zip(firing_counts(trials, shape)) {
        // fired - silent = 2*count - n
        *acc = (2.0 * count as f64 - n) / n;
    }
    Ok(field)
}

/// Running signed integral along the time axis, averaged over trials.
///
/// Per trial and (channel, fiber): walk the bins accumulating `+delta` on a
/// firing bin and `-delta` otherwise, `delta = 1/num_bins` exactly. Exposes
/// when within the window the firing tendency shifts, not just its average.
pub fn cumulative_average(trials: &[SpikeTensor]) -> Result<Field, AnalysisError> {
    let shape = trial_shape(trials)?;
    let delta = 1.0 / shape.bins as f64;
    let trial_mu = 1.0 / trials.len() as f64;
    let mut field = Field::zeros(shape);
    for tensor in trials {
        for c in 0..shape.channels {
            for f in 0..shape.fibers {
                let row = tensor.row(c, f);
                let mut running = 0.0;
                for (b, &bit) in row.iter().enumerate() {
                    running += if bit != 0 { delta } else { -delta };
                    field.data[shape.index(c, f, b)] += running * trial_mu;
                }
            }
        }
    }
    Ok(field)
}

/// Weighted expectation: `Σ(tensor·weight) / count_of_nonzero_contributions`.
///
/// The denominator counts, per cell, how many weighted contributions were
/// nonzero; cells with no contributions stay 0 instead of dividing by zero.
pub fn expectation(
    trials: &[SpikeTensor],
    weights: &[f64],
) -> Result<Field, AnalysisError> {
    let shape = trial_shape(trials)?;
    if weights.len() != trials.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: trials.len(),
            got: weights.len(),
        });
    }
    let mut field = Field::zeros(shape);
    let mut counts = vec![0u32; shape.cells()];
    for (tensor, &w) in trials.iter().zip(weights) {
        for ((acc, count), &bit) in field
            .data
            .iter_mut()
            .zip(counts.iter_mut())
            .zip(tensor.as_slice())
        {
            let contribution = bit as f64 * w;
            if contribution != 0.0 {
                *acc += contribution;
                *count += 1;
            }
        }
    }
    for (acc, &count) in field.data.iter_mut().zip(&counts) {
        if count > 0 {
            *acc /= count as f64;
        }
    }
    Ok(field)
}

/// Typical shape of an expectation field around real spikes.
///
/// For every 1-bit at time `idx`, read the expectation over the centered
/// window `[idx - snap/2, idx + snap/2]`, bucket values by offset from the
/// window start, and average each bucket over all contributing events. Zero
/// expectation values and out-of-range offsets do not contribute; an empty
/// bucket yields 0.
pub fn snapshot(
    tensor: &SpikeTensor,
    expectation: &Field,
    snap_size: usize,
) -> Result<Vec<f64>, AnalysisError> {
    if snap_size == 0 || snap_size % 2 == 0 {
        return Err(AnalysisError::EvenSnapWindow { snap_size });
    }
    let shape = tensor.shape();
    if expectation.shape() != shape {
        return Err(AnalysisError::ShapeMismatch);
    }
    let half = snap_size / 2;
    let mut sums = vec![0.0; snap_size];
    let mut counts = vec![0usize; snap_size];
    for c in 0..shape.channels {
        for f in 0..shape.fibers {
            let row = tensor.row(c, f);
            for (idx, &bit) in row.iter().enumerate() {
                if bit == 0 {
                    continue;
                }
                let start = idx as i64 - half as i64;
                for rel in 0..snap_size {
                    let i = start + rel as i64;
                    if i < 0 || i >= shape.bins as i64 {
                        continue;
                    }
                    let v = expectation.get(c, f, i as usize);
                    if v != 0.0 {
                        sums[rel] += v;
                        counts[rel] += 1;
                    }
                }
            }
        }
    }
    Ok(sums
        .iter()
        .zip(&counts)
        .map(|(&s, &n)| if n > 0 { s / n as f64 } else { 0.0 })
        .collect())
}
