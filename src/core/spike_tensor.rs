//! core/spike_tensor.rs — discretization onto a uniform time grid.
//!
//! - A nonzero timestamp `t` maps to bin `round(t/tau) - 1`; bin 0 is the first
//!   full tau interval after time zero. Cached reference data depends on this
//!   exact convention, offset included.
//! - Timestamps are pre-rounded to 10 decimals so float noise cannot move a
//!   spike across a bin boundary.
//! - Bins outside `[0, num_bins)` are dropped; collisions within a bin keep a
//!   single 1 (occupancy, not count).

use crate::core::spike_train::SpikeTrains;
use crate::core::{AnalysisError, round_decimals};

/// Default discretization step (seconds).
pub const DEFAULT_TAU: f64 = 1e-3;
/// Default observation window (seconds).
pub const DEFAULT_DURATION: f64 = 0.25;

const TIMESTAMP_DECIMALS: u32 = 10;

/// Uniform time grid: `num_bins = duration / tau`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeGrid {
    tau: f64,
    duration: f64,
    num_bins: usize,
}

impl TimeGrid {
    /// `tau` and `duration` must be positive and yield an integer bin count.
    pub fn new(tau: f64, duration: f64) -> Result<Self, AnalysisError> {
        let invalid = AnalysisError::InvalidTimeGrid { tau, duration };
        if !tau.is_finite() || tau <= 0.0 || !duration.is_finite() || duration <= 0.0 {
            return Err(invalid);
        }
        let ratio = duration / tau;
        let bins = ratio.round_ties_even();
        if bins < 1.0 || (ratio - bins).abs() > 1e-6 {
            return Err(invalid);
        }
        Ok(Self {
            tau,
            duration,
            num_bins: bins as usize,
        })
    }

    #[inline]
    pub fn tau(&self) -> f64 {
        self.tau
    }

    #[inline]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[inline]
    pub fn num_bins(&self) -> usize {
        self.num_bins
    }

    /// Bin index for a nonzero timestamp; `None` for padding or out-of-range.
    #[inline]
    pub fn bin_of(&self, t: f64) -> Option<usize> {
        if t == 0.0 {
            return None;
        }
        let rounded = round_decimals(t, TIMESTAMP_DECIMALS);
        let idx = (rounded / self.tau).round_ties_even() as i64 - 1;
        if idx < 0 || idx >= self.num_bins as i64 {
            None
        } else {
            Some(idx as usize)
        }
    }
}

impl Default for TimeGrid {
    fn default() -> Self {
        // Defaults always form a valid grid.
        Self {
            tau: DEFAULT_TAU,
            duration: DEFAULT_DURATION,
            num_bins: (DEFAULT_DURATION / DEFAULT_TAU).round_ties_even() as usize,
        }
    }
}

/// Shape of a spike tensor or a derived field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TensorShape {
    pub channels: usize,
    pub fibers: usize,
    pub bins: usize,
}

impl TensorShape {
    #[inline]
    pub fn cells(&self) -> usize {
        self.channels * self.fibers * self.bins
    }

    #[inline]
    pub(crate) fn index(&self, channel: usize, fiber: usize, bin: usize) -> usize {
        (channel * self.fibers + fiber) * self.bins + bin
    }
}

/// Binary occupancy tensor `[channel][fiber][bin]`.
#[derive(Clone, Debug, PartialEq)]
pub struct SpikeTensor {
    shape: TensorShape,
    data: Vec<u8>,
}

impl SpikeTensor {
    /// Discretize a spike-timestamp array onto `grid`.
    pub fn from_trains(trains: &SpikeTrains, grid: &TimeGrid) -> Self {
        let ts = trains.shape();
        let shape = TensorShape {
            channels: ts.channels,
            fibers: ts.fibers,
            bins: grid.num_bins(),
        };
        let mut data = vec![0u8; shape.cells()];
        for (c, f, train) in trains.iter_trains() {
            for &t in train {
                if let Some(bin) = grid.bin_of(t) {
                    data[shape.index(c, f, bin)] = 1;
                }
            }
        }
        Self { shape, data }
    }

    /// Build from nested 0/1 rows (test fixtures and cached reference data).
    pub fn from_nested(nested: &[Vec<Vec<u8>>]) -> Result<Self, AnalysisError> {
        let channels = nested.len();
        let fibers = nested.first().map_or(0, |c| c.len());
        let bins = nested
            .first()
            .and_then(|c| c.first())
            .map_or(0, |f| f.len());
        let shape = TensorShape {
            channels,
            fibers,
            bins,
        };
        let mut data = Vec::with_capacity(shape.cells());
        for channel in nested {
            if channel.len() != fibers {
                return Err(AnalysisError::ShapeMismatch);
            }
            for row in channel {
                if row.len() != bins {
                    return Err(AnalysisError::ShapeMismatch);
                }
                data.extend(row.iter().map(|&v| (v != 0) as u8));
            }
        }
        Ok(Self { shape, data })
    }

    #[inline]
    pub fn shape(&self) -> TensorShape {
        self.shape
    }

    #[inline]
    pub fn get(&self, channel: usize, fiber: usize, bin: usize) -> bool {
        self.data[self.shape.index(channel, fiber, bin)] != 0
    }

    /// One (channel, fiber) row along the time axis.
    #[inline]
    pub fn row(&self, channel: usize, fiber: usize) -> &[u8] {
        let start = self.shape.index(channel, fiber, 0);
        &self.data[start..start + self.shape.bins]
    }

    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&v| v != 0).count()
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }
}
