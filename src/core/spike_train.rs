//! core/spike_train.rs — zero-padded spike-timestamp arrays.
//!
//! The periphery reports spike times as a dense `[channel][fiber][slot]` array
//! of seconds, padded with zeros up to a fixed slot count per fiber. Zero is a
//! sentinel for "no spike"; real spike times are strictly positive.

use crate::core::AnalysisError;

/// Shape of a spike-timestamp array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrainShape {
    pub channels: usize,
    pub fibers: usize,
    pub slots: usize,
}

impl TrainShape {
    #[inline]
    pub fn cells(&self) -> usize {
        self.channels * self.fibers * self.slots
    }
}

/// Spike timestamps for one simulated trial, all channels and fibers.
#[derive(Clone, Debug, PartialEq)]
pub struct SpikeTrains {
    shape: TrainShape,
    data: Vec<f64>,
}

impl SpikeTrains {
    /// Wrap a flat channel-major buffer. Timestamps must be non-negative.
    pub fn from_flat(shape: TrainShape, data: Vec<f64>) -> Result<Self, AnalysisError> {
        if data.len() != shape.cells() {
            return Err(AnalysisError::DataLengthMismatch {
                expected: shape.cells(),
                got: data.len(),
            });
        }
        for &t in &data {
            if !t.is_finite() || t < 0.0 {
                return Err(AnalysisError::NegativeTimestamp { value: t });
            }
        }
        Ok(Self { shape, data })
    }

    /// Build from nested per-channel, per-fiber slot lists (must be rectangular).
    pub fn from_nested(nested: &[Vec<Vec<f64>>]) -> Result<Self, AnalysisError> {
        let channels = nested.len();
        let fibers = nested.first().map_or(0, |c| c.len());
        let slots = nested
            .first()
            .and_then(|c| c.first())
            .map_or(0, |f| f.len());
        let shape = TrainShape {
            channels,
            fibers,
            slots,
        };
        let mut data = Vec::with_capacity(shape.cells());
        for channel in nested {
            if channel.len() != fibers {
                return Err(AnalysisError::ShapeMismatch);
            }
            for fiber in channel {
                if fiber.len() != slots {
                    return Err(AnalysisError::ShapeMismatch);
                }
                data.extend_from_slice(fiber);
            }
        }
        Self::from_flat(shape, data)
    }

    #[inline]
    pub fn shape(&self) -> TrainShape {
        self.shape
    }

    /// Slot values for one (channel, fiber) train, padding included.
    #[inline]
    pub fn train(&self, channel: usize, fiber: usize) -> &[f64] {
        let start = (channel * self.shape.fibers + fiber) * self.shape.slots;
        &self.data[start..start + self.shape.slots]
    }

    /// All fiber trains of one channel.
    pub fn channel_trains(&self, channel: usize) -> impl Iterator<Item = &[f64]> {
        (0..self.shape.fibers).map(move |f| self.train(channel, f))
    }

    /// Iterate `(channel, fiber, train)` over the whole array.
    pub fn iter_trains(&self) -> impl Iterator<Item = (usize, usize, &[f64])> {
        (0..self.shape.channels).flat_map(move |c| {
            (0..self.shape.fibers).map(move |f| (c, f, self.train(c, f)))
        })
    }

    /// Number of real (nonzero) spikes across the whole array.
    pub fn count_nonzero(&self) -> usize {
        self.data.iter().filter(|&&t| t != 0.0).count()
    }

    #[inline]
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}
