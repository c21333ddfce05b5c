//! Numeric core: discretization, trial reductions, and consonance scoring.
//!
//! Everything here is a pure transform over in-memory arrays; file layout,
//! caching and plotting live outside the crate.

pub mod analysis_worker;
pub mod concurrency;
pub mod divergence;
pub mod erb;
pub mod evaluate;
pub mod musical;
pub mod probability;
pub mod pulse;
pub mod spatial;
pub mod spike_tensor;
pub mod spike_train;
pub mod temporal;

use std::fmt;

/// Errors returned by the analysis core.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisError {
    /// `tau` or `duration` is non-finite, not positive, or their ratio is not
    /// an integer bin count.
    InvalidTimeGrid { tau: f64, duration: f64 },
    /// A spike timestamp was negative (zero is reserved for padding).
    NegativeTimestamp { value: f64 },
    /// Flat data length disagrees with the declared shape.
    DataLengthMismatch { expected: usize, got: usize },
    /// Tensors in a trial set (or paired fields) disagree in shape.
    ShapeMismatch,
    /// An operation over a trial set or distribution received no elements.
    EmptyInput,
    /// Paired vectors disagree in length.
    LengthMismatch { expected: usize, got: usize },
    /// Snapshot windows must have an odd width.
    EvenSnapWindow { snap_size: usize },
    /// A note name could not be parsed, or a semitone fell below the C0 origin.
    InvalidNote(String),
    /// The optimal-transport linear program had no feasible solution.
    TransportFailed,
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTimeGrid { tau, duration } => {
                write!(f, "invalid time grid: tau={tau}, duration={duration}")
            }
            Self::NegativeTimestamp { value } => {
                write!(f, "negative spike timestamp: {value}")
            }
            Self::DataLengthMismatch { expected, got } => {
                write!(f, "data length {got} does not match shape ({expected} cells)")
            }
            Self::ShapeMismatch => write!(f, "tensor shapes disagree"),
            Self::EmptyInput => write!(f, "empty input"),
            Self::LengthMismatch { expected, got } => {
                write!(f, "length mismatch: expected {expected}, got {got}")
            }
            Self::EvenSnapWindow { snap_size } => {
                write!(f, "snapshot window must be odd, got {snap_size}")
            }
            Self::InvalidNote(name) => write!(f, "invalid note name: {name:?}"),
            Self::TransportFailed => write!(f, "optimal-transport solve failed"),
        }
    }
}

impl std::error::Error for AnalysisError {}

/// Round to a fixed number of decimals, ties to even (numpy-compatible).
#[inline]
pub(crate) fn round_decimals(x: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (x * scale).round_ties_even() / scale
}
