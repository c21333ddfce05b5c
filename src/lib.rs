//! Auditory-nerve spike statistics for musical consonance.
//!
//! Pipeline: spike timestamps → binary spike tensors → probability/expectation
//! fields → projection onto consonance-ordered interval tensors → divergence
//! against the empirical consonance distribution.
//!
//! The auditory periphery itself is a boundary (`sim::Periphery`); the crate
//! only consumes its zero-padded spike-timestamp output.

pub mod config;
pub mod core;
pub mod sim;
