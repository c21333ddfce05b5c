//! core/evaluate.rs — scoring a probability field against the empirical
//! consonance ordering.
//!
//! Steps: build one spike tensor per consonance-ordered interval note, project
//! the candidate field onto each (elementwise product, summed), normalize by
//! the root tensor's own nonzero-spike count, convert the score vector to a
//! probability distribution, and measure its divergence from the empirical
//! distribution. Reported fits are percentages; higher is more
//! consonance-like.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::divergence::{
    earth_movers_distance, jensen_shannon_distance, kl_divergence,
};
use crate::core::musical::{self, Note};
use crate::core::probability::Field;
use crate::core::spike_tensor::{SpikeTensor, TimeGrid};
use crate::core::spike_train::SpikeTrains;
use crate::core::AnalysisError;

/// Access to per-note spike-timestamp arrays (cache, simulator, fixture).
pub trait SpikeSource {
    /// Reference array for a note.
    fn spikes(&self, note: Note) -> Result<SpikeTrains, AnalysisError>;

    /// One array per stochastic trial for a note.
    fn trial_spikes(&self, note: Note) -> Result<Vec<SpikeTrains>, AnalysisError>;
}

/// Divergence used for the final fit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    KullbackLeibler,
    #[default]
    JensenShannon,
    EarthMovers,
}

/// Projection of `field` onto each interval tensor, normalized by the root
/// tensor's nonzero count.
///
/// The ceiling is data-dependent; a root tensor with no spikes yields an
/// all-zero score vector rather than a division by zero.
pub fn projection_scores(
    field: &Field,
    interval_tensors: &[SpikeTensor],
    root_tensor: &SpikeTensor,
) -> Result<Vec<f64>, AnalysisError> {
    if interval_tensors.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    for tensor in interval_tensors {
        if tensor.shape() != field.shape() {
            return Err(AnalysisError::ShapeMismatch);
        }
    }
    let max_possible = root_tensor.count_nonzero();
    if max_possible == 0 {
        warn!("root tensor has no spikes; projection scores degenerate to zero");
        return Ok(vec![0.0; interval_tensors.len()]);
    }
    let scores = interval_tensors
        .iter()
        .map(|tensor| {
            let projection: f64 = tensor
                .as_slice()
                .iter()
                .zip(field.as_slice())
                .filter(|&(&bit, _)| bit != 0)
                .map(|(_, &p)| p)
                .sum();
            projection / max_possible as f64
        })
        .collect();
    Ok(scores)
}

/// Convert raw scores into a probability distribution.
///
/// All-non-negative scores are normalized by their sum; otherwise the vector
/// is shifted by its minimum first so every value is ≥ 0. A degenerate
/// all-zero total yields the uniform distribution (the output always sums
/// to 1).
pub fn predicted_probabilities(scores: &[f64]) -> Result<Vec<f64>, AnalysisError> {
    if scores.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    let all_positive = scores.iter().all(|&s| s >= 0.0);
    let shifted: Vec<f64> = if all_positive {
        scores.to_vec()
    } else {
        let min = scores.iter().cloned().fold(f64::INFINITY, f64::min);
        scores.iter().map(|&s| s - min).collect()
    };
    let total: f64 = shifted.iter().sum();
    if total == 0.0 {
        let uniform = 1.0 / scores.len() as f64;
        return Ok(vec![uniform; scores.len()]);
    }
    Ok(shifted.into_iter().map(|s| s / total).collect())
}

/// Percentage fit of a predicted distribution against an empirical one.
///
/// KL and Jensen–Shannon report `100·(1 − divergence)`; EMD reports
/// `100·(1 − distance/max_distance)` where the maximum distance moves all
/// mass across the whole ordering.
pub fn fit_percent(
    metric: Metric,
    predicted: &[f64],
    empirical: &[f64],
) -> Result<f64, AnalysisError> {
    let fit = match metric {
        Metric::KullbackLeibler => 1.0 - kl_divergence(predicted, empirical)?,
        Metric::JensenShannon => 1.0 - jensen_shannon_distance(predicted, empirical)?,
        Metric::EarthMovers => {
            let max_distance = (predicted.len() - 1) as f64;
            1.0 - earth_movers_distance(predicted, empirical)? / max_distance
        }
    };
    Ok((100.0 * fit).round())
}

/// Scores a candidate probability field for a root note against the fixed
/// empirical consonance distribution.
///
/// The empirical table is held explicitly (not read from a global) so tests
/// can substitute their own reference distribution.
pub struct Evaluator<'a, S: SpikeSource> {
    source: &'a S,
    grid: TimeGrid,
    metric: Metric,
    empirical: Vec<f64>,
}

impl<'a, S: SpikeSource> Evaluator<'a, S> {
    pub fn new(source: &'a S, grid: TimeGrid, metric: Metric) -> Self {
        Self {
            source,
            grid,
            metric,
            empirical: musical::empirical_probabilities(),
        }
    }

    /// Replace the empirical distribution (must match the interval count).
    pub fn with_empirical(mut self, empirical: Vec<f64>) -> Result<Self, AnalysisError> {
        if empirical.len() != musical::CONSONANCE_ORDER.len() {
            return Err(AnalysisError::LengthMismatch {
                expected: musical::CONSONANCE_ORDER.len(),
                got: empirical.len(),
            });
        }
        self.empirical = empirical;
        Ok(self)
    }

    #[inline]
    pub fn grid(&self) -> TimeGrid {
        self.grid
    }

    /// One spike tensor per consonance-ordered interval note of `root`.
    pub fn interval_tensors(&self, root: Note) -> Result<Vec<SpikeTensor>, AnalysisError> {
        musical::consonance_ordered_notes(root)
            .into_iter()
            .map(|note| {
                let trains = self.source.spikes(note)?;
                Ok(SpikeTensor::from_trains(&trains, &self.grid))
            })
            .collect()
    }

    /// Per-interval projection scores for `field`, consonance order.
    pub fn scores(&self, field: &Field, root: Note) -> Result<Vec<f64>, AnalysisError> {
        let interval_tensors = self.interval_tensors(root)?;
        let root_trains = self.source.spikes(root)?;
        let root_tensor = SpikeTensor::from_trains(&root_trains, &self.grid);
        projection_scores(field, &interval_tensors, &root_tensor)
    }

    /// Percentage consonance fit of `field` for `root`.
    pub fn evaluate(&self, field: &Field, root: Note) -> Result<f64, AnalysisError> {
        let scores = self.scores(field, root)?;
        let predicted = predicted_probabilities(&scores)?;
        debug!(%root, ?scores, ?predicted, "consonance projection");
        fit_percent(self.metric, &predicted, &self.empirical)
    }

    /// Full pipeline for one root: trial set → simple probability → fit.
    pub fn evaluate_root(&self, root: Note) -> Result<f64, AnalysisError> {
        let trials = self.source.trial_spikes(root)?;
        let tensors: Vec<SpikeTensor> = trials
            .iter()
            .map(|t| SpikeTensor::from_trains(t, &self.grid))
            .collect();
        let field = crate::core::probability::simple_probability(&tensors)?;
        self.evaluate(&field, root)
    }
}
