//! core/divergence.rs — distances between probability distributions.
//!
//! - KL: asymmetric; zeros in the reference are floored at a small epsilon,
//!   and `0·ln(0/q)` terms contribute 0.
//! - Jensen–Shannon: returned as a *distance* (square root of the divergence,
//!   natural log), matching the scipy convention the reference data was
//!   scored with.
//! - EMD: explicit 1-D optimal-transport linear program over n² flow
//!   variables. The constraints encode per-point net flow against the
//!   marginal difference, not a sorted cumulative shortcut.

use minilp::{ComparisonOp, OptimizationDirection, Problem};

use crate::core::AnalysisError;

/// Floor for zero reference-probability entries in KL.
pub const KL_EPSILON: f64 = 1e-10;

fn check_pair(p: &[f64], q: &[f64]) -> Result<(), AnalysisError> {
    if p.is_empty() {
        return Err(AnalysisError::EmptyInput);
    }
    if p.len() != q.len() {
        return Err(AnalysisError::LengthMismatch {
            expected: p.len(),
            got: q.len(),
        });
    }
    Ok(())
}

/// Kullback–Leibler divergence `D(p ‖ q)`.
pub fn kl_divergence(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    check_pair(p, q)?;
    let mut acc = 0.0;
    for (&pi, &qi) in p.iter().zip(q) {
        if pi == 0.0 {
            continue;
        }
        let qi = if qi == 0.0 { KL_EPSILON } else { qi };
        acc += pi * (pi / qi).ln();
    }
    Ok(acc)
}

/// `D(q ‖ p)` — KL with the arguments swapped.
pub fn kl_divergence_reverse(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    kl_divergence(q, p)
}

/// Jensen–Shannon distance: `sqrt((D(p‖m) + D(q‖m)) / 2)` with `m = (p+q)/2`.
///
/// Symmetric and bounded by `sqrt(ln 2)`.
pub fn jensen_shannon_distance(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    check_pair(p, q)?;
    let m: Vec<f64> = p.iter().zip(q).map(|(&a, &b)| 0.5 * (a + b)).collect();
    let divergence = 0.5 * (kl_divergence(p, &m)? + kl_divergence(q, &m)?);
    // Tiny negative values can appear from cancellation.
    Ok(divergence.max(0.0).sqrt())
}

/// Earth Mover's Distance between two distributions over ordered categories.
///
/// Minimizes `Σ |i-j| · f[i][j]` subject to, for each point `i`,
/// `Σ_j f[i][j] − Σ_j f[j][i] = p[i] − q[i]` with `f ≥ 0`. Diagonal flows are
/// forced to zero by the constraint system. Infeasibility is a hard error.
pub fn earth_movers_distance(p: &[f64], q: &[f64]) -> Result<f64, AnalysisError> {
    check_pair(p, q)?;
    let n = p.len();

    let mut problem = Problem::new(OptimizationDirection::Minimize);
    let mut flow = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            let cost = (i as f64 - j as f64).abs();
            flow.push(problem.add_var(cost, (0.0, f64::INFINITY)));
        }
    }

    for i in 0..n {
        let mut row = Vec::with_capacity(2 * n - 1);
        // Net flow out of point i; f[i][i] picks up the -1 coefficient.
        row.push((flow[i * n + i], -1.0));
        for j in 0..n {
            if j == i {
                continue;
            }
            row.push((flow[i * n + j], 1.0));
            row.push((flow[j * n + i], -1.0));
        }
        problem.add_constraint(row.as_slice(), ComparisonOp::Eq, p[i] - q[i]);
    }

    let solution = problem
        .solve()
        .map_err(|_| AnalysisError::TransportFailed)?;
    Ok(solution.objective())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kl_of_identical_distributions_is_zero() {
        let p = [0.5, 0.25, 0.25];
        assert!(kl_divergence(&p, &p).unwrap().abs() < 1e-12);
    }

    #[test]
    fn kl_is_asymmetric() {
        let p = [0.8, 0.2];
        let q = [0.5, 0.5];
        let forward = kl_divergence(&p, &q).unwrap();
        let reverse = kl_divergence_reverse(&p, &q).unwrap();
        assert!(forward > 0.0);
        assert!((forward - reverse).abs() > 1e-6);
    }

    #[test]
    fn zero_reference_entries_are_floored() {
        let p = [1.0, 0.0];
        let q = [0.0, 1.0];
        let d = kl_divergence(&p, &q).unwrap();
        assert!(d.is_finite());
        assert!((d - (1.0f64 / KL_EPSILON).ln()).abs() < 1e-6);
    }

    #[test]
    fn js_distance_is_symmetric_and_bounded() {
        let p = [0.7, 0.2, 0.1];
        let q = [0.1, 0.3, 0.6];
        let pq = jensen_shannon_distance(&p, &q).unwrap();
        let qp = jensen_shannon_distance(&q, &p).unwrap();
        assert!((pq - qp).abs() < 1e-12);
        assert!(pq > 0.0);
        assert!(pq <= (2f64.ln()).sqrt() + 1e-12);
        assert!(jensen_shannon_distance(&p, &p).unwrap().abs() < 1e-12);
    }

    #[test]
    fn emd_of_identical_distributions_is_zero() {
        let p = [0.25, 0.25, 0.5];
        assert!(earth_movers_distance(&p, &p).unwrap().abs() < 1e-9);
    }

    #[test]
    fn emd_of_unit_shift_is_the_moved_mass() {
        // All mass moves one step: distance = 1.
        let p = [1.0, 0.0, 0.0];
        let q = [0.0, 1.0, 0.0];
        let d = earth_movers_distance(&p, &q).unwrap();
        assert!((d - 1.0).abs() < 1e-9);

        // Half the mass moves two steps: distance = 1.
        let p = [1.0, 0.0, 0.0];
        let q = [0.5, 0.0, 0.5];
        let d = earth_movers_distance(&p, &q).unwrap();
        assert!((d - 1.0).abs() < 1e-9);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let err = jensen_shannon_distance(&[0.5, 0.5], &[1.0]).unwrap_err();
        assert_eq!(
            err,
            AnalysisError::LengthMismatch {
                expected: 2,
                got: 1
            }
        );
    }
}
