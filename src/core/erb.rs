// core/erb.rs
// ERB-rate scale conversion and characteristic-frequency grids

/// Convert Hz to ERB-rate (Cam units, Glasberg & Moore 1990)
pub fn hz_to_erb(f_hz: f64) -> f64 {
    21.4 * (1.0 + 4.37 * f_hz / 1000.0).log10()
}

/// Convert ERB-rate (Cam) back to Hz
pub fn erb_to_hz(e_cam: f64) -> f64 {
    (10f64.powf(e_cam / 21.4) - 1.0) * 1000.0 / 4.37
}

/// Characteristic frequencies (Hz) uniformly spaced in ERB-rate.
///
/// # Arguments
/// - `f_min`: lowest CF in Hz
/// - `f_max`: highest CF in Hz
/// - `num_cf`: number of channels (endpoints included)
///
/// # Returns
/// Vector of CFs in Hz, ascending.
pub fn erb_cf_list(f_min: f64, f_max: f64, num_cf: usize) -> Vec<f64> {
    if num_cf == 0 {
        return Vec::new();
    }
    if num_cf == 1 {
        return vec![f_min];
    }
    let e_min = hz_to_erb(f_min);
    let e_max = hz_to_erb(f_max);
    (0..num_cf)
        .map(|i| {
            let t = i as f64 / (num_cf - 1) as f64;
            erb_to_hz(e_min + t * (e_max - e_min))
        })
        .collect()
}
