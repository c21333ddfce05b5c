use neurochord::core::concurrency::{ConcurrencyParams, concurrency_profile, concurrency_profiles};
use neurochord::core::spatial::{compare_counts, count_spikes};
use neurochord::core::spike_train::SpikeTrains;
use neurochord::core::temporal::{avg_isi, calc_avg_isi};

#[test]
fn profile_counts_simultaneous_fibers_per_channel() {
    let trains = SpikeTrains::from_nested(&[
        // channel 0: 0.1 hits on 3 fibers, 0.2 on 2, 0.3 on 1
        vec![
            vec![0.1, 0.2, 0.3],
            vec![0.1, 0.2, 0.0],
            vec![0.1, 0.0, 0.0],
        ],
        // channel 1: silent
        vec![vec![0.0; 3], vec![0.0; 3], vec![0.0; 3]],
    ])
    .unwrap();
    let params = ConcurrencyParams {
        normalize: false,
        ..ConcurrencyParams::default()
    };
    let profiles = concurrency_profiles(&trains, &params);
    assert_eq!(profiles.len(), 2);
    assert_eq!(&profiles[0][..3], &[1.0, 1.0, 1.0]);
    assert!(profiles[1].iter().all(|&v| v == 0.0));
}

#[test]
fn normalized_silent_channel_stays_zero() {
    let profile = concurrency_profile(
        [&[0.0, 0.0][..]],
        &ConcurrencyParams::default(),
    );
    assert_eq!(profile.len(), 18);
    assert!(profile.iter().all(|&v| v == 0.0));
    assert!(profile.iter().all(|v| v.is_finite()));
}

#[test]
fn normalized_profile_is_percentages() {
    let fibers: [&[f64]; 4] = [
        &[0.1, 0.2, 0.0],
        &[0.1, 0.0, 0.0],
        &[0.2, 0.3, 0.0],
        &[0.4, 0.0, 0.0],
    ];
    let profile = concurrency_profile(fibers, &ConcurrencyParams::default());
    assert!((profile.iter().sum::<f64>() - 100.0).abs() < 1e-9);
    // 0.3 and 0.4 are singletons, 0.1 and 0.2 are pairs: 2 of each bucket.
    assert!((profile[0] - 50.0).abs() < 1e-9);
    assert!((profile[1] - 50.0).abs() < 1e-9);
}

#[test]
fn avg_isi_reference_values() {
    assert_eq!(calc_avg_isi(&[1.0, 2.0, 3.0, 0.0, 0.0, 0.0]), 1.0);

    let trains = SpikeTrains::from_nested(&[
        vec![
            vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0],
            vec![2.0, 4.0, 6.0, 0.0, 0.0, 0.0],
            vec![3.0, 6.0, 9.0, 0.0, 0.0, 0.0],
        ],
        vec![
            vec![3.0, 6.0, 9.0, 0.0, 0.0, 0.0],
            vec![2.0, 4.0, 6.0, 0.0, 0.0, 0.0],
            vec![1.0, 2.0, 3.0, 0.0, 0.0, 0.0],
        ],
    ])
    .unwrap();
    assert_eq!(avg_isi(&trains), vec![1.0, 2.0, 3.0, 3.0, 2.0, 1.0]);
}

#[test]
fn spike_counts_reference_values() {
    let trains = SpikeTrains::from_nested(&[
        vec![
            vec![1.0, 2.0, 3.0, 4.0, 0.0, 0.0],
            vec![2.0, 4.0, 6.0, 4.0, 5.0, 0.0],
            vec![3.0, 6.0, 0.0, 0.0, 0.0, 0.0],
        ],
        vec![
            vec![3.0, 0.0, 0.0, 0.0, 0.0, 0.0],
            vec![2.0, 4.0, 6.0, 0.0, 0.0, 0.0],
            vec![0.0; 6],
        ],
    ])
    .unwrap();
    assert_eq!(count_spikes(&trains), vec![4, 5, 2, 1, 3, 0]);

    let cmp = compare_counts(&trains, &trains).unwrap();
    assert_eq!(cmp.mean_diff, 0.0);
    assert_eq!(cmp.mean_abs_diff, 0.0);
}
