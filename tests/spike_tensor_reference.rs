use neurochord::core::spike_tensor::{SpikeTensor, TimeGrid};
use neurochord::core::spike_train::SpikeTrains;

// Reference discretization: tau=0.1, duration=0.6, the 0.7 spike rounds to
// bin 6 and is dropped, the zero slot is padding.
#[test]
fn reference_discretization_scenario() {
    let trains = SpikeTrains::from_nested(&[
        vec![vec![0.1, 0.2, 0.3], vec![0.4, 0.5, 0.6]],
        vec![vec![0.7, 0.8, 0.9], vec![0.7, 0.3, 0.0]],
    ])
    .unwrap();
    let grid = TimeGrid::new(0.1, 0.6).unwrap();
    let tensor = SpikeTensor::from_trains(&trains, &grid);

    let expected = SpikeTensor::from_nested(&[
        vec![vec![1, 1, 1, 0, 0, 0], vec![0, 0, 0, 1, 1, 1]],
        vec![vec![0, 0, 0, 0, 0, 0], vec![0, 0, 1, 0, 0, 0]],
    ])
    .unwrap();
    assert_eq!(tensor, expected);
}

#[test]
fn discretization_only_drops_or_merges() {
    let trains = SpikeTrains::from_nested(&[vec![
        vec![0.001, 0.0011, 0.1, 0.249, 0.3, 0.0],
        vec![0.05, 0.0501, 0.0502, 0.0, 0.0, 0.0],
    ]])
    .unwrap();
    let grid = TimeGrid::default();
    let tensor = SpikeTensor::from_trains(&trains, &grid);
    assert!(tensor.count_nonzero() <= trains.count_nonzero());
    assert!(tensor.count_nonzero() > 0);
}

#[test]
fn default_grid_matches_reference_resolution() {
    // 1 ms bins over 0.25 s
    let grid = TimeGrid::default();
    assert_eq!(grid.num_bins(), 250);
    assert_eq!(grid.bin_of(0.001), Some(0));
    assert_eq!(grid.bin_of(0.25), Some(249));
    assert_eq!(grid.bin_of(0.251), None);
}

#[test]
fn negative_timestamps_fail_eagerly() {
    assert!(SpikeTrains::from_nested(&[vec![vec![-0.1, 0.2]]]).is_err());
}
