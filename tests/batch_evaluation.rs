use neurochord::core::analysis_worker::evaluate_batch;
use neurochord::core::evaluate::{Evaluator, Metric, SpikeSource};
use neurochord::core::musical::Note;
use neurochord::core::probability::simple_probability;
use neurochord::core::spike_tensor::{SpikeTensor, TimeGrid};
use neurochord::sim::SimParams;
use neurochord::sim::poisson::PoissonPeriphery;

fn small_periphery() -> PoissonPeriphery {
    let params = SimParams {
        num_cf: 6,
        fibers_per_channel: 20,
        max_spikes_per_train: 80,
        num_trials: 8,
        seed: 42,
        ..SimParams::default()
    };
    PoissonPeriphery::new(params, 0.25, 150.0)
}

#[test]
fn single_root_pipeline_produces_a_finite_fit() {
    let periphery = small_periphery();
    let grid = TimeGrid::new(1e-3, 0.25).unwrap();
    let evaluator = Evaluator::new(&periphery, grid, Metric::JensenShannon);

    let root: Note = "C4".parse().unwrap();
    let trials = periphery.trial_spikes(root).unwrap();
    let tensors: Vec<SpikeTensor> = trials
        .iter()
        .map(|t| SpikeTensor::from_trains(t, &grid))
        .collect();
    let field = simple_probability(&tensors).unwrap();

    let scores = evaluator.scores(&field, root).unwrap();
    assert_eq!(scores.len(), 12);
    assert!(scores.iter().all(|s| s.is_finite() && *s >= 0.0));

    let fit = evaluator.evaluate(&field, root).unwrap();
    assert!(fit.is_finite());
    assert!((0.0..=100.0).contains(&fit));
}

#[test]
fn batch_covers_every_note_once() {
    let periphery = small_periphery();
    let grid = TimeGrid::new(1e-3, 0.25).unwrap();
    let evaluator = Evaluator::new(&periphery, grid, Metric::EarthMovers);

    let roots: Vec<Note> = (48..60).map(|s| Note::from_semitone(s).unwrap()).collect();
    let mut fits = evaluate_batch(&evaluator, &roots, 3);
    assert_eq!(fits.len(), roots.len());
    fits.sort_by(|a, b| a.0.cmp(&b.0));
    let returned: Vec<Note> = fits.iter().map(|(n, _)| *n).collect();
    assert_eq!(returned, roots);
    assert!(fits.iter().all(|(_, f)| f.is_finite()));
}

#[test]
fn batch_results_match_sequential_evaluation() {
    let periphery = small_periphery();
    let grid = TimeGrid::new(1e-3, 0.25).unwrap();
    let evaluator = Evaluator::new(&periphery, grid, Metric::JensenShannon);

    let roots: Vec<Note> = (48..52).map(|s| Note::from_semitone(s).unwrap()).collect();
    let mut parallel = evaluate_batch(&evaluator, &roots, 4);
    parallel.sort_by(|a, b| a.0.cmp(&b.0));

    for (note, fit) in parallel {
        let sequential = evaluator.evaluate_root(note).unwrap();
        assert_eq!(fit, sequential, "{note}");
    }
}
