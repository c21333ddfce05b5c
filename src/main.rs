// Entry point: batch consonance evaluation over synthetic trial sets.
use std::error::Error;

use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use neurochord::config::AppConfig;
use neurochord::core::analysis_worker::evaluate_batch;
use neurochord::core::concurrency::concurrency_profiles;
use neurochord::core::evaluate::{Evaluator, SpikeSource, fit_percent, predicted_probabilities};
use neurochord::core::musical::{self, Note};
use neurochord::core::probability::{simple_probability, snapshot};
use neurochord::core::spike_tensor::SpikeTensor;
use neurochord::sim::poisson::PoissonPeriphery;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Root note to evaluate
    #[arg(long, default_value = "C4")]
    root: String,

    /// Config file path (created with defaults if missing)
    #[arg(long, default_value = "neurochord.toml")]
    config: String,

    /// Evaluate every chromatic root in the root's octave
    #[arg(long)]
    scale: bool,

    /// Worker threads for --scale
    #[arg(long, default_value_t = 4)]
    workers: usize,

    /// Override the configured channel count (keeps demo runs small)
    #[arg(long)]
    num_cf: Option<usize>,

    /// Mean surrogate fiber rate in spikes/s
    #[arg(long, default_value_t = 120.0)]
    rate: f64,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = AppConfig::load_or_default(&args.config);
    if let Some(num_cf) = args.num_cf {
        cfg.sim.num_cf = num_cf;
    }

    let root: Note = args.root.parse()?;
    let grid = cfg.analysis.grid()?;
    let periphery = PoissonPeriphery::new(cfg.sim, cfg.analysis.duration_s, args.rate);
    let evaluator = Evaluator::new(&periphery, grid, cfg.eval.metric);

    info!(
        %root,
        num_cf = cfg.sim.num_cf,
        trials = cfg.sim.num_trials,
        metric = ?cfg.eval.metric,
        "starting evaluation"
    );

    if args.scale {
        let base = root.semitone() - root.semitone() % 12;
        let roots: Vec<Note> = (0..12)
            .map(|pc| musical::Note::from_semitone(base + pc))
            .collect::<Result<_, _>>()?;
        let mut fits = evaluate_batch(&evaluator, &roots, args.workers);
        fits.sort_by(|a, b| a.0.cmp(&b.0));
        println!("note   fit");
        for (note, fit) in fits {
            println!("{:<6} {fit:>5.0}", note.to_string());
        }
        return Ok(());
    }

    let trials = periphery.trial_spikes(root)?;
    let tensors: Vec<SpikeTensor> = trials
        .iter()
        .map(|t| SpikeTensor::from_trains(t, &grid))
        .collect();
    let field = simple_probability(&tensors)?;

    let profiles = concurrency_profiles(&trials[0], &cfg.analysis.concurrency);
    debug!(channel0 = ?profiles.first(), "concurrency profile");
    let snap = snapshot(&tensors[0], &field, cfg.analysis.snap_size)?;
    debug!(?snap, "probability snapshot around first-trial spikes");

    let scores = evaluator.scores(&field, root)?;
    let predicted = predicted_probabilities(&scores)?;
    let empirical = musical::empirical_probabilities();

    let ordered_notes = musical::consonance_ordered_notes(root);
    println!("interval  note   score    predicted  empirical");
    for (i, interval) in musical::CONSONANCE_ORDER.iter().enumerate() {
        let note = ordered_notes[i];
        println!(
            "{:<9} {:<6} {:<8.4} {:<10.4} {:.4}",
            interval.label(),
            note.to_string(),
            scores[i],
            predicted[i],
            empirical[i]
        );
    }

    let fit = fit_percent(cfg.eval.metric, &predicted, &empirical)?;
    println!("\nconsonance fit for {root}: {fit:.0}");
    Ok(())
}
