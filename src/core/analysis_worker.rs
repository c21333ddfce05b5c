use crossbeam_channel::{Receiver, Sender, bounded};
use tracing::{debug, warn};

use crate::core::evaluate::{Evaluator, SpikeSource};
use crate::core::musical::Note;

/// Result payload from an evaluation worker: `(root_note, fit_percent)`.
pub type FitResult = (Note, f64);

/// Evaluation worker: receives root notes, runs the full per-note pipeline
/// (trial tensors → probability field → consonance fit), and publishes the
/// result. Notes are independent; no ordering is required between them.
pub fn run<S: SpikeSource>(
    evaluator: &Evaluator<'_, S>,
    note_rx: Receiver<Note>,
    result_tx: Sender<FitResult>,
) {
    while let Ok(note) = note_rx.recv() {
        match evaluator.evaluate_root(note) {
            Ok(fit) => {
                debug!(%note, fit, "evaluated root");
                let _ = result_tx.send((note, fit));
            }
            Err(err) => warn!(%note, %err, "evaluation failed; skipping note"),
        }
    }
}

/// Evaluate a batch of root notes across `workers` threads.
///
/// Failed notes are logged and omitted from the result; order follows
/// completion, not input.
pub fn evaluate_batch<S: SpikeSource + Sync>(
    evaluator: &Evaluator<'_, S>,
    notes: &[Note],
    workers: usize,
) -> Vec<FitResult> {
    let workers = workers.clamp(1, notes.len().max(1));
    let (note_tx, note_rx) = bounded::<Note>(notes.len().max(1));
    let (result_tx, result_rx) = bounded::<FitResult>(notes.len().max(1));

    for &note in notes {
        let _ = note_tx.send(note);
    }
    drop(note_tx);

    std::thread::scope(|scope| {
        for _ in 0..workers {
            let note_rx = note_rx.clone();
            let result_tx = result_tx.clone();
            scope.spawn(move || run(evaluator, note_rx, result_tx));
        }
        drop(result_tx);
    });

    result_rx.into_iter().collect()
}
