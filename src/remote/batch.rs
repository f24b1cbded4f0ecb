use std::io::IsTerminal;
use std::sync::atomic::{AtomicU64, Ordering};

use crossbeam_channel::unbounded;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

use super::BatchReport;
use super::store::{ObjectStore, content_type_for};
use crate::error::TransferError;
use crate::task_list::Pair;

enum Outcome {
    Skipped(Pair, TransferError),
    Failed(Pair, TransferError),
}

/// Execute one destination's batch against `store` with at most
/// `concurrency` workers, isolating per-pair failures.
///
/// All pairs are loaded into a shared queue up front and the sender is
/// dropped, so workers drain until the channel disconnects; no item is
/// delivered twice and none is dropped. Completion is the thread-scope
/// join, never an occupancy check on a channel buffer. Outcomes flow
/// through an accumulator channel owned by this call and scoped to it.
pub fn push_batch(store: &dyn ObjectStore, pairs: &[Pair], concurrency: usize) -> BatchReport {
    if pairs.is_empty() {
        return BatchReport::default();
    }
    // Idle workers are pointless; a zero bound still gets one worker.
    let workers = concurrency.max(1).min(pairs.len());

    let (tx, rx) = unbounded::<Pair>();
    for pair in pairs {
        let _ = tx.send(pair.clone());
    }
    drop(tx);

    let (out_tx, out_rx) = unbounded::<Outcome>();
    let succeeded = AtomicU64::new(0);
    let bytes = AtomicU64::new(0);

    // No bar when progress is switched off (json mode) or stderr is not a
    // terminal; the counters still advance, nothing is drawn.
    let draw_target = if crate::util::progress_enabled() && std::io::stderr().is_terminal() {
        ProgressDrawTarget::stderr()
    } else {
        ProgressDrawTarget::hidden()
    };
    let total_pb = ProgressBar::with_draw_target(Some(pairs.len() as u64), draw_target);
    total_pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .expect("valid progress template")
        .progress_chars("=> "),
    );

    std::thread::scope(|s| {
        for worker_id in 0..workers {
            let rx = rx.clone();
            let out_tx = out_tx.clone();
            let succeeded = &succeeded;
            let bytes = &bytes;
            let total_pb = total_pb.clone();
            s.spawn(move || {
                while let Ok(pair) = rx.recv() {
                    match transfer_one(store, &pair) {
                        Ok(n) => {
                            succeeded.fetch_add(1, Ordering::SeqCst);
                            bytes.fetch_add(n, Ordering::SeqCst);
                            tracing::debug!(
                                worker_id,
                                key = %pair.key,
                                "uploaded {}",
                                pair.local.display()
                            );
                        }
                        Err(e) if e.is_skip() => {
                            tracing::warn!(worker_id, key = %pair.key, "skipped: {}", e);
                            let _ = out_tx.send(Outcome::Skipped(pair, e));
                        }
                        Err(e) => {
                            tracing::warn!(worker_id, key = %pair.key, "failed: {}", e);
                            let _ = out_tx.send(Outcome::Failed(pair, e));
                        }
                    }
                    total_pb.inc(1);
                }
            });
        }
    });
    // scope exit is the join barrier: every pair is terminal here
    drop(out_tx);
    total_pb.finish_and_clear();

    let mut report = BatchReport {
        succeeded: succeeded.load(Ordering::SeqCst),
        bytes: bytes.load(Ordering::SeqCst),
        ..BatchReport::default()
    };
    for outcome in out_rx {
        match outcome {
            Outcome::Skipped(pair, e) => report.skipped.push((pair, e)),
            Outcome::Failed(pair, e) => report.failed.push((pair, e)),
        }
    }
    report
}

// Pending -> Succeeded | Skipped(reason) | Failed(cause), one attempt per
// pair. Retry policy, if any, lives inside the transport client.
fn transfer_one(store: &dyn ObjectStore, pair: &Pair) -> Result<u64, TransferError> {
    let local = pair.local.display().to_string();
    let meta = match std::fs::metadata(&pair.local) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(TransferError::NotFound(local));
        }
        Err(e) => return Err(TransferError::Stat(local, e.to_string())),
    };
    if meta.len() == 0 {
        return Err(TransferError::EmptyFile(local));
    }
    let mut file = std::fs::File::open(&pair.local)
        .map_err(|e| TransferError::Open(local, e.to_string()))?;
    store.put(&pair.key, &mut file, content_type_for(&pair.local))?;
    Ok(meta.len())
}
