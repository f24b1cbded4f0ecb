// remote module: transports and the shared batch transfer engine
mod batch;
mod fs;
mod s3;
mod store;

pub use batch::push_batch;
pub use fs::FsRemote;
pub use s3::S3Remote;
pub use store::ObjectStore;

use anyhow::Result;

use crate::error::TransferError;
use crate::task_list::Pair;

/// One destination's batch: the pairs to move and the worker bound.
pub struct RemoteTask {
    pub pairs: Vec<Pair>,
    pub concurrency: usize,
}

/// Terminal outcomes for one batch. Every pair lands in exactly one of
/// succeeded / skipped / failed; the batch call does not return before all
/// pairs are terminal.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub succeeded: u64,
    pub bytes: u64,
    pub skipped: Vec<(Pair, TransferError)>,
    pub failed: Vec<(Pair, TransferError)>,
}

impl BatchReport {
    pub fn attempted(&self) -> u64 {
        self.succeeded + self.skipped.len() as u64 + self.failed.len() as u64
    }

    /// Skips and failures both count against the destination's push.
    pub fn failure_count(&self) -> usize {
        self.skipped.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.failure_count() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &(Pair, TransferError)> {
        self.skipped.iter().chain(self.failed.iter())
    }
}

/// Capability the dispatcher is polymorphic over: push a batch of pairs
/// with a given concurrency. New destination schemes implement this trait;
/// the engine never branches on the transport kind.
pub trait Remote {
    /// Attempt every pair exactly once and report per-pair outcomes.
    /// `Err` is reserved for setup problems that prevent the batch from
    /// running at all.
    fn push(&self, task: RemoteTask) -> Result<BatchReport>;
}
