use std::io::Read;
use std::path::PathBuf;

use anyhow::Result;

use super::batch::push_batch;
use super::store::ObjectStore;
use super::{BatchReport, Remote, RemoteTask};
use crate::error::TransferError;

/// Local-directory transport for `file://` destinations. Keys become
/// paths under the root, so it doubles as the drop-in substitute used to
/// exercise the engine without a network.
pub struct FsRemote {
    root: PathBuf,
}

impl FsRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ObjectStore for FsRemote {
    fn put(&self, key: &str, body: &mut dyn Read, _content_type: &str) -> Result<(), TransferError> {
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                TransferError::Upload(
                    key.to_string(),
                    format!("creating {}: {}", parent.display(), e),
                )
            })?;
        }
        let mut out = std::fs::File::create(&dest).map_err(|e| {
            TransferError::Upload(key.to_string(), format!("creating {}: {}", dest.display(), e))
        })?;
        std::io::copy(body, &mut out).map_err(|e| {
            TransferError::Upload(key.to_string(), format!("writing {}: {}", dest.display(), e))
        })?;
        Ok(())
    }
}

impl Remote for FsRemote {
    fn push(&self, task: RemoteTask) -> Result<BatchReport> {
        Ok(push_batch(self, &task.pairs, task.concurrency))
    }
}
