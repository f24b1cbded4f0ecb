use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;
use walkdir::WalkDir;

use crate::config::Config;
use crate::error::ConfigError;
use crate::parse::parse_remote_url;

/// One file to move: a local path and the slash-separated key it lands
/// under at the destination. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pair {
    pub local: PathBuf,
    pub key: String,
}

/// Destination URL -> ordered pairs. Built once from a [`Config`], consumed
/// once by the dispatcher. BTreeMap keeps dispatch order deterministic.
#[derive(Debug, Default)]
pub struct TaskList {
    pub tasks: BTreeMap<String, Vec<Pair>>,
}

impl TaskList {
    fn add(&mut self, remote: &str, key: String, local: PathBuf) {
        self.tasks.entry(remote.to_string()).or_default().push(Pair { local, key });
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.values().all(|pairs| pairs.is_empty())
    }

    pub fn pair_count(&self) -> usize {
        self.tasks.values().map(|pairs| pairs.len()).sum()
    }

    /// Walk every local path for every destination and produce the full
    /// task list. Any unparsable destination URL or missing local path is
    /// fatal: a partially built list could silently under-transfer, so
    /// nothing is returned in that case.
    pub fn build(config: &Config) -> Result<TaskList> {
        config.validate()?;
        let mut list = TaskList::default();
        for remote in &config.remotes {
            let url = parse_remote_url(remote)?;
            for local in &config.locals {
                let p = Path::new(local);
                let meta = std::fs::metadata(p).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::NotFound {
                        ConfigError::LocalPathMissing(local.clone())
                    } else {
                        ConfigError::LocalStatFailed(local.clone(), e.to_string())
                    }
                })?;
                if meta.is_dir() {
                    collect_dir_pairs(p, remote, &url.prefix, &mut list)?;
                } else {
                    let name = p
                        .file_name()
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| local.clone());
                    list.add(remote, join_key(&url.prefix, &name), p.to_path_buf());
                }
            }
        }
        tracing::debug!(destinations = list.tasks.len(), pairs = list.pair_count(), "task list built");
        Ok(list)
    }
}

// Recursively enumerate regular files under `root`. Directory entries and
// symlinks are not transfer pairs. Sorted by file name so the same tree
// always yields the same ordering.
fn collect_dir_pairs(
    root: &Path,
    remote: &str,
    prefix: &str,
    list: &mut TaskList,
) -> Result<(), ConfigError> {
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            ConfigError::LocalStatFailed(root.display().to_string(), e.to_string())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
        let key = join_key(prefix, &rel.to_string_lossy());
        list.add(remote, key, entry.path().to_path_buf());
    }
    Ok(())
}

/// Join a destination prefix and a relative path into a key: always
/// slash-separated regardless of host platform, never starting with '/'.
pub(crate) fn join_key(prefix: &str, rel: &str) -> String {
    let rel = rel.replace('\\', "/");
    let rel = rel.trim_start_matches('/');
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() { rel.to_string() } else { format!("{}/{}", prefix, rel) }
}
