use std::time::Instant;

use anyhow::{Result, bail};

use crate::error::ConfigError;
use crate::parse::parse_remote_url;
use crate::remote::{FsRemote, Remote, RemoteTask, S3Remote};
use crate::task_list::TaskList;

/// Dispatcher: resolves a transport per destination from the URL scheme and
/// pushes each destination's batch sequentially. Batches run best-effort;
/// if any pair anywhere failed, one operation-level error summarizing the
/// per-destination failure counts is raised at the end.
pub struct Pusher {
    task_list: TaskList,
}

impl Pusher {
    pub fn new(task_list: TaskList) -> Self {
        Self { task_list }
    }

    fn resolve_remote(dest: &str) -> Result<Box<dyn Remote>> {
        let url = parse_remote_url(dest)?;
        match url.scheme.as_str() {
            "s3" => {
                if url.bucket.is_empty() {
                    return Err(ConfigError::InvalidRemoteUrl(
                        dest.to_string(),
                        "s3 destination needs a bucket host".to_string(),
                    )
                    .into());
                }
                Ok(Box::new(S3Remote::new(&url.bucket)?))
            }
            "file" => {
                if !url.bucket.is_empty() {
                    return Err(ConfigError::InvalidRemoteUrl(
                        dest.to_string(),
                        "file destinations must use file:///absolute/path".to_string(),
                    )
                    .into());
                }
                // keys already carry the url path as their prefix
                Ok(Box::new(FsRemote::new("/")))
            }
            other => {
                Err(ConfigError::UnsupportedScheme(other.to_string(), dest.to_string()).into())
            }
        }
    }

    /// Push every destination's batch. `concurrency` overrides the
    /// per-batch auto heuristic when given; zero is treated as one worker.
    pub fn push(&self, concurrency: Option<usize>, json: bool) -> Result<()> {
        if json {
            crate::util::set_progress_enabled(false);
        }
        // Resolve every transport before moving any bytes so a bad
        // destination aborts while the run is still a no-op.
        let mut batches = Vec::new();
        for (dest, pairs) in &self.task_list.tasks {
            batches.push((dest, pairs, Self::resolve_remote(dest)?));
        }

        let mut failed_dests: Vec<(String, usize)> = Vec::new();
        for (dest, pairs, remote) in batches {
            let workers = concurrency
                .unwrap_or_else(|| crate::auto_concurrency::choose_workers(pairs.len()));
            tracing::info!(destination = %dest, pairs = pairs.len(), workers, "pushing batch");
            let start = Instant::now();
            let report = remote.push(RemoteTask { pairs: pairs.clone(), concurrency: workers })?;
            let elapsed = start.elapsed().as_secs_f64();
            crate::util::print_summary(dest, &report, elapsed);
            if json {
                crate::util::print_summary_json(dest, &report, elapsed);
            }
            if !report.is_clean() {
                if let Some(p) = crate::util::write_failures_jsonl(dest, &report) {
                    println!("failure detail written to: {}", p.display());
                }
                failed_dests.push((dest.clone(), report.failure_count()));
            }
        }

        if !failed_dests.is_empty() {
            let detail = failed_dests
                .iter()
                .map(|(dest, n)| format!("{} ({} failed)", dest, n))
                .collect::<Vec<_>>()
                .join(", ");
            bail!("push completed with failures: {}", detail);
        }
        Ok(())
    }
}
