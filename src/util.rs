use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Utc;
use owo_colors::OwoColorize;

use crate::remote::BatchReport;

// Process-wide progress-drawing toggle. Machine-readable output modes
// turn it off so progress frames never interleave with JSON lines.
static PROGRESS_ENABLED: AtomicBool = AtomicBool::new(true);

pub fn set_progress_enabled(enabled: bool) {
    PROGRESS_ENABLED.store(enabled, Ordering::SeqCst);
}

pub fn progress_enabled() -> bool {
    PROGRESS_ENABLED.load(Ordering::SeqCst)
}

/// Convert a byte count into a human readable string using IEC units.
pub fn human_bytes(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    let b = bytes as f64;
    if b >= GB {
        format!("{:.2} GiB", b / GB)
    } else if b >= MB {
        format!("{:.2} MiB", b / MB)
    } else if b >= KB {
        format!("{:.2} KiB", b / KB)
    } else {
        format!("{} B", bytes)
    }
}

/// Print a concise per-destination summary line after a batch completes.
pub fn print_summary(dest: &str, report: &BatchReport, elapsed_secs: f64) {
    let rate = if elapsed_secs > 0.0 {
        report.bytes as f64 / 1024.0 / 1024.0 / elapsed_secs
    } else {
        0.0
    };
    let counts = format!(
        "{} uploaded, {} skipped, {} failed",
        report.succeeded,
        report.skipped.len(),
        report.failed.len()
    );
    let counts = if report.is_clean() {
        counts.green().to_string()
    } else {
        counts.red().to_string()
    };
    println!(
        "{}: {} | {} in {:.2}s ({:.2} MB/s)",
        dest,
        counts,
        human_bytes(report.bytes),
        elapsed_secs,
        rate
    );
}

/// Emit a single-line JSON summary for machine consumption. Does not
/// replace the human summary.
pub fn print_summary_json(dest: &str, report: &BatchReport, elapsed_secs: f64) {
    let obj = serde_json::json!({
        "destination": dest,
        "attempted": report.attempted(),
        "succeeded": report.succeeded,
        "skipped": report.skipped.len(),
        "failed": report.failed.len(),
        "bytes": report.bytes,
        "elapsed_secs": elapsed_secs,
    });
    if let Ok(line) = serde_json::to_string(&obj) {
        println!("{}", line);
    }
}

/// Write one JSON line per skipped/failed pair into the canonical logs
/// directory (`~/.opush/logs`). Returns the path written, or None when the
/// logs directory is unavailable. Individual causes live here and in the
/// logs, never in the operation-level error value.
pub fn write_failures_jsonl(dest: &str, report: &BatchReport) -> Option<PathBuf> {
    let logs_dir = dirs::home_dir()?.join(".opush").join("logs");
    std::fs::create_dir_all(&logs_dir).ok()?;
    let path = logs_dir.join(format!("failures_{}.jsonl", Utc::now().format("%Y%m%dT%H%M%S%fZ")));
    let mut f = OpenOptions::new().create(true).append(true).open(&path).ok()?;
    for (pair, err) in report.failures() {
        let obj = serde_json::json!({
            "destination": dest,
            "kind": err.kind(),
            "pair": pair,
            "message": err.to_string(),
        });
        if let Ok(line) = serde_json::to_string(&obj) {
            let _ = writeln!(f, "{}", line);
        }
    }
    Some(path)
}
