/// Repository-wide structured errors for the push pipeline.
///
/// `ConfigError` covers everything that must stop the run before any byte
/// moves; `TransferError` covers per-pair outcomes that are recorded and
/// never abort sibling workers.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// Destination URL could not be parsed; url and reason
    InvalidRemoteUrl(String, String),
    /// Destination scheme has no registered transport; scheme and url
    UnsupportedScheme(String, String),
    /// A configured local path does not exist
    LocalPathMissing(String),
    /// A configured local path exists but could not be inspected
    LocalStatFailed(String, String),
    NoLocals,
    NoRemotes,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ConfigError::*;
        match self {
            InvalidRemoteUrl(url, why) => {
                write!(f, "invalid destination url '{}': {}", url, why)
            }
            UnsupportedScheme(scheme, url) => {
                write!(f, "unsupported destination scheme '{}' in '{}'", scheme, url)
            }
            LocalPathMissing(p) => write!(f, "local path does not exist: {}", p),
            LocalStatFailed(p, msg) => write!(f, "failed to stat local path {}: {}", p, msg),
            NoLocals => write!(f, "no local paths given"),
            NoRemotes => write!(f, "no destinations given"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Per-pair transfer errors. A worker records one of these for the pair and
/// moves on to the next item in the queue.
#[derive(Debug, Clone)]
pub enum TransferError {
    /// Local file vanished between task-list build and transfer
    NotFound(String),
    /// Local file exists but has zero length
    EmptyFile(String),
    /// Stat failed for a reason other than the file being absent
    Stat(String, String),
    /// Local file could not be opened for reading
    Open(String, String),
    /// Transport put failed; destination key and underlying cause
    Upload(String, String),
}

impl std::fmt::Display for TransferError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use TransferError::*;
        match self {
            NotFound(p) => write!(f, "local file does not exist: {}", p),
            EmptyFile(p) => write!(f, "local file is empty: {}", p),
            Stat(p, msg) => write!(f, "failed to stat {}: {}", p, msg),
            Open(p, msg) => write!(f, "failed to open {}: {}", p, msg),
            Upload(key, msg) => write!(f, "upload failed for key '{}': {}", key, msg),
        }
    }
}

impl std::error::Error for TransferError {}

impl TransferError {
    /// Whether this outcome is a skip (pair left alone, nothing was sent)
    /// rather than a transport fault. Both still mark the batch as failed.
    pub fn is_skip(&self) -> bool {
        matches!(self, TransferError::NotFound(_) | TransferError::EmptyFile(_))
    }

    /// Stable machine-readable tag used in the JSONL failure output.
    pub fn kind(&self) -> &'static str {
        use TransferError::*;
        match self {
            NotFound(_) => "not_found",
            EmptyFile(_) => "empty_file",
            Stat(_, _) => "stat",
            Open(_, _) => "open",
            Upload(_, _) => "upload",
        }
    }
}
