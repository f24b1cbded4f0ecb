use std::io::Read;
use std::path::Path;

use crate::error::TransferError;

/// The put seam the batch engine drives. Implementations own their own
/// retry, timeout and backoff policy; the engine treats a put as an opaque
/// call that either lands the whole object or fails.
pub trait ObjectStore: Send + Sync {
    fn put(&self, key: &str, body: &mut dyn Read, content_type: &str) -> Result<(), TransferError>;
}

// Content type from the file extension; transports that cannot carry a
// content type are free to ignore the hint.
pub(crate) fn content_type_for(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase());
    match ext.as_deref() {
        Some("txt" | "log" | "md") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("css") => "text/css",
        Some("csv") => "text/csv",
        Some("js" | "mjs") => "text/javascript",
        Some("json") => "application/json",
        Some("xml") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("wasm") => "application/wasm",
        Some("zip") => "application/zip",
        Some("gz") => "application/gzip",
        Some("tar") => "application/x-tar",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",
        _ => "application/octet-stream",
    }
}
