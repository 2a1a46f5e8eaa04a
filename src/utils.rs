//! Utility functions for log formatting and file system setup.

use std::io;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes, backing off to the nearest
/// character boundary, with an ellipsis and the dropped byte count appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Ensure a directory exists, creating it and any parents if needed.
///
/// Calling this on an existing directory is a no-op.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_dir(path: &Path) -> io::Result<()> {
    fs::create_dir_all(path).await?;
    info!("Output directory ready");
    Ok(())
}
