//! Filtered rewrite of the record log.
//!
//! Splits the log into kept and removed lines, then replaces the file through
//! a temporary sibling so readers only ever see the old or the new contents.

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

use crate::config::MalformedLinePolicy;

/// Result of filtering one log snapshot.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct FilteredLog {
    /// Surviving lines, newline-terminated, in original order
    pub body: String,
    pub kept: usize,
    pub removed: usize,
    pub dropped_malformed: usize,
}

/// Drops every record whose `ip` equals `address`.
///
/// Lines that are not JSON follow `policy`. Blank lines carry no record and
/// are always discarded. Lines that are JSON but have no string `ip` are kept.
pub(crate) fn filter_lines(contents: &str, address: &str, policy: MalformedLinePolicy) -> FilteredLog {
    let mut filtered = FilteredLog::default();

    for line in contents.lines() {
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(line) {
            Ok(record) if record_address(&record) == Some(address) => {
                filtered.removed += 1;
            }
            Ok(_) => push_line(&mut filtered, line),
            Err(e) => match policy {
                MalformedLinePolicy::Drop => {
                    log::debug!("Dropping unparseable log line: {}", e);
                    filtered.dropped_malformed += 1;
                }
                MalformedLinePolicy::Keep => push_line(&mut filtered, line),
            },
        }
    }

    filtered
}

fn record_address(record: &Value) -> Option<&str> {
    record.get("ip").and_then(Value::as_str)
}

fn push_line(filtered: &mut FilteredLog, line: &str) {
    filtered.body.push_str(line);
    filtered.body.push('\n');
    filtered.kept += 1;
}

/// Atomically replaces `path` with `contents`.
///
/// The temporary file lives in the same directory so the final rename never
/// crosses filesystems. If anything fails before the rename, the original
/// file is untouched and the temporary file is removed on drop.
pub(crate) fn replace_file(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    if let Ok(metadata) = std::fs::metadata(path) {
        tmp.as_file().set_permissions(metadata.permissions())?;
    }
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
