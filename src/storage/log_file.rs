//! Append-only JSON Lines log with address-filtered deletion.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use log::{debug, error, info};
use serde::Serialize;
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use super::rewrite::{filter_lines, replace_file, FilteredLog};
use crate::config::MalformedLinePolicy;
use crate::error_handling::StoreError;

/// What a delete pass did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// No log file exists yet; nothing was read or written.
    Missing,
    /// The log was rewritten without the matching records.
    Rewritten {
        removed: usize,
        kept: usize,
        dropped_malformed: usize,
    },
}

/// Durable visitor log.
///
/// Each record occupies exactly one line. Appends and the delete rewrite are
/// serialized through one mutex, so an append can never land between a
/// delete's read and its write-back within this process.
#[derive(Debug)]
pub struct RecordStore {
    path: PathBuf,
    malformed: MalformedLinePolicy,
    write_lock: Mutex<()>,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>, malformed: MalformedLinePolicy) -> Self {
        Self {
            path: path.into(),
            malformed,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends a record, logging instead of returning any failure.
    ///
    /// Logging is best-effort: a visitor-facing request must not fail because
    /// the log could not be written.
    pub async fn append<T: Serialize>(&self, record: &T) {
        if let Err(e) = self.try_append(record).await {
            error!("Failed to write record to {}: {}", self.path.display(), e);
        }
    }

    /// Appends a pre-serialized line, logging instead of returning any failure.
    pub async fn append_line(&self, line: &str) {
        if let Err(e) = self.try_append_line(line).await {
            error!("Failed to write record to {}: {}", self.path.display(), e);
        }
    }

    /// Serializes `record` as one JSON line and appends it.
    pub async fn try_append<T: Serialize>(&self, record: &T) -> Result<(), StoreError> {
        let line = serde_json::to_string(record)?;
        self.try_append_line(&line).await
    }

    /// Appends `line` plus a newline, creating the parent directory if needed.
    ///
    /// `line` must not contain a newline; JSON produced by `serde_json` never
    /// does.
    pub async fn try_append_line(&self, line: &str) -> Result<(), StoreError> {
        let mut buf = String::with_capacity(line.len() + 1);
        buf.push_str(line);
        buf.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        // Single write call so the whole line lands in one append.
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Removes every record whose `ip` equals `address`.
    ///
    /// Returns `true` when the log was rewritten, `false` when there was no
    /// log or the rewrite failed (the failure is logged).
    pub async fn delete_by_address(&self, address: &str) -> bool {
        match self.try_delete_by_address(address).await {
            Ok(DeleteOutcome::Rewritten { .. }) => true,
            Ok(DeleteOutcome::Missing) => false,
            Err(e) => {
                error!(
                    "Failed to delete records for {} from {}: {}",
                    address,
                    self.path.display(),
                    e
                );
                false
            }
        }
    }

    /// Typed variant of `delete_by_address`.
    ///
    /// The rewrite goes through a temporary file and a rename; on error the
    /// original log is left as it was.
    pub async fn try_delete_by_address(&self, address: &str) -> Result<DeleteOutcome, StoreError> {
        let _guard = self.write_lock.lock().await;

        let contents = match fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No record log at {}, nothing to delete", self.path.display());
                return Ok(DeleteOutcome::Missing);
            }
            Err(e) => return Err(e.into()),
        };

        let FilteredLog {
            body,
            kept,
            removed,
            dropped_malformed,
        } = filter_lines(&contents, address, self.malformed);

        let path = self.path.clone();
        tokio::task::spawn_blocking(move || replace_file(&path, body.as_bytes())).await??;

        info!(
            "Deleted {} record(s) for {} ({} kept, {} malformed dropped)",
            removed, address, kept, dropped_malformed
        );
        Ok(DeleteOutcome::Rewritten {
            removed,
            kept,
            dropped_malformed,
        })
    }
}
