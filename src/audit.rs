//! Append-only audit log of completed moves.
//!
//! Each successful live move produces one plain-text line:
//!
//! ```text
//! 2024-05-01 14:03:07,512 - INFO - Moved /home/me/Downloads/a.png to /home/me/Pictures/a.png
//! ```
//!
//! Entries are never rewritten or deleted. The file is only created when the
//! first record is written.

use crate::file_organizer::Operation;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Timestamp layout of an audit line (local time, millisecond precision).
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Handle to the audit log file.
#[derive(Debug, Clone)]
pub struct AuditLog {
    path: PathBuf,
}

impl AuditLog {
    /// Creates a handle without touching the filesystem.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one record for a completed move.
    pub fn record(&self, operation: &Operation) -> std::io::Result<()> {
        let line = Self::format_line(operation, chrono::Local::now());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)
    }

    fn format_line<Tz>(operation: &Operation, at: chrono::DateTime<Tz>) -> String
    where
        Tz: chrono::TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "{} - INFO - Moved {} to {}",
            at.format(TIMESTAMP_FORMAT),
            operation.original_path.display(),
            operation.new_path.display()
        )
    }
}
