//! File organization: moving files from the source directory into their
//! category destination folders.
//!
//! This module walks the source directory once, classifies every regular file
//! by extension, picks a collision-free name in the destination folder, and
//! either moves the file (recording it in the audit log) or reports what it
//! would do in dry-run mode.

use crate::audit::AuditLog;
use crate::config::Settings;
use crate::output::OutputFormatter;
use std::collections::BTreeMap;
use std::ffi::{OsStr, OsString};
use std::fs::{self, DirEntry};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A single file move, either performed or planned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// The path of the file in the source directory.
    pub original_path: PathBuf,
    /// The collision-free destination path.
    pub new_path: PathBuf,
    /// The category the file was classified into.
    pub category: String,
}

/// Errors that can occur during file organization.
#[derive(Debug, Error)]
pub enum OrganizeError {
    /// The source directory does not exist. Nothing was moved.
    #[error("Source folder not found: {}", path.display())]
    MissingSourceDirectory { path: PathBuf },
    /// The source directory exists but could not be listed.
    #[error("Failed to read source folder {}: {source}", path.display())]
    ReadSourceDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to create a destination directory.
    #[error("Failed to create directory {}: {source}", path.display())]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// Failed to move a file to its destination.
    #[error("Failed to move {} to {}: {source}", from.display(), to.display())]
    FileMoveFailure {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: io::Error,
    },
    /// The file was moved but the audit record could not be written.
    #[error("Moved {} but failed to write audit log {}: {source}", moved.display(), log.display())]
    AuditWriteFailed {
        moved: PathBuf,
        log: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, OrganizeError>;

/// Whether a pass mutates the filesystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Move files and write audit records.
    Live,
    /// Report intended moves without touching the filesystem.
    DryRun,
}

/// Outcome of one organize pass.
#[derive(Debug)]
pub struct OrganizeReport {
    /// The mode the pass ran in.
    pub mode: RunMode,
    /// Moves performed in live mode.
    pub moved: Vec<Operation>,
    /// Moves that would be performed, in dry-run mode.
    pub planned: Vec<Operation>,
    /// Files whose extension no category claims.
    pub unclassified: Vec<PathBuf>,
    /// Files whose category has no destination folder, with the category.
    pub no_destination: Vec<(PathBuf, String)>,
    /// Files that could not be organized.
    pub failures: Vec<(PathBuf, OrganizeError)>,
}

impl OrganizeReport {
    /// Creates an empty report for a pass in the given mode.
    pub fn new(mode: RunMode) -> Self {
        Self {
            mode,
            moved: Vec::new(),
            planned: Vec::new(),
            unclassified: Vec::new(),
            no_destination: Vec::new(),
            failures: Vec::new(),
        }
    }

    /// Moves performed in a live pass, or planned in a dry run.
    pub fn operations(&self) -> &[Operation] {
        match self.mode {
            RunMode::Live => &self.moved,
            RunMode::DryRun => &self.planned,
        }
    }

    /// Number of operations per category.
    pub fn category_counts(&self) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for op in self.operations() {
            *counts.entry(op.category.clone()).or_insert(0) += 1;
        }
        counts
    }

    /// Returns true if every classified file was handled.
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Returns a file name that does not exist yet in `dest_dir`.
///
/// If `file_name` is taken, tries `stem(1).ext`, `stem(2).ext`, ... until a
/// free name is found. The name is handled as an `OsStr`, so bytes that are
/// not valid UTF-8 survive unchanged. The check is not atomic with the move
/// that follows.
///
/// # Examples
///
/// ```no_run
/// use sortdl::file_organizer::resolve_duplicate;
/// use std::ffi::OsStr;
/// use std::path::Path;
///
/// // With "report.pdf" already in ~/Documents, this yields "report(1).pdf".
/// let name = resolve_duplicate(Path::new("/home/me/Documents"), OsStr::new("report.pdf"));
/// ```
pub fn resolve_duplicate(dest_dir: &Path, file_name: &OsStr) -> OsString {
    if !dest_dir.join(file_name).exists() {
        return file_name.to_os_string();
    }

    let as_path = Path::new(file_name);
    let stem = as_path.file_stem().unwrap_or(file_name);
    let ext = as_path.extension();

    let mut counter: u64 = 1;
    loop {
        let mut candidate = stem.to_os_string();
        candidate.push(format!("({})", counter));
        if let Some(ext) = ext {
            candidate.push(".");
            candidate.push(ext);
        }
        if !dest_dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Moves a file, falling back to copy and remove across filesystems.
pub fn move_file(from: &Path, to: &Path) -> io::Result<()> {
    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying");
            copy_then_remove(from, to)
        }
        Err(e) => Err(e),
    }
}

/// Copies `from` to `to`, then removes `from`.
///
/// Not atomic: the source is only removed once the copy succeeded, so a
/// failed copy leaves it in place, while a failed removal leaves both files.
fn copy_then_remove(from: &Path, to: &Path) -> io::Result<()> {
    fs::copy(from, to)?;
    fs::remove_file(from)
}

/// Organizes the source directory according to borrowed settings.
pub struct Organizer<'a> {
    settings: &'a Settings,
    audit: &'a AuditLog,
}

impl<'a> Organizer<'a> {
    pub fn new(settings: &'a Settings, audit: &'a AuditLog) -> Self {
        Self { settings, audit }
    }

    /// Performs one pass over the source directory.
    ///
    /// Only regular files directly inside the source directory are
    /// considered; subdirectories are neither moved nor descended into.
    /// Entries are processed in the order the filesystem returns them.
    ///
    /// A failure on one file is recorded in the report and the pass goes on
    /// with the next file.
    ///
    /// # Errors
    ///
    /// Returns `OrganizeError::MissingSourceDirectory` if the source
    /// directory does not exist, and `OrganizeError::ReadSourceDirectory` if
    /// it cannot be listed. No file is touched in either case.
    pub fn run(&self, mode: RunMode) -> OrganizeResult<OrganizeReport> {
        let source_dir = &self.settings.source_dir;
        if !source_dir.is_dir() {
            return Err(OrganizeError::MissingSourceDirectory {
                path: source_dir.clone(),
            });
        }

        let entries = fs::read_dir(source_dir).map_err(|source| {
            OrganizeError::ReadSourceDirectory {
                path: source_dir.clone(),
                source,
            }
        })?;

        info!(source = %source_dir.display(), ?mode, "organizing");
        let mut report = OrganizeReport::new(mode);

        for entry in entries {
            match entry {
                Ok(entry) if is_regular_file(&entry) => {
                    self.process_file(&entry.path(), mode, &mut report)
                }
                Ok(_) => {}
                Err(source) => self.record_unreadable_entry(source, &mut report),
            }
        }

        Ok(report)
    }

    /// Records a directory entry that could not be read.
    fn record_unreadable_entry(&self, source: io::Error, report: &mut OrganizeReport) {
        let path = self.settings.source_dir.clone();
        warn!(source_dir = %path.display(), error = %source, "could not read directory entry");
        OutputFormatter::error(&format!(
            "Failed to read an entry of {}: {}",
            path.display(),
            source
        ));
        report
            .failures
            .push((path.clone(), OrganizeError::ReadSourceDirectory { path, source }));
    }

    fn process_file(&self, path: &Path, mode: RunMode, report: &mut OrganizeReport) {
        let Some(file_name) = path.file_name() else {
            return;
        };
        let display_name = file_name.to_string_lossy();

        let Some(category) = self.settings.categories.classify(&display_name) else {
            debug!(file = %display_name, "unclassified, leaving in place");
            report.unclassified.push(path.to_path_buf());
            return;
        };

        let Some(dest_dir) = self.settings.destination_for(category) else {
            debug!(file = %display_name, category, "no destination for category");
            report
                .no_destination
                .push((path.to_path_buf(), category.to_string()));
            return;
        };

        match mode {
            RunMode::DryRun => {
                let new_path = dest_dir.join(resolve_duplicate(dest_dir, file_name));
                OutputFormatter::dry_run_notice(&format!(
                    "Would move: {} → {}",
                    display_name,
                    new_path.display()
                ));
                report.planned.push(Operation {
                    original_path: path.to_path_buf(),
                    new_path,
                    category: category.to_string(),
                });
            }
            RunMode::Live => match self.move_into(path, file_name, category, dest_dir) {
                Ok(operation) => {
                    OutputFormatter::success(&format!(
                        "Moved: {} → {}",
                        display_name,
                        operation.new_path.display()
                    ));
                    report.moved.push(operation);
                }
                Err(e) => {
                    warn!(file = %path.display(), error = %e, "could not organize file");
                    OutputFormatter::error(&e.to_string());
                    report.failures.push((path.to_path_buf(), e));
                }
            },
        }
    }

    /// Creates the destination, moves the file under a free name, and writes
    /// the audit record.
    fn move_into(
        &self,
        path: &Path,
        file_name: &OsStr,
        category: &str,
        dest_dir: &Path,
    ) -> OrganizeResult<Operation> {
        fs::create_dir_all(dest_dir).map_err(|source| OrganizeError::DirectoryCreationFailed {
            path: dest_dir.to_path_buf(),
            source,
        })?;

        let new_path = dest_dir.join(resolve_duplicate(dest_dir, file_name));
        move_file(path, &new_path).map_err(|source| OrganizeError::FileMoveFailure {
            from: path.to_path_buf(),
            to: new_path.clone(),
            source,
        })?;

        let operation = Operation {
            original_path: path.to_path_buf(),
            new_path,
            category: category.to_string(),
        };

        self.audit
            .record(&operation)
            .map_err(|source| OrganizeError::AuditWriteFailed {
                moved: operation.new_path.clone(),
                log: self.audit.path().to_path_buf(),
                source,
            })?;

        Ok(operation)
    }
}

/// True for regular files, following symlinks; broken links are not files.
fn is_regular_file(entry: &DirEntry) -> bool {
    fs::metadata(entry.path())
        .map(|m| m.is_file())
        .unwrap_or(false)
}
