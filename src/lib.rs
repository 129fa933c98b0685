//! sortdl - move downloaded files into category folders
//!
//! This library classifies files by extension, moves them from a single
//! source directory into per-category destination folders with
//! collision-free names, and keeps an append-only audit log of every move.
//! Settings come from built-in defaults optionally overridden by a JSON file.

pub mod audit;
pub mod cli;
pub mod config;
pub mod file_category;
pub mod file_organizer;
pub mod output;

pub use audit::AuditLog;
pub use config::{ConfigError, Settings};
pub use file_category::{Category, CategoryTable};
pub use file_organizer::{OrganizeError, OrganizeReport, Organizer, RunMode};

pub use cli::{Args, RunError, run_cli};
