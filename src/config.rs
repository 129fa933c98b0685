//! Run configuration and JSON settings loading.
//!
//! Settings start from built-in defaults and are optionally overridden by a
//! JSON document. The result is an immutable [`Settings`] value built once at
//! startup and borrowed by the organizer for the rest of the run.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "downloads_folder": "~/Downloads",
//!   "folders": {
//!     "images": "~/Pictures",
//!     "ebooks": "~/Books"
//!   },
//!   "extensions": {
//!     "images": ["jpg", "png"],
//!     "ebooks": ["epub", "mobi"]
//!   }
//! }
//! ```
//!
//! All keys are optional. `folders` is merged into the default destination
//! table; `extensions` replaces the category table wholesale.

use crate::file_category::CategoryTable;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file exists but could not be read.
    #[error("IO error reading configuration {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Invalid JSON syntax or structure.
    #[error("Invalid configuration {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },
}

/// The raw shape of the JSON settings document.
#[derive(Debug, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    downloads_folder: Option<String>,
    #[serde(default)]
    folders: Option<BTreeMap<String, String>>,
    #[serde(default)]
    extensions: Option<CategoryTable>,
}

/// Immutable settings for one organize run.
#[derive(Debug, Clone)]
pub struct Settings {
    /// The directory scanned for files.
    pub source_dir: PathBuf,
    /// Category name to destination folder.
    pub destinations: HashMap<String, PathBuf>,
    /// Category name to extensions, in lookup order.
    pub categories: CategoryTable,
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults.
    ///
    /// A missing file is not an error: the built-in defaults are used as-is.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file exists but cannot be read.
    /// Returns `ConfigError::Parse` if the document is not valid JSON or has
    /// values of the wrong type.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            debug!(path = %path.display(), "no configuration file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json_str(&content).map_err(|reason| ConfigError::Parse {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Apply a JSON settings document on top of the defaults.
    ///
    /// Returns the parser's message on failure.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        let file: ConfigFile = serde_json::from_str(content).map_err(|e| e.to_string())?;
        Ok(Self::default().with_overrides(file))
    }

    fn with_overrides(mut self, file: ConfigFile) -> Self {
        if let Some(source) = file.downloads_folder {
            self.source_dir = expand_home(&source);
        }

        if let Some(folders) = file.folders {
            for (category, dest) in folders {
                self.destinations.insert(category, expand_home(&dest));
            }
        }

        if let Some(categories) = file.extensions {
            self.categories = categories;
        }

        for (ext, owners) in self.categories.overlaps() {
            warn!(
                extension = %ext,
                categories = ?owners,
                "extension claimed by several categories, the first one wins"
            );
        }

        self
    }

    /// Returns the destination folder configured for a category, if any.
    pub fn destination_for(&self, category: &str) -> Option<&Path> {
        self.destinations.get(category).map(PathBuf::as_path)
    }
}

impl Default for Settings {
    fn default() -> Self {
        let home = home_dir();
        let destinations = [
            ("images", "Pictures"),
            ("documents", "Documents"),
            ("videos", "Videos"),
            ("music", "Music"),
            ("archives", "Archives"),
            ("executables", "Executables"),
        ]
        .into_iter()
        .map(|(category, dir)| (category.to_string(), home.join(dir)))
        .collect();

        Self {
            source_dir: home.join("Downloads"),
            destinations,
            categories: CategoryTable::default(),
        }
    }
}

/// The user's home directory, or the current directory when `$HOME` is unset.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Expands a leading `~` to the home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_cover_every_category() {
        let settings = Settings::default();
        for category in settings.categories.iter() {
            assert!(
                settings.destination_for(&category.name).is_some(),
                "missing destination for {}",
                category.name
            );
        }
        assert!(settings.source_dir.ends_with("Downloads"));
    }

    #[test]
    fn test_empty_object_keeps_defaults() {
        let settings = Settings::from_json_str("{}").unwrap();
        let defaults = Settings::default();
        assert_eq!(settings.source_dir, defaults.source_dir);
        assert_eq!(settings.destinations, defaults.destinations);
        assert_eq!(settings.categories, defaults.categories);
    }

    #[test]
    fn test_downloads_folder_override() {
        let settings = Settings::from_json_str(r#"{"downloads_folder": "/tmp/in"}"#).unwrap();
        assert_eq!(settings.source_dir, PathBuf::from("/tmp/in"));
    }

    #[test]
    fn test_folders_merge_into_defaults() {
        let settings = Settings::from_json_str(
            r#"{"folders": {"images": "/tmp/out/pics", "ebooks": "/tmp/out/books"}}"#,
        )
        .unwrap();

        assert_eq!(
            settings.destination_for("images"),
            Some(Path::new("/tmp/out/pics"))
        );
        assert_eq!(
            settings.destination_for("ebooks"),
            Some(Path::new("/tmp/out/books"))
        );
        // Untouched keys keep their defaults
        assert_eq!(
            settings.destination_for("music"),
            Settings::default().destination_for("music")
        );
    }

    #[test]
    fn test_extensions_replace_table() {
        let settings =
            Settings::from_json_str(r#"{"extensions": {"ebooks": ["epub"]}}"#).unwrap();

        assert_eq!(settings.categories.len(), 1);
        assert_eq!(settings.categories.classify("book.epub"), Some("ebooks"));
        assert_eq!(settings.categories.classify("photo.png"), None);
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let settings = Settings::from_json_str(r#"{"theme": "dark"}"#);
        assert!(settings.is_ok());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(Settings::from_json_str(r#"{"downloads_folder": "/tmp/in""#).is_err());
        assert!(Settings::from_json_str("not json").is_err());
    }

    #[test]
    fn test_wrong_types_are_error() {
        assert!(Settings::from_json_str(r#"{"downloads_folder": 42}"#).is_err());
        assert!(Settings::from_json_str(r#"{"folders": ["images"]}"#).is_err());
        assert!(Settings::from_json_str(r#"{"extensions": {"images": "png"}}"#).is_err());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let settings = Settings::load(&temp_dir.path().join("config.json")).unwrap();
        assert_eq!(settings.categories, CategoryTable::default());
    }

    #[test]
    fn test_load_malformed_file_returns_parse_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join("config.json");
        fs::write(&path, "{ invalid").expect("Failed to write config");

        let result = Settings::load(&path);
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_load_directory_returns_io_error() {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let result = Settings::load(temp_dir.path());
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/abs/path"), PathBuf::from("/abs/path"));
        assert_eq!(expand_home("relative"), PathBuf::from("relative"));
        assert_eq!(expand_home("~/Pictures"), home_dir().join("Pictures"));
        assert_eq!(expand_home("~"), home_dir());
        assert_eq!(expand_home("~user/x"), PathBuf::from("~user/x"));
    }
}
