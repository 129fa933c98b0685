//! File categorization by extension.
//!
//! This module maps file extensions to named categories (e.g. "images",
//! "documents"). The table keeps categories in insertion order, and lookups
//! return the first category that claims an extension.
//!
//! # Examples
//!
//! ```
//! use sortdl::file_category::CategoryTable;
//!
//! let table = CategoryTable::default();
//! assert_eq!(table.classify("photo.PNG"), Some("images"));
//! assert_eq!(table.classify("notes.txt"), Some("documents"));
//! assert_eq!(table.classify("unknown.xyz"), None);
//! ```

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// A named bucket of file extensions sharing a destination folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    /// The category name, used as the key into the destination table.
    pub name: String,
    /// Lowercase extensions without a leading dot.
    pub extensions: HashSet<String>,
}

impl Category {
    /// Creates a category, normalizing every extension.
    pub fn new<I, S>(name: &str, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            name: name.to_string(),
            extensions: extensions
                .into_iter()
                .filter_map(|ext| normalize_extension(ext.as_ref()))
                .collect(),
        }
    }

    /// Returns true if this category claims the given (normalized) extension.
    pub fn claims(&self, ext: &str) -> bool {
        self.extensions.contains(ext)
    }
}

/// Ordered mapping from category name to its extensions.
///
/// Order matters: when two categories claim the same extension, the one
/// inserted first wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTable {
    categories: Vec<Category>,
}

impl CategoryTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self {
            categories: Vec::new(),
        }
    }

    /// Appends a category, or replaces the extensions of an existing one in place.
    pub fn insert<I, S>(&mut self, name: &str, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let category = Category::new(name, extensions);
        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => *existing = category,
            None => self.categories.push(category),
        }
    }

    /// Iterates categories in table order.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Maps a normalized extension to the first category claiming it.
    ///
    /// # Examples
    ///
    /// ```
    /// use sortdl::file_category::CategoryTable;
    ///
    /// let table = CategoryTable::default();
    /// assert_eq!(table.extension_to_category("mp3"), Some("music"));
    /// assert_eq!(table.extension_to_category("rs"), None);
    /// ```
    pub fn extension_to_category(&self, ext: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|category| category.claims(ext))
            .map(|category| category.name.as_str())
    }

    /// Determines the category for a file name from its extension.
    ///
    /// Returns `None` for names without an extension and for extensions no
    /// category claims.
    pub fn classify(&self, file_name: &str) -> Option<&str> {
        let ext = extension_of(file_name)?;
        self.extension_to_category(&ext)
    }

    /// Lists extensions claimed by more than one category, with every
    /// category claiming them in table order.
    pub fn overlaps(&self) -> Vec<(String, Vec<String>)> {
        let mut seen: Vec<(String, Vec<String>)> = Vec::new();
        for category in &self.categories {
            for ext in &category.extensions {
                match seen.iter_mut().find(|(e, _)| e == ext) {
                    Some((_, owners)) => owners.push(category.name.clone()),
                    None => seen.push((ext.clone(), vec![category.name.clone()])),
                }
            }
        }
        let mut overlaps: Vec<_> = seen
            .into_iter()
            .filter(|(_, owners)| owners.len() > 1)
            .collect();
        overlaps.sort();
        overlaps
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        let mut table = Self::new();
        table.insert("images", ["jpg", "jpeg", "png", "gif", "bmp", "tiff"]);
        table.insert(
            "documents",
            ["pdf", "docx", "doc", "txt", "xls", "xlsx", "ppt", "pptx"],
        );
        table.insert("videos", ["mp4", "avi", "mkv", "mov"]);
        table.insert("music", ["mp3", "wav", "flac", "aac"]);
        table.insert("archives", ["zip", "rar", "tar", "gz", "7z"]);
        table.insert("executables", ["exe", "msi", "dmg", "deb", "rpm"]);
        table
    }
}

// Deserialized by hand so the document order of the JSON object survives.
impl<'de> Deserialize<'de> for CategoryTable {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = CategoryTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of category name to a list of extensions")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut table = CategoryTable::new();
                while let Some((name, extensions)) = map.next_entry::<String, Vec<String>>()? {
                    table.insert(&name, extensions);
                }
                Ok(table)
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Extracts the lowercase extension of a file name, without the dot.
///
/// Dotfiles such as `.bashrc` have no extension.
///
/// # Examples
///
/// ```
/// use sortdl::file_category::extension_of;
///
/// assert_eq!(extension_of("Photo.JPG"), Some("jpg".to_string()));
/// assert_eq!(extension_of("backup.tar.gz"), Some("gz".to_string()));
/// assert_eq!(extension_of("README"), None);
/// ```
pub fn extension_of(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .filter(|ext| !ext.is_empty())
}

/// Lowercases an extension and strips one leading dot; empty results are dropped.
fn normalize_extension(ext: &str) -> Option<String> {
    let trimmed = ext.trim();
    let trimmed = trimmed.strip_prefix('.').unwrap_or(trimmed);
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_order() {
        let table = CategoryTable::default();
        let names: Vec<_> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "images",
                "documents",
                "videos",
                "music",
                "archives",
                "executables"
            ]
        );
    }

    #[test]
    fn test_classify_default_categories() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("a.jpeg"), Some("images"));
        assert_eq!(table.classify("report.pdf"), Some("documents"));
        assert_eq!(table.classify("clip.mkv"), Some("videos"));
        assert_eq!(table.classify("song.flac"), Some("music"));
        assert_eq!(table.classify("backup.tar.gz"), Some("archives"));
        assert_eq!(table.classify("setup.msi"), Some("executables"));
    }

    #[test]
    fn test_classify_case_insensitive() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("IMG_0001.PNG"), Some("images"));
        assert_eq!(table.classify("Song.Mp3"), Some("music"));
    }

    #[test]
    fn test_classify_unknown_and_extensionless() {
        let table = CategoryTable::default();
        assert_eq!(table.classify("main.rs"), None);
        assert_eq!(table.classify("Makefile"), None);
        assert_eq!(table.classify(".bashrc"), None);
        assert_eq!(table.classify("trailing."), None);
    }

    #[test]
    fn test_first_category_wins_on_overlap() {
        let mut table = CategoryTable::new();
        table.insert("first", ["txt"]);
        table.insert("second", ["txt", "md"]);

        assert_eq!(table.classify("notes.txt"), Some("first"));
        assert_eq!(table.classify("notes.md"), Some("second"));
        assert_eq!(
            table.overlaps(),
            vec![(
                "txt".to_string(),
                vec!["first".to_string(), "second".to_string()]
            )]
        );
    }

    #[test]
    fn test_insert_normalizes_extensions() {
        let mut table = CategoryTable::new();
        table.insert("ebooks", [".EPUB", "Mobi", "", "  "]);

        let category = table.iter().next().unwrap();
        assert_eq!(category.extensions.len(), 2);
        assert!(category.claims("epub"));
        assert!(category.claims("mobi"));
    }

    #[test]
    fn test_insert_replaces_existing_in_place() {
        let mut table = CategoryTable::default();
        table.insert("images", ["webp"]);

        assert_eq!(table.len(), 6);
        assert_eq!(table.iter().next().unwrap().name, "images");
        assert_eq!(table.classify("a.webp"), Some("images"));
        assert_eq!(table.classify("a.png"), None);
    }

    #[test]
    fn test_deserialize_preserves_document_order() {
        let table: CategoryTable =
            serde_json::from_str(r#"{"zeta": ["z"], "alpha": ["a", "z"], "mid": ["m"]}"#)
                .unwrap();
        let names: Vec<_> = table.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
        assert_eq!(table.classify("file.z"), Some("zeta"));
    }

    #[test]
    fn test_deserialize_rejects_wrong_shape() {
        assert!(serde_json::from_str::<CategoryTable>(r#"["images"]"#).is_err());
        assert!(serde_json::from_str::<CategoryTable>(r#"{"images": "png"}"#).is_err());
    }
}
