//! Output formatting and styling module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! status lines and the end-of-run summary table.

use colored::*;
use std::collections::BTreeMap;

/// Manages all CLI output with consistent styling and formatting.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Summary tables with statistics
pub struct OutputFormatter;

impl OutputFormatter {
    /// Prints a success message in green with a checkmark.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdl::output::OutputFormatter;
    /// OutputFormatter::success("Moved: a.png → /home/me/Pictures/a.png");
    /// ```
    pub fn success(message: &str) {
        println!("{} {}", "✓".green(), message);
    }

    /// Prints an error message in red with an X mark.
    pub fn error(message: &str) {
        eprintln!("{} {}", "✗".red(), message);
    }

    /// Prints a warning message in yellow with a warning symbol.
    pub fn warning(message: &str) {
        println!("{} {}", "⚠".yellow(), message);
    }

    /// Prints an info message in cyan.
    pub fn info(message: &str) {
        println!("{}", message.cyan());
    }

    /// Prints a regular message without styling.
    pub fn plain(message: &str) {
        println!("{}", message);
    }

    /// Prints a section header.
    pub fn header(header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a dry-run notice message.
    pub fn dry_run_notice(message: &str) {
        println!("{}", format!("[Dry-Run] {}", message).yellow());
    }

    /// Prints a summary table with file counts by category.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use sortdl::output::OutputFormatter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("documents".to_string(), 15);
    /// counts.insert("images".to_string(), 8);
    /// OutputFormatter::summary_table(&counts, 23);
    /// ```
    pub fn summary_table(category_counts: &BTreeMap<String, usize>, total_files: usize) {
        Self::header("SUMMARY");
        for line in Self::summary_lines(category_counts, total_files) {
            println!("{}", line);
        }
    }

    /// Builds the summary table rows without styling.
    fn summary_lines(category_counts: &BTreeMap<String, usize>, total_files: usize) -> Vec<String> {
        let width = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max("Category".len());
        let rule = "-".repeat(width + 10);

        let mut lines = vec![format!("{:<width$} | Files", "Category"), rule.clone()];
        for (category, count) in category_counts {
            lines.push(format!(
                "{:<width$} | {} {}",
                category,
                count,
                plural(*count)
            ));
        }
        lines.push(rule);
        lines.push(format!(
            "{:<width$} | {} {}",
            "Total",
            total_files,
            plural(total_files)
        ));
        lines
    }
}

fn plural(count: usize) -> &'static str {
    if count == 1 { "file" } else { "files" }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_lines_layout() {
        let mut counts = BTreeMap::new();
        counts.insert("images".to_string(), 1);
        counts.insert("executables".to_string(), 3);

        let lines = OutputFormatter::summary_lines(&counts, 4);
        assert_eq!(
            lines,
            vec![
                "Category    | Files",
                "---------------------",
                "executables | 3 files",
                "images      | 1 file",
                "---------------------",
                "Total       | 4 files",
            ]
        );
    }

    #[test]
    fn test_summary_lines_empty() {
        let lines = OutputFormatter::summary_lines(&BTreeMap::new(), 0);
        assert_eq!(lines.first().map(String::as_str), Some("Category | Files"));
        assert_eq!(lines.last().map(String::as_str), Some("Total    | 0 files"));
    }
}
