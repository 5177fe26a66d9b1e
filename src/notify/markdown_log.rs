use crate::feed::types::SearchResult;
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use std::fmt::Write as _;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Render one update block. Nothing is truncated here.
pub fn format_log_entry(results: &[SearchResult], at: NaiveDateTime) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\n# Updates on {}", at.format("%Y-%m-%d %H:%M:%S"));
    for (idx, result) in results.iter().enumerate() {
        let _ = writeln!(out, "### Result {}", idx + 1);
        let _ = writeln!(out, "**Title:** [{}]({})\n", result.display_title(), result.link);
        let _ = writeln!(out, "**Description:** {}\n", result.display_description());
    }
    out
}

/// Append-only Markdown record of every new result.
#[derive(Debug, Clone)]
pub struct MarkdownLog {
    path: PathBuf,
}

impl MarkdownLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, results: &[SearchResult], at: NaiveDateTime) -> Result<()> {
        let entry = format_log_entry(results, at);
        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file: {}", self.path.display()))?;
        file.write_all(entry.as_bytes())
            .with_context(|| format!("Failed to append to log file: {}", self.path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 15)
            .unwrap()
            .and_hms_opt(9, 30, 5)
            .unwrap()
    }

    #[test]
    fn test_entry_layout() {
        let results = vec![SearchResult::new("https://a.example")
            .with_title("A")
            .with_description("about a")];
        assert_eq!(
            format_log_entry(&results, at()),
            "\n# Updates on 2026-10-15 09:30:05\n\
             ### Result 1\n\
             **Title:** [A](https://a.example)\n\n\
             **Description:** about a\n\n"
        );
    }

    #[test]
    fn test_entry_keeps_full_description() {
        let long = "z".repeat(250);
        let results = vec![SearchResult::new("https://a").with_description(long.clone())];
        let entry = format_log_entry(&results, at());
        assert!(entry.contains(&format!("**Description:** {}\n", long)));
        assert!(!entry.contains("..."));
    }

    #[test]
    fn test_append_accumulates() {
        let dir = tempfile::tempdir().unwrap();
        let log = MarkdownLog::new(dir.path().join("log.md"));
        let results = vec![SearchResult::new("https://a").with_title("A")];

        log.append(&results, at()).unwrap();
        log.append(&results, at()).unwrap();

        let content = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(content.matches("# Updates on").count(), 2);
        assert_eq!(content.matches("### Result 1").count(), 2);
    }
}
