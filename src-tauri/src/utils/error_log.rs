use chrono::Local;
use log::warn;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::errors::NarratorError;

/// Append-only text file of every error shown to the user.
#[derive(Debug, Clone)]
pub struct ErrorLog {
    path: PathBuf,
}

impl ErrorLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append `[timestamp] context: message`. Never fails the caller.
    pub fn append(&self, context: &str, message: &str) {
        let line = format!(
            "[{}] {}: {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            context,
            message
        );
        let result = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()));
        if let Err(e) = result {
            warn!("Could not write to error log {}: {}", self.path.display(), e);
        }
    }

    pub fn record(&self, context: &str, error: &NarratorError) {
        self.append(context, &format!("[{}] {}", error.kind(), error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_appends_timestamped_lines() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path().join("error_log.txt"));

        log.append("startup", "first");
        log.record("generate_narration", &NarratorError::EmptyInput);

        let content = std::fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with('['));
        assert!(lines[0].ends_with("startup: first"));
        assert!(lines[1].contains("generate_narration: [empty_input]"));
    }

    #[test]
    fn test_unwritable_path_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let log = ErrorLog::new(dir.path());
        log.append("context", "message");
    }
}
