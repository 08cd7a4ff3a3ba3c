//! Common utility functions used across the application

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

static UNSAFE_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^A-Za-z0-9_\-]+").unwrap());
static UNDERSCORE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"_{2,}").unwrap());

/// Sanitize a fragment of text so it can be part of a filename on any OS.
/// Lowercases, replaces everything outside `[a-z0-9_-]` with underscores,
/// collapses underscore runs and trims them from both ends.
///
/// # Arguments
/// * `input` - The text to sanitize
/// * `max_chars` - Upper bound on the characters taken from `input`
pub fn sanitize_filename(input: &str, max_chars: usize) -> String {
    let head: String = input.chars().take(max_chars).collect();
    let replaced = UNSAFE_CHARS.replace_all(&head.to_lowercase(), "_").into_owned();
    UNDERSCORE_RUNS
        .replace_all(&replaced, "_")
        .trim_matches('_')
        .to_string()
}

/// Check if a file exists and has valid content (non-zero size)
pub async fn check_file_exists_and_valid(path: &Path) -> bool {
    if let Ok(metadata) = tokio::fs::metadata(path).await {
        if metadata.is_file() && metadata.len() > 0 {
            return true;
        }
    }
    false
}

/// Pull a human readable message out of an API error body.
///
/// Understands `{"error": {"message": ..}}`, `{"error": ".."}`,
/// `{"detail": {"message": ..}}` and `{"detail": ".."}`; anything else is
/// returned trimmed as-is.
pub fn extract_error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return fallback_message(body);
    };

    let candidates = [
        &json["error"]["message"],
        &json["error"],
        &json["detail"]["message"],
        &json["detail"],
        &json["message"],
    ];
    candidates
        .iter()
        .find_map(|v| v.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| fallback_message(body))
}

/// The `detail.status` code some APIs attach to errors, e.g. `quota_exceeded`.
pub fn extract_error_status(body: &str) -> Option<String> {
    let json = serde_json::from_str::<Value>(body).ok()?;
    json["detail"]["status"].as_str().map(str::to_string)
}

fn fallback_message(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "no error details returned".to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("Hello World", 50), "hello_world");
        assert_eq!(sanitize_filename("File:Name?With*Special<Chars>", 50), "file_name_with_special_chars");
        assert_eq!(sanitize_filename("  The night was dark  ", 50), "the_night_was_dark");
        assert_eq!(sanitize_filename("path/to/file", 50), "path_to_file");
        assert_eq!(sanitize_filename("abcdefghij", 4), "abcd");
        assert_eq!(sanitize_filename("???", 10), "");
    }

    #[test]
    fn test_extract_error_message() {
        assert_eq!(extract_error_message(r#"{"error":{"message":"bad key"}}"#), "bad key");
        assert_eq!(extract_error_message(r#"{"code":"x","error":"Incorrect API key"}"#), "Incorrect API key");
        assert_eq!(
            extract_error_message(r#"{"detail":{"status":"quota_exceeded","message":"0 credits"}}"#),
            "0 credits"
        );
        assert_eq!(extract_error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(extract_error_message(""), "no error details returned");
    }

    #[test]
    fn test_extract_error_status() {
        assert_eq!(
            extract_error_status(r#"{"detail":{"status":"voice_not_found"}}"#).as_deref(),
            Some("voice_not_found")
        );
        assert_eq!(extract_error_status(r#"{"error":"nope"}"#), None);
        assert_eq!(extract_error_status("not json"), None);
    }
}
