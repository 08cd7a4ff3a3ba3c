// Configuration module
// Paths, endpoints and credentials, resolved once at startup

use std::path::PathBuf;
use std::time::Duration;

pub mod preferences;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub output_dir: PathBuf,
    pub preferences_path: PathBuf,
    pub error_log_path: PathBuf,
    pub xai_api_key: Option<String>,
    pub xai_base_url: String,
    pub xai_model: String,
    pub elevenlabs_api_key: Option<String>,
    pub elevenlabs_base_url: String,
    pub elevenlabs_model: String,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("narrations"),
            preferences_path: PathBuf::from("preferences.json"),
            error_log_path: PathBuf::from("error_log.txt"),
            xai_api_key: None,
            xai_base_url: "https://api.x.ai/v1".to_string(),
            xai_model: "grok-beta".to_string(),
            elevenlabs_api_key: None,
            elevenlabs_base_url: "https://api.elevenlabs.io".to_string(),
            elevenlabs_model: "eleven_turbo_v2".to_string(),
            request_timeout: Duration::from_secs(60),
        }
    }
}

impl AppConfig {
    /// Build the configuration from process environment, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        // blank values count as unset
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        let request_timeout = get("NARRATOR_TIMEOUT_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            output_dir: get("NARRATOR_OUTPUT_DIR").map(PathBuf::from).unwrap_or(defaults.output_dir),
            preferences_path: get("NARRATOR_PREFS_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.preferences_path),
            error_log_path: get("NARRATOR_ERROR_LOG")
                .map(PathBuf::from)
                .unwrap_or(defaults.error_log_path),
            xai_api_key: get("XAI_API_KEY"),
            xai_base_url: get("XAI_BASE_URL").unwrap_or(defaults.xai_base_url),
            xai_model: get("XAI_MODEL").unwrap_or(defaults.xai_model),
            elevenlabs_api_key: get("ELEVENLABS_API_KEY"),
            elevenlabs_base_url: get("ELEVENLABS_BASE_URL").unwrap_or(defaults.elevenlabs_base_url),
            elevenlabs_model: get("ELEVENLABS_MODEL").unwrap_or(defaults.elevenlabs_model),
            request_timeout,
        }
    }

    /// Names of the API key variables that are not set.
    pub fn missing_keys(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.xai_api_key.is_none() {
            missing.push("XAI_API_KEY");
        }
        if self.elevenlabs_api_key.is_none() {
            missing.push("ELEVENLABS_API_KEY");
        }
        missing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_environment_is_empty() {
        let config = AppConfig::from_lookup(lookup(&[]));
        assert_eq!(config.output_dir, PathBuf::from("narrations"));
        assert_eq!(config.xai_model, "grok-beta");
        assert_eq!(config.request_timeout, Duration::from_secs(60));
        assert_eq!(config.missing_keys(), vec!["XAI_API_KEY", "ELEVENLABS_API_KEY"]);
    }

    #[test]
    fn test_blank_keys_count_as_missing() {
        let config = AppConfig::from_lookup(lookup(&[
            ("XAI_API_KEY", "   "),
            ("ELEVENLABS_API_KEY", "el-key"),
            ("NARRATOR_TIMEOUT_SECS", "15"),
        ]));
        assert!(config.xai_api_key.is_none());
        assert_eq!(config.elevenlabs_api_key.as_deref(), Some("el-key"));
        assert_eq!(config.request_timeout, Duration::from_secs(15));
        assert_eq!(config.missing_keys(), vec!["XAI_API_KEY"]);
    }

    #[test]
    fn test_invalid_timeout_falls_back_to_default() {
        let config = AppConfig::from_lookup(lookup(&[("NARRATOR_TIMEOUT_SECS", "soon")]));
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }
}
