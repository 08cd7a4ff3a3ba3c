// Error handling module
// One taxonomy for every failure a run, the player or the preference store can hit

use serde::ser::SerializeStruct;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NarratorError {
    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Rate limit reached: {0}")]
    RateLimit(String),

    #[error("Character quota exceeded: {0}")]
    QuotaExceeded(String),

    #[error("Invalid voice: {0}")]
    InvalidVoice(String),

    #[error("The abyss demands a tale: source text is empty")]
    EmptyInput,

    #[error("The model returned an empty narrative")]
    EmptyNarrative,

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Filesystem error: {0}")]
    Filesystem(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Could not load preferences: {0}")]
    PreferenceLoad(String),

    #[error("A narration is already being summoned")]
    RunInFlight,
}

impl NarratorError {
    /// Stable identifier the front end switches on.
    pub fn kind(&self) -> &'static str {
        match self {
            NarratorError::Auth(_) => "auth",
            NarratorError::Network(_) => "network",
            NarratorError::RateLimit(_) => "rate_limit",
            NarratorError::QuotaExceeded(_) => "quota_exceeded",
            NarratorError::InvalidVoice(_) => "invalid_voice",
            NarratorError::EmptyInput => "empty_input",
            NarratorError::EmptyNarrative => "empty_narrative",
            NarratorError::Api { .. } => "api",
            NarratorError::Filesystem(_) => "filesystem",
            NarratorError::Playback(_) => "playback",
            NarratorError::PreferenceLoad(_) => "preference_load",
            NarratorError::RunInFlight => "run_in_flight",
        }
    }
}

// Tauri commands return errors to the webview as { kind, message }
impl Serialize for NarratorError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("NarratorError", 2)?;
        state.serialize_field("kind", self.kind())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

impl From<reqwest::Error> for NarratorError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return NarratorError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            };
        }
        NarratorError::Network(err.to_string())
    }
}

impl From<std::io::Error> for NarratorError {
    fn from(err: std::io::Error) -> Self {
        NarratorError::Filesystem(err.to_string())
    }
}

impl From<serde_json::Error> for NarratorError {
    fn from(err: serde_json::Error) -> Self {
        NarratorError::PreferenceLoad(err.to_string())
    }
}

pub type NarratorResult<T> = Result<T, NarratorError>;
