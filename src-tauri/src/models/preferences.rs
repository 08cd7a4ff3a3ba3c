use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::narration::{GothicStyle, TonePreset, ToneSettings};

pub const DEFAULT_OUTPUT_FORMAT: &str = "mp3_44100_128";

/// User choices remembered between sessions.
///
/// Every field falls back to its default on its own, so a partial document
/// keeps whatever it does contain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Preferences {
    pub last_voice_id: String,
    pub last_style: GothicStyle,
    pub last_output_dir: Option<PathBuf>,
    pub tone_preset: TonePreset,
    pub tone_defaults: ToneSettings,
    pub output_format: String,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            last_voice_id: String::new(),
            last_style: GothicStyle::default(),
            last_output_dir: None,
            tone_preset: TonePreset::default(),
            tone_defaults: ToneSettings::default(),
            output_format: DEFAULT_OUTPUT_FORMAT.to_string(),
        }
    }
}

impl Preferences {
    /// Output format with blank values replaced by the default.
    pub fn effective_output_format(&self) -> &str {
        if self.output_format.trim().is_empty() {
            DEFAULT_OUTPUT_FORMAT
        } else {
            &self.output_format
        }
    }
}
