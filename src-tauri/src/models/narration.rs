use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Flavor of horror the narrative is rewritten in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum GothicStyle {
    #[default]
    #[serde(alias = "classic_gothic")]
    Classic,
    #[serde(alias = "cosmic_horror")]
    Cosmic,
    #[serde(alias = "southern_gothic")]
    Southern,
    #[serde(alias = "psychological_horror")]
    Psychological,
    #[serde(alias = "folk_horror")]
    Folk,
}

struct StyleTemplate {
    label: &'static str,
    instruction: &'static str,
}

// Indexed by `GothicStyle as usize`
const STYLE_TEMPLATES: [StyleTemplate; 5] = [
    StyleTemplate {
        label: "Classic Gothic",
        instruction: "Transform this text into a classic gothic horror narrative with brooding atmosphere, dark romance, and supernatural elements.",
    },
    StyleTemplate {
        label: "Cosmic Horror",
        instruction: "Reimagine this text as a cosmic horror tale filled with unknowable entities and existential dread.",
    },
    StyleTemplate {
        label: "Southern Gothic",
        instruction: "Convert this text into a Southern gothic story with decayed settings, grotesque characters, and moral ambiguity.",
    },
    StyleTemplate {
        label: "Psychological Horror",
        instruction: "Rewrite this text as a psychological horror narrative, emphasizing inner torment and creeping madness.",
    },
    StyleTemplate {
        label: "Folk Horror",
        instruction: "Adapt this text into a folk horror story with ancient rituals, rural isolation, and pagan undertones.",
    },
];

impl GothicStyle {
    pub const ALL: [GothicStyle; 5] = [
        GothicStyle::Classic,
        GothicStyle::Cosmic,
        GothicStyle::Southern,
        GothicStyle::Psychological,
        GothicStyle::Folk,
    ];

    fn template(self) -> &'static StyleTemplate {
        &STYLE_TEMPLATES[self as usize]
    }

    pub fn instruction(self) -> &'static str {
        self.template().instruction
    }

    pub fn label(self) -> &'static str {
        self.template().label
    }
}

/// Style entry as listed in the style selector.
#[derive(Debug, Clone, Serialize)]
pub struct StyleInfo {
    pub id: GothicStyle,
    pub label: &'static str,
}

impl From<GothicStyle> for StyleInfo {
    fn from(style: GothicStyle) -> Self {
        Self {
            id: style,
            label: style.label(),
        }
    }
}

/// Named starting points for the tone sliders.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TonePreset {
    #[default]
    Mysterious,
    Somber,
    Menacing,
}

impl TonePreset {
    pub fn settings(self) -> ToneSettings {
        ToneSettings {
            stability: if self == TonePreset::Mysterious { 0.2 } else { 0.4 },
            similarity_boost: 0.6,
            style: if self == TonePreset::Somber { 0.8 } else { 1.0 },
            use_speaker_boost: true,
        }
    }
}

/// Voice settings sent with every synthesis request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ToneSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for ToneSettings {
    fn default() -> Self {
        TonePreset::default().settings()
    }
}

impl ToneSettings {
    /// Copy with every slider forced into `[0, 1]`; NaN becomes 0.
    pub fn clamped(self) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) };
        Self {
            stability: unit(self.stability),
            similarity_boost: unit(self.similarity_boost),
            style: unit(self.style),
            use_speaker_boost: self.use_speaker_boost,
        }
    }
}

/// What the user asked for when pressing generate. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub source_text: String,
    #[serde(default)]
    pub style: GothicStyle,
    #[serde(default)]
    pub tone_preset: TonePreset,
    #[serde(default)]
    pub tone_settings: ToneSettings,
    pub voice_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeResult {
    pub generated_text: String,
    pub style_used: GothicStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudioArtifact {
    pub file_path: PathBuf,
    pub voice_id: String,
    pub byte_len: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
}

/// One previously generated narration in the output directory.
#[derive(Debug, Clone, Serialize)]
pub struct NarrationEntry {
    pub basename: String,
    pub audio_path: PathBuf,
    pub text_path: Option<PathBuf>,
    pub modified: chrono::DateTime<chrono::Local>,
}

/// Where a run currently is; emitted to the window on every transition.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    Idle,
    Generating,
    Synthesizing {
        text_path: PathBuf,
    },
    Ready {
        text_path: PathBuf,
        audio_path: PathBuf,
    },
    Failed {
        kind: String,
        message: String,
        // text written before the failure, kept on disk
        text_path: Option<PathBuf>,
    },
}
