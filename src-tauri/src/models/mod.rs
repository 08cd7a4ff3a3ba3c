// Domain models module
// Contains core data structures shared by the services and the commands

pub mod narration;
pub mod preferences;

pub use narration::{
    AudioArtifact, GenerationRequest, GothicStyle, NarrationEntry, NarrativeResult, RunState,
    StyleInfo, TonePreset, ToneSettings, Voice,
};
pub use preferences::Preferences;
