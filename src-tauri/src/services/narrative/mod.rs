// Narrative generation
// Turns user text into gothic prose through a chat-completion model

use serde::{Deserialize, Serialize};

use crate::errors::NarratorResult;
use crate::models::{GothicStyle, NarrativeResult};

pub mod xai;

pub use xai::XaiClient;

/// Trait that every narrative backend implements
#[async_trait::async_trait]
pub trait NarrativeGenerator: Send + Sync {
    /// Rewrite `source_text` in the given style. One attempt, no retries.
    async fn generate(&self, source_text: &str, style: GothicStyle) -> NarratorResult<NarrativeResult>;
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// System and user messages for a style.
pub fn build_messages(source_text: &str, style: GothicStyle) -> Vec<ChatMessage> {
    vec![
        ChatMessage {
            role: "system".to_string(),
            content: format!(
                "You are a master of gothic horror literature. {} \
                 Use vivid, atmospheric language and maintain a dark, mysterious tone throughout.",
                style.instruction()
            ),
        },
        ChatMessage {
            role: "user".to_string(),
            content: format!(
                "Transform this text into a gothic horror narrative:\n\n{}",
                source_text
            ),
        },
    ]
}

/// Trim every line and drop the blank ones.
pub fn clean_narrative(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_style_instruction_and_text() {
        let messages = build_messages("A walk in the woods", GothicStyle::Cosmic);
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[0].content.starts_with("You are a master of gothic horror literature."));
        assert!(messages[0].content.contains("unknowable entities"));
        assert_eq!(messages[1].role, "user");
        assert!(messages[1].content.ends_with("\n\nA walk in the woods"));
    }

    #[test]
    fn test_clean_narrative() {
        let raw = "  The fog rolled in.  \n\n\n   It whispered.\n\t\n";
        assert_eq!(clean_narrative(raw), "The fog rolled in.\nIt whispered.");
        assert_eq!(clean_narrative(" \n \n"), "");
    }
}
