//! Transcript turn types.

use serde::{Deserialize, Serialize};

/// Represents the speaker of a transcript turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnRole {
    /// Turn from the user.
    User,
    /// Turn from the model.
    Assistant,
}

/// A single turn in a session's transcript.
///
/// The transcript is append-only and strictly chronological; turns are never
/// edited or reordered after being recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who spoke.
    pub role: TurnRole,
    /// The utterance.
    pub content: String,
    /// Timestamp when the turn was recorded (RFC 3339 format).
    pub timestamp: String,
}

impl ConversationTurn {
    /// Creates a turn stamped with the current time.
    pub fn now(role: TurnRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
