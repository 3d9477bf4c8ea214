//! Request and response bodies for the relay's HTTP endpoints.
//!
//! Field names are snake_case on the wire to match what the browser client
//! sends and reads.

use serde::{Deserialize, Serialize};

/// Body of `POST /token`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    /// LiveKit room the participant wants to join.
    pub room_name: String,
    /// Identity and display name of the participant.
    pub participant_name: String,
}

impl TokenRequest {
    /// Returns the name of the first blank field, if any.
    pub fn blank_field(&self) -> Option<&'static str> {
        if self.room_name.trim().is_empty() {
            Some("room_name")
        } else if self.participant_name.trim().is_empty() {
            Some("participant_name")
        } else {
            None
        }
    }
}

/// A signed room-access token paired with the transport URL it is valid for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub token: String,
    pub url: String,
}

/// Body of `POST /respond`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    /// User utterance. May be empty.
    #[serde(default)]
    pub text: String,
}

impl ChatRequest {
    /// True when there is nothing worth sending to the generator.
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Response of `POST /transcribe`. An empty `text` means no usable speech.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
}

impl TranscriptionResult {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Response of `POST /respond`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConversationReply {
    /// Generated reply text.
    pub response_text: String,
    /// Synthesized speech, base64-encoded (standard alphabet, padded).
    pub audio: String,
}

impl ConversationReply {
    /// The reply returned when there was nothing to respond to.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Response of the health probe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    /// Whether an AI provider key is configured.
    pub ai_enabled: bool,
    /// Whether LiveKit API credentials are configured.
    pub livekit_configured: bool,
}

impl ServiceStatus {
    pub fn ok(ai_enabled: bool, livekit_configured: bool) -> Self {
        Self {
            status: "ok".to_string(),
            ai_enabled,
            livekit_configured,
        }
    }
}
