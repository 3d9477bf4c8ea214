use serde::{Deserialize, Serialize};
use std::fmt;

/// LiveKit endpoint used when none is configured (a local dev server).
pub const DEFAULT_LIVEKIT_URL: &str = "ws://localhost:7880";

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful, friendly voice assistant. \
Give clear, accurate, and concise responses in 1-2 sentences.";

fn default_livekit_url() -> String {
    DEFAULT_LIVEKIT_URL.to_string()
}

fn default_token_ttl_seconds() -> u64 {
    3600
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LiveKitConfig {
    /// Browser-facing LiveKit URL returned alongside every token.
    #[serde(default = "default_livekit_url")]
    pub url: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default, skip_serializing)]
    pub api_secret: String,
    /// JWT token TTL in seconds for LiveKit join tokens. Default: 3600 (1 hour).
    #[serde(default = "default_token_ttl_seconds")]
    pub token_ttl_seconds: u64,
}

impl Default for LiveKitConfig {
    fn default() -> Self {
        Self {
            url: default_livekit_url(),
            api_key: String::new(),
            api_secret: String::new(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }
}

impl fmt::Debug for LiveKitConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveKitConfig")
            .field("url", &self.url)
            .field("api_key", &self.api_key)
            .field("api_secret", &"[REDACTED]")
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

impl LiveKitConfig {
    pub fn new(
        url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            api_key: api_key.into(),
            api_secret: api_secret.into(),
            token_ttl_seconds: default_token_ttl_seconds(),
        }
    }

    /// Both the API key and secret are needed to sign tokens.
    pub fn has_credentials(&self) -> bool {
        !self.api_key.is_empty() && !self.api_secret.is_empty()
    }
}

/// Settings for the OpenAI-compatible speech, chat, and TTS endpoints.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    /// API root, without a trailing `/audio/...` or `/chat/...` path.
    pub base_url: String,
    /// Whole-request timeout applied to every provider call.
    pub timeout_seconds: u64,

    pub transcription_model: String,
    /// Spoken language hint (ISO-639-1). Empty lets the provider auto-detect.
    pub language: String,

    pub chat_model: String,
    pub system_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,

    pub speech_model: String,
    pub voice: String,
    pub speed: f32,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            timeout_seconds: 30,
            transcription_model: "whisper-1".to_string(),
            language: "en".to_string(),
            chat_model: "gpt-4o-mini".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: 150,
            temperature: 0.7,
            speech_model: "tts-1-hd".to_string(),
            voice: "alloy".to_string(),
            speed: 1.0,
        }
    }
}

impl fmt::Debug for OpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let api_key = if self.api_key.is_empty() {
            "[UNSET]"
        } else {
            "[REDACTED]"
        };
        f.debug_struct("OpenAiConfig")
            .field("api_key", &api_key)
            .field("base_url", &self.base_url)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("transcription_model", &self.transcription_model)
            .field("language", &self.language)
            .field("chat_model", &self.chat_model)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("speech_model", &self.speech_model)
            .field("voice", &self.voice)
            .field("speed", &self.speed)
            .finish()
    }
}

impl OpenAiConfig {
    pub fn is_enabled(&self) -> bool {
        !self.api_key.is_empty()
    }
}

/// Size bounds for uploaded speech.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioLimits {
    /// Uploads shorter than this hold no usable speech and are never sent
    /// to the transcription provider.
    pub min_bytes: usize,
    /// Largest accepted upload (25 MiB, the transcription API's own limit).
    pub max_bytes: usize,
}

impl Default for AudioLimits {
    fn default() -> Self {
        Self {
            min_bytes: 5000,
            max_bytes: 25 * 1024 * 1024,
        }
    }
}
