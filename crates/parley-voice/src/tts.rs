use crate::config::OpenAiConfig;
use crate::error::VoiceError;
use crate::openai::{describe_failure, OpenAiHttp};
use async_trait::async_trait;
use serde::Serialize;

/// Maximum text input for synthesis, in characters. The speech endpoint
/// rejects longer input.
const MAX_TTS_INPUT_CHARS: usize = 4096;

/// Text-to-speech capability.
#[async_trait]
pub trait TextToSpeech: Send + Sync {
    /// Returns encoded audio (MP3 for the OpenAI provider).
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError>;

    fn provider_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    speed: f32,
}

/// Synthesis through `POST /audio/speech` with a fixed voice.
#[derive(Debug, Clone)]
pub struct OpenAiTts {
    http: OpenAiHttp,
    model: String,
    voice: String,
    speed: f32,
}

impl OpenAiTts {
    pub fn new(http: OpenAiHttp, config: &OpenAiConfig) -> Self {
        Self {
            http,
            model: config.speech_model.clone(),
            voice: config.voice.clone(),
            speed: config.speed,
        }
    }
}

#[async_trait]
impl TextToSpeech for OpenAiTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        let chars = text.chars().count();
        if chars > MAX_TTS_INPUT_CHARS {
            return Err(VoiceError::Tts(format!(
                "text exceeds maximum size: {} chars (limit: {} chars)",
                chars, MAX_TTS_INPUT_CHARS
            )));
        }

        if !(0.25..=4.0).contains(&self.speed) {
            return Err(VoiceError::Config(
                "Speed must be between 0.25 and 4.0".to_string(),
            ));
        }

        let body = SpeechRequest {
            model: &self.model,
            input: text,
            voice: &self.voice,
            speed: self.speed,
        };

        let response = self
            .http
            .post("audio/speech")
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Tts(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VoiceError::Tts(describe_failure(response).await));
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| VoiceError::Tts(format!("failed to read audio: {}", e)))?;
        Ok(audio.to_vec())
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
