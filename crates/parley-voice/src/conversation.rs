//! The speech → text → reply → speech pipeline behind one spoken turn.
//!
//! Each step returns a `Result`. Callers pick the degradation policy: the
//! HTTP layer maps a failed transcription to empty text, a failed
//! generation to [`GENERATION_FALLBACK`], and a failed synthesis to no
//! audio.

use crate::config::{AudioLimits, OpenAiConfig};
use crate::error::VoiceError;
use crate::llm::{OpenAiChat, ResponseGenerator};
use crate::openai::{preview, OpenAiHttp};
use crate::stt::{OpenAiStt, SpeechToText};
use crate::tts::{OpenAiTts, TextToSpeech};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Reply spoken when generation fails.
pub const GENERATION_FALLBACK: &str = "I'm sorry, I couldn't process that.";

pub struct Conversation {
    stt: Arc<dyn SpeechToText>,
    generator: Arc<dyn ResponseGenerator>,
    tts: Arc<dyn TextToSpeech>,
    limits: AudioLimits,
}

impl fmt::Debug for Conversation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversation")
            .field("stt", &self.stt.provider_name())
            .field("generator", &self.generator.provider_name())
            .field("tts", &self.tts.provider_name())
            .field("limits", &self.limits)
            .finish()
    }
}

impl Conversation {
    pub fn new(
        stt: Arc<dyn SpeechToText>,
        generator: Arc<dyn ResponseGenerator>,
        tts: Arc<dyn TextToSpeech>,
        limits: AudioLimits,
    ) -> Self {
        Self {
            stt,
            generator,
            tts,
            limits,
        }
    }

    /// Wires all three steps to the OpenAI provider, sharing one HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`VoiceError::NotConfigured`] when no API key is set.
    pub fn openai(config: &OpenAiConfig, limits: AudioLimits) -> Result<Self, VoiceError> {
        let http = OpenAiHttp::new(config)?;
        Ok(Self::new(
            Arc::new(OpenAiStt::new(http.clone(), config)),
            Arc::new(OpenAiChat::new(http.clone(), config)),
            Arc::new(OpenAiTts::new(http, config)),
            limits,
        ))
    }

    pub fn limits(&self) -> AudioLimits {
        self.limits
    }

    /// Transcribes an uploaded recording.
    ///
    /// Recordings under `limits.min_bytes` yield empty text without
    /// contacting the provider.
    pub async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, VoiceError> {
        if audio.len() < self.limits.min_bytes {
            debug!(
                bytes = audio.len(),
                min_bytes = self.limits.min_bytes,
                "audio below minimum size, skipping transcription"
            );
            return Ok(String::new());
        }

        self.stt.transcribe(audio, filename).await
    }

    pub async fn generate(&self, text: &str) -> Result<String, VoiceError> {
        debug!(
            provider = self.generator.provider_name(),
            input = %preview(text, 50),
            "generating reply"
        );
        self.generator.generate(text).await
    }

    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        self.tts.synthesize(text).await
    }
}
