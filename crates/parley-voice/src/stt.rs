use crate::config::OpenAiConfig;
use crate::error::VoiceError;
use crate::openai::{describe_failure, OpenAiHttp};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

/// Speech-to-text capability.
#[async_trait]
pub trait SpeechToText: Send + Sync {
    /// Transcribes a complete recording. `filename` is only a format hint.
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, VoiceError>;

    fn provider_name(&self) -> &str;
}

/// Maps an upload's file extension to the MIME type sent to the provider.
fn content_type_for(filename: &str) -> &'static str {
    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "webm" => "audio/webm",
        "wav" => "audio/wav",
        "mp3" | "mpeg" | "mpga" => "audio/mpeg",
        "m4a" | "mp4" => "audio/mp4",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "flac" => "audio/flac",
        _ => "application/octet-stream",
    }
}

/// Transcription through `POST /audio/transcriptions`, plain-text output,
/// temperature 0.
#[derive(Debug, Clone)]
pub struct OpenAiStt {
    http: OpenAiHttp,
    model: String,
    language: String,
}

impl OpenAiStt {
    pub fn new(http: OpenAiHttp, config: &OpenAiConfig) -> Self {
        Self {
            http,
            model: config.transcription_model.clone(),
            language: config.language.clone(),
        }
    }
}

#[async_trait]
impl SpeechToText for OpenAiStt {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String, VoiceError> {
        let part = Part::bytes(audio.to_vec())
            .file_name(filename.to_string())
            .mime_str(content_type_for(filename))
            .map_err(|e| VoiceError::Stt(format!("invalid upload part: {}", e)))?;

        let mut form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("response_format", "text")
            .text("temperature", "0");
        if !self.language.is_empty() {
            form = form.text("language", self.language.clone());
        }

        let response = self
            .http
            .post("audio/transcriptions")
            .multipart(form)
            .send()
            .await
            .map_err(|e| VoiceError::Stt(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VoiceError::Stt(describe_failure(response).await));
        }

        let text = response
            .text()
            .await
            .map_err(|e| VoiceError::Stt(format!("failed to read response: {}", e)))?;
        Ok(text.trim().to_string())
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
