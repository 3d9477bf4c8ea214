use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoiceError {
    #[error("LiveKit token error: {0}")]
    LiveKit(#[from] livekit_api::access_token::AccessTokenError),

    /// Credentials for a provider are missing.
    #[error("{0} not configured")]
    NotConfigured(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("STT error: {0}")]
    Stt(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("TTS error: {0}")]
    Tts(String),
}
