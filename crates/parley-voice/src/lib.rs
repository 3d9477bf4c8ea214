//! Voice pipeline for the Parley relay.
//!
//! Issues LiveKit access tokens for the browser's WebRTC session and drives
//! the three provider calls behind a spoken turn: speech-to-text, reply
//! generation, and text-to-speech. Each capability is a trait so an
//! alternate provider (or a test stub) can be swapped in; the OpenAI HTTP
//! clients are the shipped implementations.
//!
//! Nothing in this crate holds cross-request state. The [`Conversation`]
//! steps return `Result` and leave the choice between degrading and failing
//! to the caller.

pub mod config;
pub mod conversation;
pub mod error;
pub mod llm;
pub mod openai;
pub mod service;
pub mod stt;
pub mod tts;

pub use config::{AudioLimits, LiveKitConfig, OpenAiConfig, DEFAULT_LIVEKIT_URL};
pub use conversation::{Conversation, GENERATION_FALLBACK};
pub use error::VoiceError;
pub use llm::{OpenAiChat, ResponseGenerator};
pub use openai::{preview, OpenAiHttp};
pub use service::VoiceService;
pub use stt::{OpenAiStt, SpeechToText};
pub use tts::{OpenAiTts, TextToSpeech};
