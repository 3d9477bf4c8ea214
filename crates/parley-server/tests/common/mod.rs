//! Shared fixtures: stub providers that count their calls, and helpers for
//! driving the router.
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, Response},
    Router,
};
use parley_server::{app, AppState};
use parley_voice::{
    AudioLimits, Conversation, LiveKitConfig, ResponseGenerator, SpeechToText, TextToSpeech,
    VoiceError, VoiceService,
};
use serde_json::Value;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::io;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const LIVEKIT_URL: &str = "ws://localhost:7880";
pub const LIVEKIT_KEY: &str = "devkey";
pub const LIVEKIT_SECRET: &str = "devsecret";
pub const CORS_ORIGIN: &str = "http://localhost:3000";

/// Canned outcome for a stub provider.
#[derive(Clone)]
pub enum Reply<T> {
    Ok(T),
    Fail,
}

pub struct StubStt {
    pub calls: AtomicUsize,
    reply: Reply<String>,
}

#[async_trait]
impl SpeechToText for StubStt {
    async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Ok(text) => Ok(text.clone()),
            Reply::Fail => Err(VoiceError::Stt("provider returned 503".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

pub struct StubGenerator {
    pub calls: AtomicUsize,
    reply: Reply<String>,
}

#[async_trait]
impl ResponseGenerator for StubGenerator {
    async fn generate(&self, _text: &str) -> Result<String, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Reply::Ok(text) => Ok(text.clone()),
            Reply::Fail => Err(VoiceError::Generation("provider returned 500".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

pub struct StubTts {
    pub calls: AtomicUsize,
    /// Text of the most recent synthesis request.
    pub last_input: Mutex<Option<String>>,
    reply: Reply<Vec<u8>>,
}

#[async_trait]
impl TextToSpeech for StubTts {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, VoiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_input.lock().unwrap() = Some(text.to_string());
        match &self.reply {
            Reply::Ok(audio) => Ok(audio.clone()),
            Reply::Fail => Err(VoiceError::Tts("provider returned 500".to_string())),
        }
    }

    fn provider_name(&self) -> &str {
        "stub"
    }
}

/// The three stubs behind a test app, kept for call-count assertions.
pub struct Stubs {
    pub stt: Arc<StubStt>,
    pub generator: Arc<StubGenerator>,
    pub tts: Arc<StubTts>,
}

impl Stubs {
    pub fn new(stt: Reply<String>, generator: Reply<String>, tts: Reply<Vec<u8>>) -> Self {
        Self {
            stt: Arc::new(StubStt {
                calls: AtomicUsize::new(0),
                reply: stt,
            }),
            generator: Arc::new(StubGenerator {
                calls: AtomicUsize::new(0),
                reply: generator,
            }),
            tts: Arc::new(StubTts {
                calls: AtomicUsize::new(0),
                last_input: Mutex::new(None),
                reply: tts,
            }),
        }
    }

    pub fn healthy() -> Self {
        Self::new(
            Reply::Ok("hello there".to_string()),
            Reply::Ok("Hello".to_string()),
            Reply::Ok(vec![0x01, 0x02]),
        )
    }

    pub fn conversation(&self, limits: AudioLimits) -> Conversation {
        Conversation::new(
            self.stt.clone(),
            self.generator.clone(),
            self.tts.clone(),
            limits,
        )
    }

    pub fn total_calls(&self) -> usize {
        self.stt.calls.load(Ordering::SeqCst)
            + self.generator.calls.load(Ordering::SeqCst)
            + self.tts.calls.load(Ordering::SeqCst)
    }
}

pub fn configured_livekit() -> LiveKitConfig {
    LiveKitConfig::new(LIVEKIT_URL, LIVEKIT_KEY, LIVEKIT_SECRET)
}

pub fn build_state(livekit: LiveKitConfig, stubs: Option<&Stubs>) -> AppState {
    build_state_with_limits(livekit, stubs, AudioLimits::default())
}

pub fn build_state_with_limits(
    livekit: LiveKitConfig,
    stubs: Option<&Stubs>,
    limits: AudioLimits,
) -> AppState {
    AppState {
        voice_service: Arc::new(VoiceService::new(livekit)),
        conversation: stubs.map(|s| Arc::new(s.conversation(limits))),
        cors_origin: CORS_ORIGIN.to_string(),
    }
}

pub fn build_app(livekit: LiveKitConfig, stubs: Option<&Stubs>) -> Router {
    app(build_state(livekit, stubs))
}

pub fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub const BOUNDARY: &str = "parley-test-boundary";

/// Encodes a single-field multipart body.
pub fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    match filename {
        Some(name) => body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                 Content-Type: audio/webm\r\n\r\n",
                field, name
            )
            .as_bytes(),
        ),
        None => body.extend_from_slice(
            format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", field).as_bytes(),
        ),
    }
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

pub fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/transcribe")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn audio_upload(len: usize) -> Request<Body> {
    upload_request(multipart_body("file", Some("audio.webm"), &vec![0x1a; len]))
}

/// In-memory sink for log output emitted while a test runs.
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes `tracing` output on the current thread into a buffer until the
/// guard is dropped. Pair with the default current-thread `#[tokio::test]`
/// runtime so handler logs land on the same thread.
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();
    (buffer, tracing::subscriber::set_default(subscriber))
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}
