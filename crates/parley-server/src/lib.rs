//! Parley server library logic.
//!
//! Hosts the HTTP surface of the voice relay: LiveKit token issuance and
//! the transcribe → respond conversation endpoints.

pub mod api;
pub mod config;

use axum::{
    extract::DefaultBodyLimit,
    http::HeaderValue,
    routing::{get, post},
    Extension, Router,
};
use config::Config;
use parley_voice::{AudioLimits, Conversation, VoiceError, VoiceService};
use std::sync::Arc;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

/// Application state shared across all request handlers.
///
/// Built once at startup and never mutated.
#[derive(Clone)]
pub struct AppState {
    /// LiveKit credential issuer.
    pub voice_service: Arc<VoiceService>,
    /// Speech/chat/TTS pipeline, which also owns the upload bounds.
    /// `None` when no AI provider key is set.
    pub conversation: Option<Arc<Conversation>>,
    /// Browser origin allowed by CORS.
    pub cors_origin: String,
}

impl AppState {
    /// Builds the state from configuration.
    ///
    /// A missing AI key leaves the conversation endpoints disabled rather
    /// than failing.
    ///
    /// # Errors
    ///
    /// Returns `VoiceError` if the provider HTTP client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, VoiceError> {
        let conversation = match Conversation::openai(&config.openai, config.audio) {
            Ok(conversation) => Some(Arc::new(conversation)),
            Err(VoiceError::NotConfigured(what)) => {
                tracing::warn!(
                    "{} API key not configured - AI features will be disabled",
                    what
                );
                None
            }
            Err(e) => return Err(e),
        };

        let voice_service = VoiceService::new(config.livekit.clone());
        if !voice_service.is_configured() {
            tracing::warn!("LiveKit credentials not configured - token issuance will fail");
        }

        Ok(Self {
            voice_service: Arc::new(voice_service),
            conversation,
            cors_origin: config.cors.origin.clone(),
        })
    }

    /// Upload bounds for `/transcribe`. The conversation owns them; the
    /// route body limit and the handler's size check both read from here.
    pub fn upload_limits(&self) -> AudioLimits {
        self.conversation
            .as_ref()
            .map(|conversation| conversation.limits())
            .unwrap_or_default()
    }
}

/// Maximum body size for JSON endpoints (1 MiB).
const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Room for multipart boundaries and headers on top of the audio bytes.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Credentialed CORS for a single origin. Methods and headers are mirrored
/// from the preflight, since credentialed responses cannot use `*`.
fn cors_layer(origin: &str) -> CorsLayer {
    let allow_origin = if origin == "*" {
        tracing::warn!("CORS origin \"*\" cannot be credentialed; mirroring request origin");
        AllowOrigin::mirror_request()
    } else {
        match HeaderValue::from_str(origin) {
            Ok(value) => AllowOrigin::exact(value),
            Err(e) => {
                tracing::warn!(
                    origin,
                    "invalid CORS origin, cross-origin requests will be refused: {}",
                    e
                );
                AllowOrigin::list(Vec::<HeaderValue>::new())
            }
        }
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    // Uploads need a larger body limit than the JSON routes.
    let upload_routes = Router::new()
        .route("/transcribe", post(api::transcribe_handler))
        .layer(DefaultBodyLimit::max(
            state.upload_limits().max_bytes + MULTIPART_OVERHEAD_BYTES,
        ));

    Router::new()
        .route("/", get(api::status_handler))
        .route("/health", get(api::status_handler))
        .route("/token", post(api::token_handler))
        .route("/respond", post(api::respond_handler))
        .merge(upload_routes)
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state.cors_origin))
        .layer(Extension(Arc::new(state)))
}
