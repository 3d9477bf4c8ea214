//! API handlers for the Parley relay.

use crate::AppState;
use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        rejection::JsonRejection,
        Extension, Json, Multipart,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use parley_types::{
    ChatRequest, ConversationReply, Credential, ServiceStatus, TokenRequest, TranscriptionResult,
};
use parley_voice::{preview, Conversation, VoiceError, GENERATION_FALLBACK};
use std::sync::Arc;
use thiserror::Error;

/// Filename assumed when the upload does not carry one.
const DEFAULT_UPLOAD_FILENAME: &str = "audio.webm";

/// Characters of transcribed or generated text kept in log lines.
const LOG_PREVIEW_CHARS: usize = 50;

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::PayloadTooLarge(msg) => (StatusCode::PAYLOAD_TOO_LARGE, msg),
            ApiError::InternalServerError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<VoiceError> for ApiError {
    fn from(e: VoiceError) -> Self {
        ApiError::InternalServerError(e.to_string())
    }
}

fn require_conversation(state: &AppState) -> Result<&Conversation, ApiError> {
    state.conversation.as_deref().ok_or_else(|| {
        tracing::error!("request rejected: AI provider not configured");
        ApiError::InternalServerError("AI provider not configured".to_string())
    })
}

/// Handler for `GET /` and `GET /health`.
///
/// Reports which providers are configured without contacting any of them.
pub async fn status_handler(Extension(state): Extension<Arc<AppState>>) -> Json<ServiceStatus> {
    Json(ServiceStatus::ok(
        state.conversation.is_some(),
        state.voice_service.is_configured(),
    ))
}

/// Handler for `POST /token`.
///
/// The configuration check runs before the body is looked at, so an
/// unconfigured server answers 500 regardless of input.
pub async fn token_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<Credential>, ApiError> {
    if !state.voice_service.is_configured() {
        return Err(ApiError::InternalServerError(
            "LiveKit credentials not configured".to_string(),
        ));
    }

    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    if let Some(field) = request.blank_field() {
        return Err(ApiError::BadRequest(format!("{} must not be empty", field)));
    }

    let credential = state
        .voice_service
        .issue_token(&request.room_name, &request.participant_name)
        .map_err(|e| {
            tracing::error!(
                room = %request.room_name,
                participant = %request.participant_name,
                "token generation failed: {}",
                e
            );
            ApiError::from(e)
        })?;

    tracing::info!(
        room = %request.room_name,
        participant = %request.participant_name,
        "issued LiveKit token"
    );
    Ok(Json(credential))
}

/// An audio file pulled out of a multipart body.
struct AudioUpload {
    filename: String,
    data: Vec<u8>,
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(e.body_text())
    } else {
        ApiError::InternalServerError(format!("failed to read upload: {}", e))
    }
}

/// Reads the `file` field, skipping any others.
async fn read_audio_upload(multipart: &mut Multipart) -> Result<AudioUpload, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(DEFAULT_UPLOAD_FILENAME)
            .to_string();
        let data = field.bytes().await.map_err(multipart_error)?;

        return Ok(AudioUpload {
            filename,
            data: data.to_vec(),
        });
    }

    Err(ApiError::BadRequest("no file provided".to_string()))
}

/// Handler for `POST /transcribe`.
///
/// Provider failures degrade to empty text with a 200; only a missing AI
/// configuration or an unreadable upload is an error.
pub async fn transcribe_handler(
    Extension(state): Extension<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<TranscriptionResult>, ApiError> {
    let conversation = require_conversation(&state)?;
    let mut multipart = multipart.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let upload = read_audio_upload(&mut multipart).await?;
    let max_bytes = state.upload_limits().max_bytes;
    if upload.data.len() > max_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "audio exceeds maximum size: {} bytes (limit: {} bytes)",
            upload.data.len(),
            max_bytes
        )));
    }

    let text = match conversation
        .transcribe(&upload.data, &upload.filename)
        .await
    {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!(
                bytes = upload.data.len(),
                filename = %upload.filename,
                "transcription failed, returning empty text: {}",
                e
            );
            String::new()
        }
    };

    if !text.is_empty() {
        tracing::info!(text = %preview(&text, LOG_PREVIEW_CHARS), "transcribed audio");
    }
    Ok(Json(TranscriptionResult::new(text)))
}

/// Handler for `POST /respond`.
///
/// Generates a reply and speaks it. A failed generation is replaced by
/// [`GENERATION_FALLBACK`] (which is still synthesized); a failed synthesis
/// yields empty audio.
pub async fn respond_handler(
    Extension(state): Extension<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ConversationReply>, ApiError> {
    let conversation = require_conversation(&state)?;
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    if request.is_blank() {
        return Ok(Json(ConversationReply::empty()));
    }

    let response_text = conversation
        .generate(&request.text)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                input = %preview(&request.text, LOG_PREVIEW_CHARS),
                "generation failed, using fallback reply: {}",
                e
            );
            GENERATION_FALLBACK.to_string()
        });

    let audio = conversation
        .synthesize(&response_text)
        .await
        .unwrap_or_else(|e| {
            tracing::warn!(
                text = %preview(&response_text, LOG_PREVIEW_CHARS),
                "speech synthesis failed, returning no audio: {}",
                e
            );
            Vec::new()
        });

    tracing::info!(
        response = %preview(&response_text, LOG_PREVIEW_CHARS),
        audio_bytes = audio.len(),
        "generated response"
    );

    Ok(Json(ConversationReply {
        response_text,
        audio: BASE64_STANDARD.encode(&audio),
    }))
}
