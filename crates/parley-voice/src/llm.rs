use crate::config::OpenAiConfig;
use crate::error::VoiceError;
use crate::openai::{describe_failure, OpenAiHttp};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Reply-generation capability: one user turn in, one assistant turn out.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    async fn generate(&self, text: &str) -> Result<String, VoiceError>;

    fn provider_name(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

/// Chat completion through `POST /chat/completions` with a fixed system
/// prompt.
#[derive(Debug, Clone)]
pub struct OpenAiChat {
    http: OpenAiHttp,
    model: String,
    system_prompt: String,
    max_tokens: u32,
    temperature: f32,
}

impl OpenAiChat {
    pub fn new(http: OpenAiHttp, config: &OpenAiConfig) -> Self {
        Self {
            http,
            model: config.chat_model.clone(),
            system_prompt: config.system_prompt.clone(),
            max_tokens: config.max_tokens,
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl ResponseGenerator for OpenAiChat {
    async fn generate(&self, text: &str) -> Result<String, VoiceError> {
        let body = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: &self.system_prompt,
                },
                ChatMessage {
                    role: "user",
                    content: text,
                },
            ],
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post("chat/completions")
            .json(&body)
            .send()
            .await
            .map_err(|e| VoiceError::Generation(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(VoiceError::Generation(describe_failure(response).await));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| VoiceError::Generation(format!("malformed completion: {}", e)))?;

        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or_else(|| VoiceError::Generation("completion had no content".to_string()))
    }

    fn provider_name(&self) -> &str {
        "openai"
    }
}
