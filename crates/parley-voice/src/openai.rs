//! Shared HTTP plumbing for the OpenAI-compatible provider clients.

use crate::config::OpenAiConfig;
use crate::error::VoiceError;
use std::time::Duration;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest slice of a provider error body kept in error messages and logs.
const ERROR_SNIPPET_CHARS: usize = 200;

/// An authenticated HTTP client bound to one API root.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct OpenAiHttp {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAiHttp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiHttp")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl OpenAiHttp {
    pub fn new(config: &OpenAiConfig) -> Result<Self, VoiceError> {
        if !config.is_enabled() {
            return Err(VoiceError::NotConfigured("OpenAI".to_string()));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| VoiceError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Starts an authenticated `POST` to `path` under the API root.
    pub(crate) fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client
            .post(self.endpoint(path))
            .bearer_auth(&self.api_key)
    }
}

/// Reads a non-2xx response into a short diagnostic string.
pub(crate) async fn describe_failure(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    format!(
        "provider returned {}: {}",
        status,
        preview(body.trim(), ERROR_SNIPPET_CHARS)
    )
}

/// Returns at most `max_chars` characters of `text`, marking truncation
/// with `...`.
pub fn preview(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}
