//! OpenAI speech API backend
//!
//! Calls the `/audio/speech` endpoint and stores the returned audio bytes.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::backend::{AudioHandle, SpeechBackend, SpeechRequest};
use crate::error::{Result, TtsError};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Backend for the OpenAI speech synthesis API
pub struct OpenAiSpeech {
    base_url: String,
    client: Client,
}

impl OpenAiSpeech {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Create a backend against a custom base URL (proxies, compatible servers).
    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::new(),
        }
    }
}

impl Default for OpenAiSpeech {
    fn default() -> Self {
        Self::new()
    }
}

// OpenAI API request/response types

#[derive(Debug, Serialize)]
struct SpeechApiRequest<'a> {
    model: &'a str,
    voice: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
    #[serde(default)]
    code: Option<String>,
}

#[async_trait]
impl SpeechBackend for OpenAiSpeech {
    async fn synthesize(
        &self,
        request: &SpeechRequest,
        output_path: &Path,
    ) -> Result<AudioHandle> {
        if request.credential.is_empty() {
            return Err(TtsError::MissingCredential);
        }

        let body = SpeechApiRequest {
            model: request.quality.model_name(),
            voice: request.voice.wire_name(),
            input: &request.text,
        };

        let url = format!("{}/audio/speech", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(
                "Authorization",
                format!("Bearer {}", request.credential.expose()),
            )
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| TtsError::ApiError {
                message: format!("Request failed: {}", e),
                status_code: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse().ok());

            let error_text = response.text().await.unwrap_or_default();
            let (message, code) =
                if let Ok(error_response) = serde_json::from_str::<ErrorResponse>(&error_text) {
                    (error_response.error.message, error_response.error.code)
                } else {
                    (error_text, None)
                };

            return Err(match status.as_u16() {
                401 | 403 => TtsError::InvalidCredential(message),
                429 if code.as_deref() == Some("insufficient_quota") => {
                    TtsError::QuotaExceeded(message)
                }
                429 => TtsError::RateLimited { retry_after },
                other => TtsError::ApiError {
                    message,
                    status_code: Some(other),
                },
            });
        }

        let audio = response.bytes().await.map_err(|e| TtsError::ApiError {
            message: format!("Failed to read audio body: {}", e),
            status_code: None,
        })?;

        std::fs::write(output_path, &audio)?;

        Ok(AudioHandle {
            path: output_path.to_path_buf(),
            size_bytes: audio.len() as u64,
        })
    }

    fn name(&self) -> &'static str {
        "OpenAI"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voice::{QualityTier, Voice};

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let backend = OpenAiSpeech::with_base_url("https://example.com/v1/");
        assert_eq!(backend.base_url, "https://example.com/v1");
    }

    #[test]
    fn test_request_body_shape() {
        let body = SpeechApiRequest {
            model: QualityTier::High.model_name(),
            voice: Voice::Nova.wire_name(),
            input: "Hello world.",
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "tts-1-hd");
        assert_eq!(json["voice"], "nova");
        assert_eq!(json["input"], "Hello world.");
    }

    #[test]
    fn test_error_response_parsing() {
        let text = r#"{"error":{"message":"You exceeded your current quota","code":"insufficient_quota"}}"#;
        let parsed: ErrorResponse = serde_json::from_str(text).unwrap();
        assert_eq!(parsed.error.code.as_deref(), Some("insufficient_quota"));
    }

    #[test]
    fn test_name() {
        assert_eq!(OpenAiSpeech::new().name(), "OpenAI");
    }
}
