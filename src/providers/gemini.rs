//! Gemini provider implementation using the `generateContent` API.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::BackendConfig;
use crate::credentials::ApiKey;

use super::{
    check_http_response, BackendError, GenerateRequest, GenerativeBackend, ResponseFormat,
};

const API_VERSION_PATH: &str = "v1beta/models";
const JSON_MIME_TYPE: &str = "application/json";

// ---------------------------------------------------------------------------
// Wire types (pub for integration testing)
// ---------------------------------------------------------------------------

/// `generateContent` request body.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiRequest {
    /// System instruction, sent without a role.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<GeminiContent>,
    /// Ordered conversation turns.
    pub contents: Vec<GeminiContent>,
    /// Sampling settings.
    pub generation_config: GenerationConfig,
}

/// A content block: a role and its text parts.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    /// "user" or "model"; absent on the system instruction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Text parts.
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A text part.
#[doc(hidden)]
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    /// Part text. Non-text parts deserialize with no text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Sampling settings.
#[doc(hidden)]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Sampling temperature.
    pub temperature: f32,
    /// Output token cap.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,
    /// Forces JSON output when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
}

/// `generateContent` response body.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    /// Candidate completions; the first one is used.
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    /// Present when the prompt itself was blocked.
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

/// One candidate completion.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiCandidate {
    /// Generated content; missing when the candidate was filtered.
    #[serde(default)]
    pub content: Option<GeminiContent>,
    /// Why generation stopped.
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Prompt-level safety feedback.
#[doc(hidden)]
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Block reason, if the prompt was rejected.
    #[serde(default)]
    pub block_reason: Option<String>,
}

// ---------------------------------------------------------------------------
// Provider
// ---------------------------------------------------------------------------

/// Gemini `generateContent` backend.
#[derive(Debug, Clone)]
pub struct GeminiProvider {
    model: String,
    base_url: String,
    temperature: f32,
    max_output_tokens: Option<u32>,
    api_key: ApiKey,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Create a provider from backend settings and a resolved API key.
    ///
    /// # Errors
    ///
    /// Returns `BackendError::Network` if the HTTP client cannot be built.
    pub fn new(settings: &BackendConfig, api_key: ApiKey) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            model: settings.model.clone(),
            base_url: settings.base_url.trim_end_matches('/').to_owned(),
            temperature: settings.temperature,
            max_output_tokens: settings.max_output_tokens,
            api_key,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{API_VERSION_PATH}/{}:generateContent",
            self.base_url, self.model
        )
    }
}

// ---------------------------------------------------------------------------
// Request / Response builders (pub for integration testing)
// ---------------------------------------------------------------------------

/// Build a Gemini request body from a generation request.
#[doc(hidden)]
pub fn build_request(
    request: &GenerateRequest,
    temperature: f32,
    max_output_tokens: Option<u32>,
) -> GeminiRequest {
    let system_instruction = if request.system_instruction.is_empty() {
        None
    } else {
        Some(GeminiContent {
            role: None,
            parts: vec![GeminiPart {
                text: Some(request.system_instruction.clone()),
            }],
        })
    };

    let contents = request
        .turns
        .iter()
        .map(|turn| GeminiContent {
            role: Some(turn.role.as_str().to_owned()),
            parts: vec![GeminiPart {
                text: Some(turn.text.clone()),
            }],
        })
        .collect();

    let response_mime_type = match request.response_format {
        ResponseFormat::Text => None,
        ResponseFormat::Json => Some(JSON_MIME_TYPE.to_owned()),
    };

    GeminiRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            temperature,
            max_output_tokens,
            response_mime_type,
        },
    }
}

/// Extract the reply text from a Gemini response body.
///
/// Text parts of the first candidate are concatenated.
///
/// # Errors
///
/// Returns `BackendError::Malformed` if the body does not parse, the prompt
/// was blocked, or the first candidate carries no text.
#[doc(hidden)]
pub fn parse_response(body: &str) -> Result<String, BackendError> {
    let resp: GeminiResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Malformed(e.to_string()))?;

    let Some(candidate) = resp.candidates.into_iter().next() else {
        let reason = resp
            .prompt_feedback
            .and_then(|f| f.block_reason)
            .map_or_else(|| "no candidates".to_owned(), |r| format!("prompt blocked: {r}"));
        return Err(BackendError::Malformed(reason));
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        let reason = candidate.finish_reason.unwrap_or_else(|| "unknown".to_owned());
        return Err(BackendError::Malformed(format!(
            "candidate has no text (finish reason: {reason})"
        )));
    }
    Ok(text)
}

// ---------------------------------------------------------------------------
// Trait impl
// ---------------------------------------------------------------------------

#[async_trait::async_trait]
impl GenerativeBackend for GeminiProvider {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError> {
        let api_request = build_request(request, self.temperature, self.max_output_tokens);
        debug!(
            model = %self.model,
            turns = api_request.contents.len(),
            "sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .header("content-type", "application/json")
            .json(&api_request)
            .send()
            .await?;

        let payload = check_http_response(response).await?;
        parse_response(&payload)
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
