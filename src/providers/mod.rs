//! Generative backend abstraction layer.
//!
//! Defines the [`GenerativeBackend`] trait and the request/response types
//! shared by backend implementations. One backend is implemented:
//! - [`gemini::GeminiProvider`]: Google `generateContent` API

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub mod gemini;

// ---------------------------------------------------------------------------
// Core types
// ---------------------------------------------------------------------------

/// Role label in the backend's vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    /// Human input.
    User,
    /// Model output.
    Model,
}

impl TurnRole {
    /// Wire label.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One entry of the ordered turn list sent to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who said it.
    pub role: TurnRole,
    /// What was said.
    pub text: String,
}

impl Turn {
    /// A `user` turn.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// A `model` turn.
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

/// Output shape requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseFormat {
    /// Free text.
    #[default]
    Text,
    /// A single JSON document.
    Json,
}

/// A generation request.
///
/// `turns` already ends with the new user input; backends submit it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// System instruction, sent out-of-band from the turns.
    pub system_instruction: String,
    /// Ordered history followed by the new input.
    pub turns: Vec<Turn>,
    /// Requested output shape.
    pub response_format: ResponseFormat,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Typed backend failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Transport failure, timeout, or a non-auth error status.
    #[error("network error: {0}")]
    Network(String),
    /// Missing, invalid, or rejected API key.
    #[error("authentication failed: {0}")]
    Auth(String),
    /// The backend answered but the body was unusable.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::Network(format!("request timed out: {err}"));
        }
        if err.is_decode() {
            return Self::Malformed(err.to_string());
        }
        Self::Network(err.to_string())
    }
}

// ---------------------------------------------------------------------------
// HTTP helpers
// ---------------------------------------------------------------------------

/// Check HTTP response status and return body text or a typed error.
///
/// 401 and 403 map to [`BackendError::Auth`]; any other non-2xx status maps
/// to [`BackendError::Network`]. Error bodies are sanitized.
///
/// # Errors
///
/// Returns `BackendError::Network` on transport failure or error status,
/// `BackendError::Auth` on 401/403.
pub async fn check_http_response(response: reqwest::Response) -> Result<String, BackendError> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        return Ok(body);
    }

    let detail = format!("status {}: {}", status.as_u16(), sanitize_http_error_body(&body));
    match status.as_u16() {
        401 | 403 => Err(BackendError::Auth(detail)),
        _ => Err(BackendError::Network(detail)),
    }
}

fn sanitize_http_error_body(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut sanitized = collapsed;
    for pattern in [
        r"AIza[0-9A-Za-z_\-]{20,}",
        r"ya29\.[0-9A-Za-z_\-]{20,}",
        r"sk-[A-Za-z0-9]{32,}",
        r"key=[^&\s]+",
    ] {
        if let Ok(regex) = Regex::new(pattern) {
            sanitized = regex.replace_all(&sanitized, "[REDACTED]").into_owned();
        }
    }

    const MAX_ERROR_BODY_CHARS: usize = 256;
    if sanitized.chars().count() > MAX_ERROR_BODY_CHARS {
        let shortened = sanitized
            .chars()
            .take(MAX_ERROR_BODY_CHARS)
            .collect::<String>();
        return format!("{shortened}...[truncated]");
    }

    sanitized
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Black-box text generator.
///
/// Implementations must be `Send + Sync` so a single instance can be shared
/// between the chat dispatcher and the evaluation lab.
#[async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Generate a reply for `request`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError`] on network, auth, or parse failure.
    async fn generate(&self, request: &GenerateRequest) -> Result<String, BackendError>;

    /// The model identifier this backend is instantiated for.
    fn model_id(&self) -> &str;
}
