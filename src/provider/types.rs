use futures_core::future::BoxFuture;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub text: String,
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub model: String,

    /// Ordered role-tagged blocks, system instruction first.
    pub messages: Vec<Message>,
}

/// Failure of a single text-generation call.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("no API key configured (set GEMINI_API_KEY or google.api_key in config.toml)")]
    MissingCredential,

    #[error("network error: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

/// Text-generation service.
///
/// `Ok(None)` means the call went through but the model produced no usable text.
pub trait Provider {
    fn name(&self) -> &'static str;

    fn generate(&self, req: GenerateRequest) -> BoxFuture<'static, Result<Option<String>, ServiceError>>;
}
