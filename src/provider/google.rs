use super::{GenerateRequest, Message, Provider, Role, ServiceError};
use anyhow::Context;
use futures_core::future::BoxFuture;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/";

#[derive(Clone)]
pub struct GoogleProvider {
    http: reqwest::Client,
    api_key: Option<String>,
    api_base: Url,
}

impl fmt::Debug for GoogleProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoogleProvider")
            .field("api_base", &self.api_base.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl GoogleProvider {
    /// The key is not checked here; a missing key fails each call instead.
    pub fn new(http: reqwest::Client, api_key: Option<String>) -> anyhow::Result<Self> {
        Self::with_api_base(http, api_key, DEFAULT_API_BASE)
    }

    pub fn with_api_base(http: reqwest::Client, api_key: Option<String>, api_base: &str) -> anyhow::Result<Self> {
        let mut api_base =
            Url::parse(api_base).with_context(|| format!("invalid Gemini API base URL: {api_base}"))?;
        // Url::join drops the last segment unless the base ends with a slash.
        if !api_base.path().ends_with('/') {
            let path = format!("{}/", api_base.path());
            api_base.set_path(&path);
        }

        Ok(Self {
            http,
            api_key,
            api_base,
        })
    }

    fn build_url(&self, model: &str, key: &str) -> Result<Url, ServiceError> {
        // Docs: https://ai.google.dev/api/generate-content
        let mut url = self
            .api_base
            .join(&format!("v1beta/models/{model}:generateContent"))
            .map_err(|e| ServiceError::InvalidRequest(format!("bad model name {model:?}: {e}")))?;
        url.query_pairs_mut().append_pair("key", key);
        Ok(url)
    }
}

impl Provider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn generate(&self, req: GenerateRequest) -> BoxFuture<'static, Result<Option<String>, ServiceError>> {
        Box::pin(self.clone().send(req))
    }
}

impl GoogleProvider {
    async fn send(self, req: GenerateRequest) -> Result<Option<String>, ServiceError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ServiceError::MissingCredential)?;
        let url = self.build_url(&req.model, key)?;
        let body = GenerateContentRequest::from_messages(&req.messages);

        tracing::debug!(model = %req.model, messages = req.messages.len(), "sending generateContent request");

        // The URL carries the key; keep it out of anything that gets displayed.
        let resp = self
            .http
            .post(url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url()))?;

        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|e| ServiceError::Transport(e.without_url()))?;

        if !status.is_success() {
            return Err(ServiceError::Api {
                status: status.as_u16(),
                message: api_error_message(&bytes, status),
            });
        }

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|e| ServiceError::Malformed(e.to_string()))?;

        if let Some(reason) = parsed.prompt_feedback.as_ref().and_then(|f| f.block_reason.as_deref()) {
            tracing::debug!(reason, "prompt was blocked");
        }

        Ok(extract_text(&parsed))
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
}

impl GenerateContentRequest {
    fn from_messages(messages: &[Message]) -> Self {
        let system: Vec<Part> = messages
            .iter()
            .filter(|m| m.role == Role::System)
            .map(|m| Part {
                text: Some(m.text.clone()),
            })
            .collect();

        // Gemini has no system role inside contents; it takes a separate instruction.
        let contents = messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| Content {
                role: Some(m.role.as_str().to_string()),
                parts: vec![Part {
                    text: Some(m.text.clone()),
                }],
            })
            .collect();

        Self {
            system_instruction: (!system.is_empty()).then_some(Content {
                role: None,
                parts: system,
            }),
            contents,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Clone, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
}

fn api_error_message(body: &[u8], status: reqwest::StatusCode) -> String {
    if let Ok(env) = serde_json::from_slice::<ApiErrorEnvelope>(body) {
        return match env.error.status {
            Some(s) if !env.error.message.is_empty() => format!("{s}: {}", env.error.message),
            Some(s) => s,
            None => env.error.message,
        };
    }

    let raw = String::from_utf8_lossy(body).trim().to_string();
    if raw.is_empty() {
        status.canonical_reason().unwrap_or("unknown error").to_string()
    } else {
        raw
    }
}

fn extract_text(r: &GenerateContentResponse) -> Option<String> {
    // Concatenate all text parts of the first candidate.
    let cand = r.candidates.first()?;
    let content = cand.content.as_ref()?;
    let mut out = String::new();
    for p in &content.parts {
        if let Some(t) = &p.text {
            out.push_str(t);
        }
    }
    if out.trim().is_empty() { None } else { Some(out) }
}
