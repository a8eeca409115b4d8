use super::{GenerateRequest, Provider, Role, ServiceError};
use futures_core::future::BoxFuture;

/// Offline provider that echoes the request back, handy for trying the form without a key.
#[derive(Debug, Default, Clone)]
pub struct StubProvider;

impl StubProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Provider for StubProvider {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn generate(&self, req: GenerateRequest) -> BoxFuture<'static, Result<Option<String>, ServiceError>> {
        let asked = req
            .messages
            .iter()
            .filter(|m| m.role == Role::User)
            .map(|m| m.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");

        let reply: Result<Option<String>, ServiceError> = Ok(Some(format!(
            "[stub provider]\nmodel: {}\n\nYou asked: {}\n\n(No model was called; use `--provider google` for real answers.)",
            req.model, asked
        )));
        Box::pin(async move { reply })
    }
}
