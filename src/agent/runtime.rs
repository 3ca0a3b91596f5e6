//! Hosted agent runtime

use super::http::{build_client, read_answer, request_failed};
use super::InvokeError;
use crate::auth::AuthProvider;
use reqwest::Client;
use serde::Serialize;
use std::sync::Arc;

const TARGET: &str = "Agent runtime";

/// Agent reached through the hosted runtime API with a bearer token
pub struct RuntimeAgent {
    client: Client,
    base_url: String,
    runtime_arn: Option<String>,
    auth: Arc<dyn AuthProvider>,
}

#[derive(Debug, Serialize)]
struct RuntimeRequest<'a> {
    mode: &'static str,
    input: RuntimeInput<'a>,
}

#[derive(Debug, Serialize)]
struct RuntimeInput<'a> {
    prompt: &'a str,
}

impl RuntimeAgent {
    pub fn new(base_url: &str, runtime_arn: Option<String>, auth: Arc<dyn AuthProvider>) -> Self {
        Self {
            client: build_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
            runtime_arn,
            auth,
        }
    }

    /// The ARN is escaped into a single path segment.
    ///
    /// Everything outside `A-Za-z0-9-_.~` is percent-encoded, `!*'()` included.
    /// The server decodes escaped and literal forms of those alike.
    pub fn invocation_url(&self, runtime_arn: &str) -> String {
        format!(
            "{}/runtimes/{}/invocations?qualifier=DEFAULT",
            self.base_url,
            urlencoding::encode(runtime_arn)
        )
    }

    pub async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        let runtime_arn = self
            .runtime_arn
            .as_deref()
            .filter(|arn| !arn.is_empty())
            .ok_or_else(|| {
                InvokeError::not_configured(
                    "Agent runtime ARN not configured. Set AGENT_CHAT_RUNTIME_ARN.",
                )
            })?;

        let token = self
            .auth
            .access_token()
            .await
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                InvokeError::not_authenticated("Not authenticated - no access token available")
            })?;

        let url = self.invocation_url(runtime_arn);
        tracing::debug!(url = %url, "Invoking agent runtime");

        let response = self
            .client
            .post(&url)
            .header("content-type", "application/json")
            .header("authorization", format!("Bearer {token}"))
            .header("accept", "application/json")
            .json(&RuntimeRequest {
                mode: "single",
                input: RuntimeInput { prompt },
            })
            .send()
            .await
            .map_err(|e| request_failed(TARGET, &e))?;

        read_answer(TARGET, response).await
    }
}
