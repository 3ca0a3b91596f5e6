//! Local development agent

use super::http::{build_client, read_answer, request_failed};
use super::InvokeError;
use reqwest::Client;
use serde::Serialize;

const TARGET: &str = "Local agent";

/// Agent served from a co-located endpoint, no authentication
pub struct LocalAgent {
    client: Client,
    url: String,
}

#[derive(Debug, Serialize)]
struct LocalRequest<'a> {
    prompt: &'a str,
}

impl LocalAgent {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: build_client(),
            url: format!("{}/invocations", base_url.trim_end_matches('/')),
        }
    }

    #[allow(dead_code)] // Used in tests
    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        tracing::debug!(url = %self.url, "Invoking local agent");

        let response = self
            .client
            .post(&self.url)
            .header("content-type", "application/json")
            .json(&LocalRequest { prompt })
            .send()
            .await
            .map_err(|e| request_failed(TARGET, &e))?;

        read_answer(TARGET, response).await
    }
}
