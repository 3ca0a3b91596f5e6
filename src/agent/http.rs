//! HTTP plumbing shared by both transports

use super::response::extract_answer;
use super::InvokeError;
use reqwest::{Client, Response};
use serde_json::Value;

pub(super) fn build_client() -> Client {
    // No client-side timeout: the transport's own limits are the only bound.
    Client::builder()
        .build()
        .expect("Failed to create HTTP client")
}

/// Classify a failure that happened before a status came back
pub(super) fn request_failed(target: &str, e: &reqwest::Error) -> InvokeError {
    if e.is_timeout() {
        InvokeError::transport(format!("{target} request timed out: {e}"))
    } else if e.is_connect() {
        InvokeError::transport(format!("Could not connect to {target}: {e}"))
    } else {
        InvokeError::transport(format!("{target} request failed: {e}"))
    }
}

/// Turn a response into answer text.
///
/// Non-2xx statuses and non-JSON bodies are the two failure shapes; the body
/// text is kept in the message either way.
pub(super) async fn read_answer(target: &str, response: Response) -> Result<String, InvokeError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| InvokeError::transport(format!("Failed to read {target} response: {e}")))?;

    tracing::debug!(target_name = %target, status = %status, body_len = body.len(), "Agent response received");

    if !status.is_success() {
        tracing::warn!(target_name = %target, status = %status, body = %body, "Agent returned error status");
        return Err(
            InvokeError::transport(format!("{target} invocation failed: {status} - {body}"))
                .with_status(status.as_u16()),
        );
    }

    let data: Value = serde_json::from_str(&body).map_err(|e| {
        tracing::warn!(target_name = %target, error = %e, "Agent response is not JSON");
        InvokeError::malformed_response(format!("Invalid JSON response from {target}: {body}"))
    })?;

    Ok(extract_answer(&data))
}
