//! Agent invocation
//!
//! One prompt in, one answer string out. Two transports exist (a local
//! development endpoint and the hosted runtime); the choice is made once at
//! startup and everything downstream only sees [`AgentService`].

mod error;
mod http;
mod local;
mod response;
mod runtime;

pub use error::{InvokeError, InvokeErrorKind};
pub use local::LocalAgent;
pub use response::clean_response;
pub use runtime::RuntimeAgent;

use crate::auth::AuthProvider;
use crate::config::{ChatConfig, DeploymentMode};
use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for agent backends
#[async_trait]
pub trait AgentService: Send + Sync {
    /// Send a single, context-free prompt and return the raw answer text
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError>;

    fn mode(&self) -> DeploymentMode;
}

/// The transport selected for this deployment
pub enum AgentTransport {
    Local(LocalAgent),
    Runtime(RuntimeAgent),
}

impl AgentTransport {
    pub fn from_config(config: &ChatConfig, auth: Arc<dyn AuthProvider>) -> Self {
        match config.mode {
            DeploymentMode::Local => Self::Local(LocalAgent::new(&config.local_url)),
            DeploymentMode::Runtime => Self::Runtime(RuntimeAgent::new(
                &config.runtime_base_url(),
                config.runtime_arn.clone(),
                auth,
            )),
        }
    }
}

#[async_trait]
impl AgentService for AgentTransport {
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        match self {
            Self::Local(agent) => agent.invoke(prompt).await,
            Self::Runtime(agent) => agent.invoke(prompt).await,
        }
    }

    fn mode(&self) -> DeploymentMode {
        match self {
            Self::Local(_) => DeploymentMode::Local,
            Self::Runtime(_) => DeploymentMode::Runtime,
        }
    }
}

/// Logging wrapper for agent services
pub struct LoggingService {
    inner: Arc<dyn AgentService>,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn AgentService>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl AgentService for LoggingService {
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        let start = std::time::Instant::now();
        let result = self.inner.invoke(prompt).await;
        let duration = start.elapsed();

        match &result {
            Ok(answer) => {
                tracing::info!(
                    mode = %self.inner.mode(),
                    duration_ms = %duration.as_millis(),
                    prompt_len = prompt.len(),
                    answer_len = answer.len(),
                    "Agent invocation completed"
                );
            }
            Err(e) if e.kind.is_preflight() => {
                tracing::warn!(
                    mode = %self.inner.mode(),
                    kind = ?e.kind,
                    error = %e.message,
                    "Agent invocation not attempted"
                );
            }
            Err(e) => {
                tracing::error!(
                    mode = %self.inner.mode(),
                    duration_ms = %duration.as_millis(),
                    kind = ?e.kind,
                    status = ?e.status,
                    error = %e.message,
                    "Agent invocation failed"
                );
            }
        }

        result
    }

    fn mode(&self) -> DeploymentMode {
        self.inner.mode()
    }
}

/// Build the service for this deployment, wrapped with logging
pub fn build_agent(config: &ChatConfig, auth: Arc<dyn AuthProvider>) -> Arc<dyn AgentService> {
    let transport: Arc<dyn AgentService> = Arc::new(AgentTransport::from_config(config, auth));
    Arc::new(LoggingService::new(transport))
}
