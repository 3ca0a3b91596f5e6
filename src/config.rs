//! Client configuration
//!
//! Read once from the environment at startup and passed explicitly to
//! everything that needs it.

use std::fmt;

const DEFAULT_REGION: &str = "us-west-2";
const DEFAULT_LOCAL_URL: &str = "http://localhost:8080";

/// Which backend shape the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeploymentMode {
    /// Co-located development endpoint, no bearer token
    Local,
    /// Hosted agent runtime behind bearer-token auth
    Runtime,
}

impl DeploymentMode {
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Runtime)
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Local => f.write_str("local"),
            Self::Runtime => f.write_str("runtime"),
        }
    }
}

/// Configuration for the chat client
#[derive(Debug, Clone)]
pub struct ChatConfig {
    pub mode: DeploymentMode,
    pub region: String,
    /// Runtime ARN; required in runtime mode, checked at invocation time
    pub runtime_arn: Option<String>,
    /// Base URL of the local agent; `/invocations` is appended
    pub local_url: String,
    /// Replaces the region-derived runtime host (e.g. a proxy or a test server)
    pub runtime_endpoint: Option<String>,
    /// Seeds the token session so a prior sign-in survives restarts
    pub access_token: Option<String>,
}

impl ChatConfig {
    pub fn from_env() -> Self {
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mode = if var("AGENT_CHAT_LOCAL_DEV").as_deref() == Some("true") {
            DeploymentMode::Local
        } else {
            DeploymentMode::Runtime
        };

        Self {
            mode,
            region: var("AGENT_CHAT_REGION").unwrap_or_else(|| DEFAULT_REGION.to_string()),
            runtime_arn: var("AGENT_CHAT_RUNTIME_ARN"),
            local_url: var("AGENT_CHAT_LOCAL_URL").unwrap_or_else(|| DEFAULT_LOCAL_URL.to_string()),
            runtime_endpoint: var("AGENT_CHAT_RUNTIME_ENDPOINT"),
            access_token: var("AGENT_CHAT_ACCESS_TOKEN"),
        }
    }

    /// Base URL of the hosted runtime service for the configured region
    pub fn runtime_base_url(&self) -> String {
        match &self.runtime_endpoint {
            Some(endpoint) => endpoint.trim_end_matches('/').to_string(),
            None => format!("https://bedrock-agentcore.{}.amazonaws.com", self.region),
        }
    }
}
