//! Agent invocation error types

use thiserror::Error;

/// Invocation error with classification
#[derive(Debug, Error)]
#[error("{message}")]
pub struct InvokeError {
    pub kind: InvokeErrorKind,
    pub message: String,
    /// HTTP status, when the server answered
    pub status: Option<u16>,
}

impl InvokeError {
    pub fn new(kind: InvokeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(InvokeErrorKind::Transport, message)
    }

    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::new(InvokeErrorKind::MalformedResponse, message)
    }

    pub fn not_configured(message: impl Into<String>) -> Self {
        Self::new(InvokeErrorKind::NotConfigured, message)
    }

    pub fn not_authenticated(message: impl Into<String>) -> Self {
        Self::new(InvokeErrorKind::NotAuthenticated, message)
    }
}

/// Error classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvokeErrorKind {
    /// Non-2xx status, or the request never got a status back
    Transport,
    /// 2xx body that is not JSON
    MalformedResponse,
    /// Runtime identifier missing; raised before any request
    NotConfigured,
    /// No access token available; raised before any request
    NotAuthenticated,
}

impl InvokeErrorKind {
    /// Whether the error was raised before anything went on the wire
    pub fn is_preflight(self) -> bool {
        matches!(self, Self::NotConfigured | Self::NotAuthenticated)
    }
}
