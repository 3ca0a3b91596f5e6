//! Mock collaborators for testing
//!
//! These mocks let the controller and adapters be exercised without a
//! network, a terminal or an identity provider.

use super::{Feedback, FeedbackSink, Message};
use crate::agent::{AgentService, InvokeError};
use crate::auth::{AuthProvider, AuthUser};
use crate::clipboard::Clipboard;
use crate::config::DeploymentMode;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::io;
use std::sync::Mutex;

// ============================================================================
// Mock Agent
// ============================================================================

/// Agent that returns queued answers and records every prompt
pub struct MockAgent {
    mode: DeploymentMode,
    responses: Mutex<VecDeque<Result<String, InvokeError>>>,
    prompts: Mutex<Vec<String>>,
}

impl MockAgent {
    pub fn new(mode: DeploymentMode) -> Self {
        Self {
            mode,
            responses: Mutex::new(VecDeque::new()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn queue_answer(&self, answer: impl Into<String>) {
        self.responses.lock().unwrap().push_back(Ok(answer.into()));
    }

    pub fn queue_error(&self, error: InvokeError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentService for MockAgent {
    async fn invoke(&self, prompt: &str) -> Result<String, InvokeError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(InvokeError::transport("No mock response queued")))
    }

    fn mode(&self) -> DeploymentMode {
        self.mode
    }
}

// ============================================================================
// Mock Auth
// ============================================================================

/// Identity provider with a settable session
pub struct MockAuth {
    session: Mutex<Option<(String, AuthUser)>>,
    sign_outs: Mutex<usize>,
}

impl MockAuth {
    pub fn signed_out() -> Self {
        Self {
            session: Mutex::new(None),
            sign_outs: Mutex::new(0),
        }
    }

    pub fn with_token(token: &str) -> Self {
        let auth = Self::signed_out();
        auth.sign_in(token, "tester@example.com");
        auth
    }

    pub fn sign_in(&self, token: &str, email: &str) {
        *self.session.lock().unwrap() = Some((token.to_string(), AuthUser::new(email)));
    }

    pub fn sign_out_count(&self) -> usize {
        *self.sign_outs.lock().unwrap()
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn access_token(&self) -> Option<String> {
        self.session.lock().unwrap().as_ref().map(|(token, _)| token.clone())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.session.lock().unwrap().as_ref().map(|(_, user)| user.clone())
    }

    async fn sign_out(&self) {
        *self.session.lock().unwrap() = None;
        *self.sign_outs.lock().unwrap() += 1;
    }
}

// ============================================================================
// Mock Clipboard
// ============================================================================

pub struct MockClipboard {
    contents: Mutex<Vec<String>>,
    fail_next: Mutex<bool>,
}

impl MockClipboard {
    pub fn new() -> Self {
        Self {
            contents: Mutex::new(Vec::new()),
            fail_next: Mutex::new(false),
        }
    }

    pub fn fail_next(&self) {
        *self.fail_next.lock().unwrap() = true;
    }

    pub fn contents(&self) -> Vec<String> {
        self.contents.lock().unwrap().clone()
    }
}

impl Clipboard for MockClipboard {
    fn write_text(&self, text: &str) -> io::Result<()> {
        if std::mem::take(&mut *self.fail_next.lock().unwrap()) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal went away"));
        }
        self.contents.lock().unwrap().push(text.to_string());
        Ok(())
    }
}

// ============================================================================
// Recording Feedback Sink
// ============================================================================

pub struct RecordingFeedbackSink {
    recorded: Mutex<Vec<(usize, Feedback)>>,
}

impl RecordingFeedbackSink {
    pub fn new() -> Self {
        Self {
            recorded: Mutex::new(Vec::new()),
        }
    }

    pub fn recorded(&self) -> Vec<(usize, Feedback)> {
        self.recorded.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedbackSink for RecordingFeedbackSink {
    async fn record(&self, index: usize, message: &Message, feedback: Feedback) {
        assert!(message.feedback_submitting, "feedback recorded outside submission");
        self.recorded.lock().unwrap().push((index, feedback));
    }
}
