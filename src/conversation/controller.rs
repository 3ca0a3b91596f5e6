//! Conversation controller
//!
//! Owns the transcript and the bits of view state around it (input field,
//! error banner, suggestions, auth prompt) and drives the agent. All
//! collaborators come in through [`ChatContext`].

use super::prompts::{support_prompts, SupportPrompt};
use super::{Feedback, FeedbackSink, Message, Transcript};
use crate::agent::{clean_response, AgentService, InvokeErrorKind};
use crate::auth::{AuthProvider, AuthUser, LOCAL_DEV_EMAIL};
use crate::clipboard::Clipboard;
use crate::config::DeploymentMode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

/// How long a message shows as copied
pub const COPY_CONFIRMATION: Duration = Duration::from_millis(1500);

pub const EMPTY_PROMPT_ERROR: &str = "Please enter a prompt";
const FALLBACK_ERROR: &str = "Failed to get response from agent";

/// Everything the controller needs from the outside, built once at startup
pub struct ChatContext {
    pub mode: DeploymentMode,
    pub agent: Arc<dyn AgentService>,
    pub auth: Arc<dyn AuthProvider>,
    pub clipboard: Arc<dyn Clipboard>,
    pub feedback: Arc<dyn FeedbackSink>,
}

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("No message #{}", .0 + 1)]
    NoSuchMessage(usize),
    #[error("Message #{} is not an agent reply", .0 + 1)]
    NotAgentMessage(usize),
    #[error("No suggestion #{}", .0 + 1)]
    NoSuchPrompt(usize),
    #[error("Copy failed: {0}")]
    Clipboard(#[from] std::io::Error),
}

/// What happened to a send request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The agent answered and the reply was appended
    Replied,
    /// Sign-in is needed first; nothing was sent
    AuthRequired,
    /// The prompt was blank; nothing was sent
    EmptyPrompt,
    /// The invocation failed; the error banner holds the reason
    Failed,
}

pub struct ChatController {
    ctx: ChatContext,
    transcript: Transcript,
    input: String,
    error: Option<String>,
    user: Option<AuthUser>,
    copied: HashMap<usize, Instant>,
    loading: bool,
    show_support_prompts: bool,
    auth_prompt_visible: bool,
}

impl ChatController {
    pub fn new(ctx: ChatContext) -> Self {
        Self {
            ctx,
            transcript: Transcript::new(),
            input: String::new(),
            error: None,
            user: None,
            copied: HashMap::new(),
            loading: false,
            show_support_prompts: true,
            auth_prompt_visible: false,
        }
    }

    // ==================== Auth ====================

    /// Refresh the signed-in user from the identity collaborator
    pub async fn check_auth(&mut self) {
        self.user = match self.ctx.mode {
            DeploymentMode::Local => Some(AuthUser::new(LOCAL_DEV_EMAIL)),
            DeploymentMode::Runtime => self.ctx.auth.current_user().await,
        };
        tracing::debug!(user = ?self.user.as_ref().map(|u| &u.email), "Auth checked");
    }

    /// Whether a send would pass the sign-in gate
    pub fn signed_in_or_local(&self) -> bool {
        !self.ctx.mode.requires_auth() || self.user.is_some()
    }

    /// Ask the surrounding UI to show its sign-in flow
    pub fn request_sign_in(&mut self) {
        if self.ctx.mode.requires_auth() {
            self.auth_prompt_visible = true;
        }
    }

    pub fn dismiss_auth_prompt(&mut self) {
        self.auth_prompt_visible = false;
    }

    /// The sign-in flow finished; pick up the new session
    pub async fn sign_in_completed(&mut self) {
        self.auth_prompt_visible = false;
        self.check_auth().await;
    }

    pub async fn sign_out(&mut self) {
        if !self.ctx.mode.requires_auth() {
            return;
        }
        self.ctx.auth.sign_out().await;
        self.user = None;
    }

    // ==================== Sending ====================

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Send whatever is in the input field.
    ///
    /// The input is cleared before the request goes out. On failure the
    /// user message stays in the transcript and no agent message is added.
    pub async fn send(&mut self) -> SendOutcome {
        if !self.signed_in_or_local() {
            tracing::info!("Sign-in required before sending");
            self.auth_prompt_visible = true;
            return SendOutcome::AuthRequired;
        }

        if self.input.trim().is_empty() {
            self.error = Some(EMPTY_PROMPT_ERROR.to_string());
            return SendOutcome::EmptyPrompt;
        }

        self.show_support_prompts = false;
        let prompt = std::mem::take(&mut self.input);
        self.transcript.push(Message::user(prompt.as_str()));
        self.loading = true;
        self.error = None;

        let outcome = match self.ctx.agent.invoke(&prompt).await {
            Ok(raw) => {
                self.transcript.push(Message::agent(clean_response(&raw)));
                self.show_support_prompts = true;
                SendOutcome::Replied
            }
            Err(e) => {
                if e.kind == InvokeErrorKind::NotAuthenticated {
                    self.auth_prompt_visible = true;
                }
                self.error = Some(if e.message.is_empty() {
                    FALLBACK_ERROR.to_string()
                } else {
                    e.message
                });
                SendOutcome::Failed
            }
        };

        self.loading = false;
        outcome
    }

    // ==================== Affordances ====================

    /// Suggestions to show, if they are currently visible
    pub fn support_prompts(&self) -> Option<&'static [SupportPrompt]> {
        self.show_support_prompts
            .then(|| support_prompts(self.transcript.messages()))
    }

    /// Put suggestion `index` into the input field and hide the suggestions
    pub fn select_support_prompt(&mut self, index: usize) -> Result<&'static str, ChatError> {
        let prompt = self
            .support_prompts()
            .and_then(|prompts| prompts.get(index))
            .ok_or(ChatError::NoSuchPrompt(index))?;
        tracing::debug!(prompt_id = prompt.id, "Support prompt selected");
        self.input = prompt.text.to_string();
        self.show_support_prompts = false;
        Ok(prompt.text)
    }

    /// Attach feedback to an agent message.
    ///
    /// Returns `false` when the message already carries this feedback.
    pub async fn give_feedback(&mut self, index: usize, feedback: Feedback) -> Result<bool, ChatError> {
        let message = self
            .transcript
            .get_mut(index)
            .ok_or(ChatError::NoSuchMessage(index))?;
        if !message.is_agent() {
            return Err(ChatError::NotAgentMessage(index));
        }
        if message.feedback == Some(feedback) {
            return Ok(false);
        }

        message.feedback = Some(feedback);
        message.feedback_submitting = true;
        let snapshot = message.clone();

        self.ctx.feedback.record(index, &snapshot, feedback).await;

        if let Some(message) = self.transcript.get_mut(index) {
            message.feedback_submitting = false;
        }
        Ok(true)
    }

    /// Copy an agent message to the clipboard
    pub fn copy_message(&mut self, index: usize) -> Result<(), ChatError> {
        let message = self
            .transcript
            .get(index)
            .ok_or(ChatError::NoSuchMessage(index))?;
        if !message.is_agent() {
            return Err(ChatError::NotAgentMessage(index));
        }

        if let Err(e) = self.ctx.clipboard.write_text(&message.text) {
            tracing::error!(message_index = index, error = %e, "Copy failed");
            return Err(e.into());
        }

        self.copied.insert(index, Instant::now());
        Ok(())
    }

    /// Whether message `index` was copied within the confirmation window
    pub fn copy_confirmed(&self, index: usize) -> bool {
        self.copy_confirmed_at(index, Instant::now())
    }

    fn copy_confirmed_at(&self, index: usize, now: Instant) -> bool {
        self.copied
            .get(&index)
            .is_some_and(|at| now.saturating_duration_since(*at) < COPY_CONFIRMATION)
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    // ==================== View state ====================

    pub fn messages(&self) -> &[Message] {
        self.transcript.messages()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn user(&self) -> Option<&AuthUser> {
        self.user.as_ref()
    }

    pub fn mode(&self) -> DeploymentMode {
        self.ctx.mode
    }

    #[allow(dead_code)] // Only observable between awaits; used in tests
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn auth_prompt_visible(&self) -> bool {
        self.auth_prompt_visible
    }
}
