//! Conversation messages

use super::Feedback;
use chrono::{DateTime, Local};

/// Who wrote a message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Agent,
}

/// A single chat message
#[derive(Debug, Clone)]
pub struct Message {
    pub role: Role,
    pub text: String,
    pub sent_at: DateTime<Local>,
    pub feedback: Option<Feedback>,
    /// Set while the feedback sink is recording a choice
    pub feedback_submitting: bool,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text.into())
    }

    pub fn agent(text: impl Into<String>) -> Self {
        Self::new(Role::Agent, text.into())
    }

    fn new(role: Role, text: String) -> Self {
        Self {
            role,
            text,
            sent_at: Local::now(),
            feedback: None,
            feedback_submitting: false,
        }
    }

    pub fn is_agent(&self) -> bool {
        self.role == Role::Agent
    }
}

/// Ordered, append-only message log. Messages are only ever mutated to
/// attach feedback.
#[derive(Debug, Default)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message, returning its index
    pub fn push(&mut self, message: Message) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn get(&self, index: usize) -> Option<&Message> {
        self.messages.get(index)
    }

    pub(super) fn get_mut(&mut self, index: usize) -> Option<&mut Message> {
        self.messages.get_mut(index)
    }
}

/// Most recent agent reply, ignoring any user messages after it
pub fn last_agent_message(messages: &[Message]) -> Option<&Message> {
    messages.iter().rev().find(|m| m.is_agent())
}
