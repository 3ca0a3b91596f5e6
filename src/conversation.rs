//! Chat conversation: messages, suggestions, feedback and the controller
//! that ties them to the agent.

mod controller;
mod feedback;
mod message;
mod prompts;

#[cfg(test)]
pub mod testing;

pub use controller::{ChatContext, ChatController, ChatError, SendOutcome};
pub use feedback::{Feedback, FeedbackSink, LogFeedbackSink};
pub use message::{Message, Role, Transcript};
pub use prompts::SupportPrompt;
