//! Per-message feedback

use super::Message;
use async_trait::async_trait;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    Helpful,
    NotHelpful,
}

impl Feedback {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Helpful => "helpful",
            Self::NotHelpful => "not-helpful",
        }
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where feedback choices go once the user makes them
#[async_trait]
pub trait FeedbackSink: Send + Sync {
    async fn record(&self, index: usize, message: &Message, feedback: Feedback);
}

/// Records feedback as structured log events
pub struct LogFeedbackSink;

#[async_trait]
impl FeedbackSink for LogFeedbackSink {
    async fn record(&self, index: usize, message: &Message, feedback: Feedback) {
        tracing::info!(
            message_index = index,
            feedback = %feedback,
            sent_at = %message.sent_at.to_rfc3339(),
            text_len = message.text.len(),
            "Message feedback recorded"
        );
    }
}
