//! Suggested follow-up prompts
//!
//! Suggestions are picked from fixed sets by looking for keywords in the
//! latest agent reply. Rules are checked in order and the first match wins.

use super::message::last_agent_message;
use super::Message;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportPrompt {
    pub id: &'static str,
    pub text: &'static str,
}

const fn prompt(id: &'static str, text: &'static str) -> SupportPrompt {
    SupportPrompt { id, text }
}

const WELCOME: &[SupportPrompt] = &[
    prompt("calc", "What is 123 + 456?"),
    prompt("weather", "What's the weather like today?"),
    prompt("table", "Create a comparison table of 3 AWS services"),
    prompt("math", "Calculate 2048 * 1024 and explain the result"),
];

const CALCULATION: &[SupportPrompt] = &[
    prompt("another-calc", "Can you do another calculation?"),
    prompt("weather-follow", "What's the weather?"),
    prompt("explain", "Can you explain that in more detail?"),
];

const WEATHER: &[SupportPrompt] = &[
    prompt("calc-follow", "What is 999 + 111?"),
    prompt("table-follow", "Show me a table with sample data"),
    prompt("thanks", "Thank you!"),
];

const TABLE: &[SupportPrompt] = &[
    prompt("another-table", "Create another table with different data"),
    prompt("calc-after-table", "Calculate 15 * 12"),
    prompt("format", "Can you format that differently?"),
];

const FALLBACK: &[SupportPrompt] = &[
    prompt("more", "Tell me more"),
    prompt("calc-default", "Do a calculation"),
    prompt("weather-default", "Check the weather"),
];

const CALCULATION_KEYWORDS: &[&str] = &["result", "sum", "calculation"];
const WEATHER_KEYWORDS: &[&str] = &["weather", "sunny", "°f"];
const TABLE_KEYWORDS: &[&str] = &["|", "table"];

/// Which suggestion set applies
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptSet {
    Welcome,
    Calculation,
    Weather,
    Table,
    Fallback,
}

impl PromptSet {
    pub fn for_messages(messages: &[Message]) -> Self {
        if messages.is_empty() {
            return Self::Welcome;
        }

        let Some(reply) = last_agent_message(messages) else {
            return Self::Fallback;
        };
        let text = reply.text.to_lowercase();
        let mentions = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if mentions(CALCULATION_KEYWORDS) {
            Self::Calculation
        } else if mentions(WEATHER_KEYWORDS) {
            Self::Weather
        } else if mentions(TABLE_KEYWORDS) {
            Self::Table
        } else {
            Self::Fallback
        }
    }

    pub fn prompts(self) -> &'static [SupportPrompt] {
        match self {
            Self::Welcome => WELCOME,
            Self::Calculation => CALCULATION,
            Self::Weather => WEATHER,
            Self::Table => TABLE,
            Self::Fallback => FALLBACK,
        }
    }
}

pub fn support_prompts(messages: &[Message]) -> &'static [SupportPrompt] {
    PromptSet::for_messages(messages).prompts()
}
