//! Normalizing agent replies into display text
//!
//! Agents answer in several shapes: a bare JSON string, an object with the
//! answer under one of a handful of conventional keys, or something else
//! entirely. Everything is reduced to one string here.

use serde_json::{Number, Value};

/// Keys that may carry the answer, highest priority first
pub const ANSWER_FIELDS: [&str; 6] = ["result", "response", "content", "text", "message", "output"];

/// Shown when the body carries nothing usable at all
pub const EMPTY_ANSWER: &str = "No response from agent";

/// Pull the answer text out of a parsed response body
pub fn extract_answer(body: &Value) -> String {
    match body {
        Value::String(text) => text.clone(),
        Value::Object(fields) => ANSWER_FIELDS
            .iter()
            .find_map(|name| fields.get(*name).and_then(answer_text))
            .unwrap_or_else(|| body.to_string()),
        Value::Array(_) => body.to_string(),
        Value::Null | Value::Bool(_) | Value::Number(_) => EMPTY_ANSWER.to_string(),
    }
}

/// A field only counts when it holds something; empty and zero-like values
/// fall through to the next candidate.
fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(text) if text.is_empty() => None,
        Value::String(text) => Some(text.clone()),
        Value::Number(n) if is_zero(n) => None,
        other => Some(other.to_string()),
    }
}

fn is_zero(n: &Number) -> bool {
    n.as_f64() == Some(0.0)
}

/// Tidy raw answer text for display.
///
/// Trims, drops one layer of matching enclosing quotes, and turns literal
/// `\n` / `\t` escape sequences into real newlines and tabs.
pub fn clean_response(text: &str) -> String {
    let trimmed = text.trim();
    let unquoted = ['"', '\'']
        .into_iter()
        .find(|q| trimmed.starts_with(*q) && trimmed.ends_with(*q))
        .map_or(trimmed, |q| {
            trimmed
                .strip_prefix(q)
                .and_then(|inner| inner.strip_suffix(q))
                .unwrap_or("")
        });

    unquoted.replace("\\n", "\n").replace("\\t", "\t")
}
