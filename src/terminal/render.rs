//! Text rendering for the terminal
//!
//! Everything returns a `String` so the REPL decides where it goes.

use crate::auth::AuthUser;
use crate::config::DeploymentMode;
use crate::conversation::{ChatController, Message, Role, SupportPrompt};
use crossterm::style::Stylize;
use std::fmt::Write;

const TITLE: &str = "Agent Chat";
const EMPTY_STATE: &str =
    "Start a conversation with the generative AI assistant by typing a message below";

pub const HELP: &str = "\
Type a message and press Enter to send it.
  <Enter> on an empty line   send the staged input (e.g. a suggestion)
  /use N                     stage suggestion N
  /up N, /down N             mark agent message N helpful / not helpful
  /copy N                    copy agent message N to the clipboard
  /history                   show the whole conversation again
  /dismiss                   dismiss the error banner
  /login TOKEN               sign in with an access token
  /logout                    sign out
  /quit                      leave";

pub fn header(mode: DeploymentMode, user: Option<&AuthUser>) -> String {
    match mode {
        DeploymentMode::Local => format!(
            "{} {}",
            format!("{TITLE} (Local Dev)").bold(),
            "· Local Development".dark_grey()
        ),
        DeploymentMode::Runtime => {
            let status = match user {
                Some(user) => format!("· {} | /logout to sign out", user.email),
                None => "· Not signed in | /login TOKEN".to_string(),
            };
            format!("{} {}", TITLE.bold(), status.dark_grey())
        }
    }
}

/// One message, numbered from 1
pub fn message(index: usize, message: &Message, copied: bool) -> String {
    let time = message.sent_at.format("%H:%M:%S").to_string();
    let number = format!("[{}]", index + 1);

    let mut out = match message.role {
        Role::User => format!("{} {} {}", number.dark_grey(), "You".blue().bold(), time.dark_grey()),
        Role::Agent => format!("{} {} {}", number.dark_grey(), "Agent".green().bold(), time.dark_grey()),
    };

    for line in message.text.lines() {
        let _ = write!(out, "\n    {line}");
    }

    if message.is_agent() {
        let mut markers = Vec::new();
        if let Some(feedback) = message.feedback {
            if message.feedback_submitting {
                markers.push(format!("[{feedback}, saving]"));
            } else {
                markers.push(format!("[{feedback}]"));
            }
        }
        if copied {
            markers.push("Copied!".to_string());
        }
        if !markers.is_empty() {
            let _ = write!(out, "\n    {}", markers.join(" ").dark_grey());
        }
    }
    out
}

pub fn error_banner(error: &str) -> String {
    format!("{} {} {}", "✖".red().bold(), error.red(), "(/dismiss)".dark_grey())
}

pub fn support_prompts(prompts: &[SupportPrompt]) -> String {
    let mut out = "Suggestions:".dark_grey().to_string();
    for (i, prompt) in prompts.iter().enumerate() {
        let _ = write!(out, "\n  {} {}", format!("/use {}", i + 1).cyan(), prompt.text);
    }
    out
}

pub fn auth_prompt() -> String {
    format!(
        "{} Paste an access token with {}",
        "Sign in required.".yellow().bold(),
        "/login TOKEN".cyan()
    )
}

pub fn staged_input(input: &str) -> String {
    format!("{} {input}", "Staged (press Enter to send):".dark_grey())
}

pub fn notice(text: &str) -> String {
    text.dark_grey().to_string()
}

/// Messages from `from` onwards
pub fn messages_since(controller: &ChatController, from: usize) -> Vec<String> {
    controller
        .messages()
        .iter()
        .enumerate()
        .skip(from)
        .map(|(i, m)| message(i, m, controller.copy_confirmed(i)))
        .collect()
}

/// Full transcript, or the empty-state hint
pub fn transcript(controller: &ChatController) -> Vec<String> {
    if controller.messages().is_empty() {
        vec![notice(EMPTY_STATE)]
    } else {
        messages_since(controller, 0)
    }
}
