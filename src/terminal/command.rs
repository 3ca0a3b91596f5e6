//! Parsing REPL input lines

use crate::conversation::Feedback;
use thiserror::Error;

/// One line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Free text: becomes the input and is sent
    Send(String),
    /// Empty line: send whatever is staged in the input
    SendStaged,
    /// Stage suggestion N (0-based)
    UsePrompt(usize),
    Feedback(usize, Feedback),
    Copy(usize),
    /// Re-render the whole transcript
    History,
    Dismiss,
    /// `/login TOKEN` signs in; bare `/login` shows how
    Login(Option<String>),
    Logout,
    Help,
    Quit,
}

impl Command {
    /// Whether handling this command may call the agent
    pub fn sends(&self) -> bool {
        matches!(self, Self::Send(_) | Self::SendStaged)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command /{0}. Type /help for a list.")]
    Unknown(String),
    #[error("/{0} needs a message or suggestion number")]
    MissingNumber(String),
    #[error("Not a valid number: {0} (numbering starts at 1)")]
    BadNumber(String),
}

pub fn parse(line: &str) -> Result<Command, CommandError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() {
        return Ok(Command::SendStaged);
    }

    let Some(rest) = line.trim_start().strip_prefix('/') else {
        return Ok(Command::Send(line.to_string()));
    };

    let mut words = rest.split_whitespace();
    let name = words.next().unwrap_or_default();
    let arg = words.next();

    let number = |arg: Option<&str>| -> Result<usize, CommandError> {
        let raw = arg.ok_or_else(|| CommandError::MissingNumber(name.to_string()))?;
        match raw.parse::<usize>() {
            Ok(n) if n >= 1 => Ok(n - 1),
            _ => Err(CommandError::BadNumber(raw.to_string())),
        }
    };

    match name {
        "use" => Ok(Command::UsePrompt(number(arg)?)),
        "up" => Ok(Command::Feedback(number(arg)?, Feedback::Helpful)),
        "down" => Ok(Command::Feedback(number(arg)?, Feedback::NotHelpful)),
        "copy" => Ok(Command::Copy(number(arg)?)),
        "history" => Ok(Command::History),
        "dismiss" => Ok(Command::Dismiss),
        "login" => Ok(Command::Login(arg.map(str::to_string))),
        "logout" => Ok(Command::Logout),
        "help" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}
