//! Line-oriented chat REPL
//!
//! Reads one line at a time, maps it onto a controller operation, and prints
//! whatever changed. The next line is not read until the current operation
//! finishes, so at most one invocation is ever in flight.

mod command;
mod render;

use command::Command;

use crate::auth::TokenSession;
use crate::conversation::ChatController;
use std::io::{self, Write};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};

pub struct Repl {
    controller: ChatController,
    /// Present in runtime mode; `/login` signs in here
    session: Option<Arc<TokenSession>>,
    /// Number of transcript messages already printed
    shown: usize,
    last_error: Option<String>,
}

impl Repl {
    pub fn new(controller: ChatController, session: Option<Arc<TokenSession>>) -> Self {
        Self {
            controller,
            session,
            shown: 0,
            last_error: None,
        }
    }

    pub async fn run(mut self) -> io::Result<()> {
        self.controller.check_auth().await;

        let mut out = io::stdout();
        writeln!(out, "{}", render::header(self.controller.mode(), self.controller.user()))?;
        for line in render::transcript(&self.controller) {
            writeln!(out, "{line}")?;
        }
        if let Some(prompts) = self.controller.support_prompts() {
            writeln!(out, "{}", render::support_prompts(prompts))?;
        }

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        loop {
            write!(out, "> ")?;
            out.flush()?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            let output = match command::parse(&line) {
                Ok(Command::Quit) => break,
                Ok(cmd) => {
                    if self.calls_agent(&cmd) {
                        writeln!(out, "{}", render::notice("Waiting for agent..."))?;
                    }
                    self.handle(cmd).await
                }
                Err(e) => vec![render::notice(&e.to_string())],
            };

            for line in output {
                writeln!(out, "{line}")?;
            }
        }

        tracing::debug!(messages = self.controller.messages().len(), "Chat session ended");
        Ok(())
    }

    /// Whether `cmd` will reach the agent rather than stop at a local check
    fn calls_agent(&self, cmd: &Command) -> bool {
        let prompt = match cmd {
            Command::Send(text) => text.as_str(),
            Command::SendStaged => self.controller.input(),
            _ => return false,
        };
        self.controller.signed_in_or_local() && !prompt.trim().is_empty()
    }

    /// Apply one command and return the lines to print
    pub async fn handle(&mut self, cmd: Command) -> Vec<String> {
        let mut output = Vec::new();

        // A send always reports its own failure, even one identical to the last
        if cmd.sends() {
            self.last_error = None;
        }

        match cmd {
            Command::Send(text) => {
                self.controller.set_input(text);
                self.send().await;
            }
            Command::SendStaged => self.send().await,
            Command::UsePrompt(index) => match self.controller.select_support_prompt(index) {
                Ok(_) => output.push(render::staged_input(self.controller.input())),
                Err(e) => output.push(render::notice(&e.to_string())),
            },
            Command::Feedback(index, feedback) => {
                match self.controller.give_feedback(index, feedback).await {
                    Ok(true) => output.push(render::notice(&format!("Marked #{} {feedback}", index + 1))),
                    Ok(false) => output.push(render::notice(&format!("#{} is already marked {feedback}", index + 1))),
                    Err(e) => output.push(render::notice(&e.to_string())),
                }
            }
            Command::Copy(index) => match self.controller.copy_message(index) {
                Ok(()) => output.push(render::notice("Copied!")),
                Err(e) => output.push(render::notice(&e.to_string())),
            },
            Command::History => output.extend(render::transcript(&self.controller)),
            Command::Dismiss => self.controller.dismiss_error(),
            Command::Login(Some(token)) => self.login(&token, &mut output).await,
            Command::Login(None) if self.session.is_some() => self.controller.request_sign_in(),
            Command::Login(None) => output.push(render::notice("Local mode does not need sign-in")),
            Command::Logout => {
                if self.session.is_some() {
                    self.controller.sign_out().await;
                    output.push(render::notice("Signed out"));
                } else {
                    output.push(render::notice("Local mode has no session to sign out of"));
                }
            }
            Command::Help => output.push(render::HELP.to_string()),
            Command::Quit => {}
        }

        self.push_changes(&mut output);
        output
    }

    async fn send(&mut self) {
        let outcome = self.controller.send().await;
        tracing::debug!(outcome = ?outcome, "Send handled");
    }

    async fn login(&mut self, token: &str, output: &mut Vec<String>) {
        let Some(session) = &self.session else {
            output.push(render::notice("Local mode does not need sign-in"));
            return;
        };

        match session.sign_in(token) {
            Ok(user) => {
                self.controller.sign_in_completed().await;
                output.push(render::notice(&format!("Signed in as {}", user.email)));
            }
            Err(e) => output.push(render::notice(&e.to_string())),
        }
    }

    /// New messages, a changed banner, the sign-in prompt, and suggestions
    /// after a reply
    fn push_changes(&mut self, output: &mut Vec<String>) {
        let new_messages = render::messages_since(&self.controller, self.shown);
        let replied = !new_messages.is_empty();
        self.shown = self.controller.messages().len();
        output.extend(new_messages);

        let error = self.controller.error().map(str::to_string);
        if error != self.last_error {
            if let Some(error) = &error {
                output.push(render::error_banner(error));
            }
            self.last_error = error;
        }

        // Printing the prompt is all the sign-in UI there is; it is dismissed
        // right away so the next blocked send shows it again.
        if self.controller.auth_prompt_visible() {
            output.push(render::auth_prompt());
            self.controller.dismiss_auth_prompt();
        }

        if replied {
            if let Some(prompts) = self.controller.support_prompts() {
                output.push(render::support_prompts(prompts));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{AgentService, InvokeError};
    use crate::auth::test_jwt;
    use crate::config::DeploymentMode;
    use crate::conversation::testing::{MockAgent, MockClipboard, RecordingFeedbackSink};
    use crate::conversation::{ChatContext, Feedback};
    use serde_json::json;

    fn repl(mode: DeploymentMode) -> (Arc<MockAgent>, Repl) {
        let agent = Arc::new(MockAgent::new(mode));
        let session = Arc::new(TokenSession::new());
        let controller = ChatController::new(ChatContext {
            mode,
            agent: agent.clone(),
            auth: session.clone(),
            clipboard: Arc::new(MockClipboard::new()),
            feedback: Arc::new(RecordingFeedbackSink::new()),
        });
        let session = (mode == DeploymentMode::Runtime).then_some(session);
        (agent, Repl::new(controller, session))
    }

    fn joined(lines: &[String]) -> String {
        lines.join("\n")
    }

    #[tokio::test]
    async fn test_send_prints_both_messages_and_suggestions() {
        let (agent, mut repl) = repl(DeploymentMode::Local);
        repl.controller.check_auth().await;
        agent.queue_answer("The result is 579");

        let output = joined(&repl.handle(Command::Send("What is 123 + 456?".into())).await);
        assert!(output.contains("What is 123 + 456?"));
        assert!(output.contains("The result is 579"));
        assert!(output.contains("Can you do another calculation?"));

        // Nothing new on the next command
        let output = repl.handle(Command::Dismiss).await;
        assert!(output.is_empty());
    }

    #[tokio::test]
    async fn test_use_prompt_then_blank_line_sends_it() {
        let (agent, mut repl) = repl(DeploymentMode::Local);
        repl.controller.check_auth().await;
        agent.queue_answer("72°F and sunny");

        let output = joined(&repl.handle(Command::UsePrompt(1)).await);
        assert!(output.contains("What's the weather like today?"));

        repl.handle(Command::SendStaged).await;
        assert_eq!(agent.prompts(), vec!["What's the weather like today?".to_string()]);
    }

    #[tokio::test]
    async fn test_error_banner_shown_once_until_dismissed() {
        let (agent, mut repl) = repl(DeploymentMode::Local);
        repl.controller.check_auth().await;
        agent.queue_error(InvokeError::transport("Local agent invocation failed: 500 Internal Server Error - boom"));

        let output = joined(&repl.handle(Command::Send("hi".into())).await);
        assert!(output.contains("boom"));

        let output = joined(&repl.handle(Command::Help).await);
        assert!(!output.contains("boom"));

        repl.handle(Command::Dismiss).await;
        assert_eq!(repl.controller.error(), None);
    }

    #[tokio::test]
    async fn test_repeated_failure_shows_banner_each_time() {
        let (agent, mut repl) = repl(DeploymentMode::Local);
        repl.controller.check_auth().await;
        agent.queue_error(InvokeError::transport("down"));
        agent.queue_error(InvokeError::transport("down"));

        let first = joined(&repl.handle(Command::Send("a".into())).await);
        assert!(first.contains("down"));
        let second = joined(&repl.handle(Command::Send("b".into())).await);
        assert!(second.contains("[2]"));
        assert!(second.contains("down"));

        let first = joined(&repl.handle(Command::SendStaged).await);
        assert!(first.contains("Please enter a prompt"));
        let second = joined(&repl.handle(Command::SendStaged).await);
        assert!(second.contains("Please enter a prompt"));
    }

    #[tokio::test]
    async fn test_only_real_invocations_wait_for_agent() {
        let (_agent, mut local) = repl(DeploymentMode::Local);
        local.controller.check_auth().await;
        assert!(local.calls_agent(&Command::Send("hi".into())));
        assert!(!local.calls_agent(&Command::Send("   ".into())));
        assert!(!local.calls_agent(&Command::SendStaged));
        assert!(!local.calls_agent(&Command::Help));

        local.handle(Command::UsePrompt(0)).await;
        assert!(local.calls_agent(&Command::SendStaged));

        let (_agent, mut remote) = repl(DeploymentMode::Runtime);
        remote.controller.check_auth().await;
        assert!(!remote.calls_agent(&Command::Send("hi".into())));
    }

    #[tokio::test]
    async fn test_runtime_mode_requires_login_before_sending() {
        let (agent, mut repl) = repl(DeploymentMode::Runtime);
        repl.controller.check_auth().await;

        let output = joined(&repl.handle(Command::Send("hi".into())).await);
        assert!(output.contains("Sign in required"));
        assert!(agent.prompts().is_empty());

        let output = joined(&repl.handle(Command::Send("hi".into())).await);
        assert!(output.contains("Sign in required"));

        let token = test_jwt(&json!({"email": "ana@example.com"}));
        let output = joined(&repl.handle(Command::Login(None)).await);
        assert!(output.contains("/login TOKEN"));

        let output = joined(&repl.handle(Command::Login(Some(token))).await);
        assert!(output.contains("Signed in as ana@example.com"));
        assert!(!repl.controller.auth_prompt_visible());

        agent.queue_answer("hello ana");
        repl.handle(Command::Send("hi".into())).await;
        assert_eq!(agent.prompts(), vec!["hi".to_string()]);

        let output = joined(&repl.handle(Command::Logout).await);
        assert!(output.contains("Signed out"));
        assert!(repl.controller.user().is_none());
    }

    #[tokio::test]
    async fn test_bad_token_is_reported() {
        let (_agent, mut repl) = repl(DeploymentMode::Runtime);
        let output = joined(&repl.handle(Command::Login(Some("nope".into()))).await);
        assert!(output.contains("not a valid JWT"));
        assert!(repl.controller.user().is_none());
    }

    #[tokio::test]
    async fn test_feedback_and_copy_commands() {
        let (agent, mut repl) = repl(DeploymentMode::Local);
        repl.controller.check_auth().await;
        agent.queue_answer("answer");
        repl.handle(Command::Send("question".into())).await;

        let output = joined(&repl.handle(Command::Feedback(1, Feedback::Helpful)).await);
        assert!(output.contains("Marked #2 helpful"));
        let output = joined(&repl.handle(Command::Feedback(0, Feedback::Helpful)).await);
        assert!(output.contains("not an agent reply"));

        let output = joined(&repl.handle(Command::Copy(1)).await);
        assert!(output.contains("Copied!"));

        let history = joined(&repl.handle(Command::History).await);
        assert!(history.contains("[helpful]"));
        assert!(history.contains("Copied!"));
        assert_eq!(agent.mode(), DeploymentMode::Local);
    }
}
