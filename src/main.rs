//! Agent Chat - terminal client for a deployed conversational agent
//!
//! Talks either to a locally running agent or to a hosted agent runtime,
//! keeps the conversation in memory, and offers follow-up suggestions.

mod agent;
mod auth;
mod clipboard;
mod config;
mod conversation;
mod terminal;

use agent::build_agent;
use auth::{AuthProvider, LocalDevAuth, TokenSession};
use clipboard::Osc52Clipboard;
use config::{ChatConfig, DeploymentMode};
use conversation::{ChatContext, ChatController, LogFeedbackSink};
use std::sync::Arc;
use terminal::Repl;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr so they never interleave with the chat on stdout
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agent_chat=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = ChatConfig::from_env();
    tracing::info!(
        mode = %config.mode,
        region = %config.region,
        runtime_arn = ?config.runtime_arn,
        local_url = %config.local_url,
        "Configuration loaded"
    );

    let (auth, session): (Arc<dyn AuthProvider>, Option<Arc<TokenSession>>) = match config.mode {
        DeploymentMode::Local => (Arc::new(LocalDevAuth), None),
        DeploymentMode::Runtime => {
            let session = Arc::new(TokenSession::new());
            if let Some(token) = &config.access_token {
                match session.sign_in(token) {
                    Ok(user) => tracing::info!(email = %user.email, "Signed in from environment"),
                    Err(e) => tracing::warn!(error = %e, "Ignoring AGENT_CHAT_ACCESS_TOKEN"),
                }
            }
            (session.clone(), Some(session))
        }
    };

    let agent = build_agent(&config, auth.clone());

    let controller = ChatController::new(ChatContext {
        mode: config.mode,
        agent,
        auth,
        clipboard: Arc::new(Osc52Clipboard),
        feedback: Arc::new(LogFeedbackSink),
    });

    Repl::new(controller, session).run().await?;
    Ok(())
}
