//! Identity collaborators
//!
//! The chat core only needs three things from an identity provider: a bearer
//! token on demand, the signed-in user, and a way to sign out.

mod session;

pub use session::TokenSession;

#[cfg(test)]
pub(crate) use session::test_jwt;

use async_trait::async_trait;
use thiserror::Error;

/// Email reported for the implicit local-development user
pub const LOCAL_DEV_EMAIL: &str = "local-dev@example.com";

/// The signed-in user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub email: String,
}

impl AuthUser {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AuthError {
    #[error("Access token is not a valid JWT: {0}")]
    MalformedToken(String),
    #[error("Access token expired")]
    Expired,
}

/// Source of identity and bearer tokens
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Current bearer token, if signed in
    async fn access_token(&self) -> Option<String>;

    /// Current user, if signed in
    async fn current_user(&self) -> Option<AuthUser>;

    async fn sign_out(&self);
}

/// Identity used in local mode: always signed in, never has a token
pub struct LocalDevAuth;

#[async_trait]
impl AuthProvider for LocalDevAuth {
    async fn access_token(&self) -> Option<String> {
        None
    }

    async fn current_user(&self) -> Option<AuthUser> {
        Some(AuthUser::new(LOCAL_DEV_EMAIL))
    }

    async fn sign_out(&self) {}
}
