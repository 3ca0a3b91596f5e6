//! In-memory bearer-token session
//!
//! Holds the token pasted by the user (or seeded from the environment) for the
//! lifetime of the process. The JWT payload is decoded only to learn who the
//! user is and when the token expires; signature checking is the runtime's job.

use super::{AuthError, AuthProvider, AuthUser};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use std::sync::{PoisonError, RwLock};

/// Claims consulted, in order, for the user's display identity
const USER_CLAIMS: &[&str] = &["email", "cognito:username", "username", "sub"];

struct Session {
    token: String,
    user: AuthUser,
    expires_at: Option<DateTime<Utc>>,
}

impl Session {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |exp| now < exp)
    }
}

#[derive(Default)]
pub struct TokenSession {
    session: RwLock<Option<Session>>,
}

impl TokenSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current session with one for `token`
    pub fn sign_in(&self, token: &str) -> Result<AuthUser, AuthError> {
        self.sign_in_at(token, Utc::now())
    }

    fn sign_in_at(&self, token: &str, now: DateTime<Utc>) -> Result<AuthUser, AuthError> {
        let token = token.trim();
        let session = decode_session(token)?;
        if !session.is_live(now) {
            return Err(AuthError::Expired);
        }

        let user = session.user.clone();
        tracing::info!(email = %user.email, expires_at = ?session.expires_at, "Signed in");
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = Some(session);
        Ok(user)
    }

    fn with_live_session<T>(&self, now: DateTime<Utc>, f: impl FnOnce(&Session) -> T) -> Option<T> {
        let guard = self.session.read().unwrap_or_else(PoisonError::into_inner);
        guard.as_ref().filter(|s| s.is_live(now)).map(f)
    }
}

#[async_trait]
impl AuthProvider for TokenSession {
    async fn access_token(&self) -> Option<String> {
        self.with_live_session(Utc::now(), |s| s.token.clone())
    }

    async fn current_user(&self) -> Option<AuthUser> {
        self.with_live_session(Utc::now(), |s| s.user.clone())
    }

    async fn sign_out(&self) {
        let previous = self
            .session
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(session) = previous {
            tracing::info!(email = %session.user.email, "Signed out");
        }
    }
}

fn decode_session(token: &str) -> Result<Session, AuthError> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(AuthError::MalformedToken(
            "expected three dot-separated segments".to_string(),
        ));
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(format!("payload is not base64url: {e}")))?;
    let claims: Map<String, Value> = serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::MalformedToken(format!("payload is not a JSON object: {e}")))?;

    let email = USER_CLAIMS
        .iter()
        .filter_map(|claim| claims.get(*claim).and_then(Value::as_str))
        .find(|v| !v.is_empty())
        .ok_or_else(|| AuthError::MalformedToken("no user claim in payload".to_string()))?;

    let expires_at = claims.get("exp").and_then(expiry);

    Ok(Session {
        token: token.to_string(),
        user: AuthUser::new(email),
        expires_at,
    })
}

/// `exp` as seconds since the epoch; some issuers send it as a float
#[allow(clippy::cast_possible_truncation)]
fn expiry(exp: &Value) -> Option<DateTime<Utc>> {
    let secs = exp
        .as_i64()
        .or_else(|| exp.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64))?;
    Utc.timestamp_opt(secs, 0).single()
}

#[cfg(test)]
pub(crate) fn test_jwt(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[tokio::test]
    async fn test_sign_in_reads_email_claim() {
        let session = TokenSession::new();
        let token = test_jwt(&json!({"email": "ana@example.com", "sub": "abc-123"}));

        let user = session.sign_in(&token).unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_eq!(session.access_token().await, Some(token));
        assert_eq!(session.current_user().await, Some(user));
    }

    #[test]
    fn test_user_claim_fallback_order() {
        let token = test_jwt(&json!({"cognito:username": "ana", "sub": "abc-123"}));
        assert_eq!(decode_session(&token).unwrap().user.email, "ana");

        let token = test_jwt(&json!({"email": "", "sub": "abc-123"}));
        assert_eq!(decode_session(&token).unwrap().user.email, "abc-123");
    }

    #[test]
    fn test_malformed_tokens_rejected() {
        let session = TokenSession::new();
        assert!(matches!(
            session.sign_in("not-a-jwt"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            session.sign_in("a.!!!.c"),
            Err(AuthError::MalformedToken(_))
        ));
        assert!(matches!(
            session.sign_in(&test_jwt(&json!({"scope": "chat"}))),
            Err(AuthError::MalformedToken(_))
        ));
    }

    #[test]
    fn test_expired_token_rejected_at_sign_in() {
        let session = TokenSession::new();
        let now = Utc::now();
        let token = test_jwt(&json!({"email": "ana@example.com", "exp": (now - Duration::minutes(1)).timestamp()}));
        assert_eq!(session.sign_in_at(&token, now), Err(AuthError::Expired));
    }

    #[test]
    fn test_token_stops_being_returned_after_expiry() {
        let session = TokenSession::new();
        let now = Utc::now();
        let exp = now + Duration::minutes(5);
        let token = test_jwt(&json!({"email": "ana@example.com", "exp": exp.timestamp()}));
        session.sign_in_at(&token, now).unwrap();

        assert!(session.with_live_session(now, |s| s.token.clone()).is_some());
        assert!(session
            .with_live_session(exp + Duration::seconds(1), |s| s.token.clone())
            .is_none());
    }

    #[test]
    #[allow(clippy::cast_precision_loss)]
    fn test_fractional_exp_still_expires() {
        let session = TokenSession::new();
        let now = Utc::now();
        let exp = (now - Duration::minutes(1)).timestamp() as f64 + 0.5;
        let token = test_jwt(&json!({"email": "ana@example.com", "exp": exp}));
        assert_eq!(session.sign_in_at(&token, now), Err(AuthError::Expired));

        let later = (now + Duration::minutes(5)).timestamp();
        let token = test_jwt(&json!({"email": "ana@example.com", "exp": 0.25 + later as f64}));
        let expires_at = decode_session(&token).unwrap().expires_at;
        assert_eq!(expires_at.map(|t| t.timestamp()), Some(later));
    }

    #[tokio::test]
    async fn test_sign_out_forgets_token() {
        let session = TokenSession::new();
        session
            .sign_in(&test_jwt(&json!({"email": "ana@example.com"})))
            .unwrap();
        session.sign_out().await;
        assert_eq!(session.access_token().await, None);
        assert_eq!(session.current_user().await, None);
    }
}
