//! Admin session authentication.
//!
//! Credentials are compared in constant time. A successful login issues an
//! opaque token that expires after a period of inactivity.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::errors::AppError;
use crate::models::{AdminCredentials, LoginRequest};

/// Header name for the session token.
pub const SESSION_HEADER: &str = "x-session-token";

/// In-memory admin sessions keyed by token, holding the last activity time.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<String, Instant>>>,
    timeout: Duration,
}

impl SessionStore {
    pub fn new(timeout: Duration) -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            timeout,
        }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Start a new session and return its token.
    pub async fn create(&self) -> String {
        let token = uuid::Uuid::new_v4().to_string();
        self.sessions
            .lock()
            .await
            .insert(token.clone(), Instant::now());
        token
    }

    /// Record activity on a session. Expired or unknown tokens return false.
    pub async fn touch(&self, token: &str) -> bool {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        match sessions.get_mut(token) {
            Some(last) if now.duration_since(*last) < self.timeout => {
                *last = now;
                true
            }
            Some(_) => {
                sessions.remove(token);
                tracing::info!("Admin session timed out due to inactivity");
                false
            }
            None => false,
        }
    }

    /// End a session. Returns false if it did not exist.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.lock().await.remove(token).is_some()
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, last| now.duration_since(*last) < self.timeout);
        before - sessions.len()
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

/// Periodically purge expired sessions.
pub fn spawn_session_sweeper(sessions: SessionStore, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(period);
        loop {
            interval.tick().await;
            let purged = sessions.purge_expired().await;
            if purged > 0 {
                let active = sessions.active_count().await;
                tracing::debug!(active, "Purged {} expired admin sessions", purged);
            }
        }
    })
}

/// Check a login attempt against the stored credentials.
pub fn verify_credentials(attempt: &LoginRequest, stored: &AdminCredentials) -> bool {
    let username_ok = attempt.username.as_bytes().ct_eq(stored.username.as_bytes());
    let password_ok = attempt.password.as_bytes().ct_eq(stored.password.as_bytes());
    (username_ok & password_ok).into()
}

/// Extract a session token from `x-session-token` or a bearer Authorization header.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            headers
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Route guard for admin endpoints. Each accepted request resets the inactivity timer.
pub async fn session_auth_layer(sessions: SessionStore, request: Request, next: Next) -> Response {
    let Some(token) = session_token(request.headers()) else {
        return AppError::Unauthorized("Missing admin session".to_string()).into_response();
    };

    if sessions.touch(&token).await {
        next.run(request).await
    } else {
        AppError::Unauthorized("Session expired or invalid".to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn creds(username: &str, password: &str) -> AdminCredentials {
        AdminCredentials {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    fn attempt(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_verify_credentials() {
        let stored = creds("admin", "admin");
        assert!(verify_credentials(&attempt("admin", "admin"), &stored));
        assert!(!verify_credentials(&attempt("admin", "Admin"), &stored));
        assert!(!verify_credentials(&attempt("root", "admin"), &stored));
        assert!(!verify_credentials(&attempt("", ""), &stored));
    }

    #[test]
    fn test_session_token_sources() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc"));
        assert_eq!(session_token(&headers).as_deref(), Some("abc"));

        headers.insert(SESSION_HEADER, HeaderValue::from_static("xyz"));
        assert_eq!(session_token(&headers).as_deref(), Some("xyz"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_session_expires_after_inactivity() {
        let sessions = SessionStore::new(Duration::from_secs(180));
        let token = sessions.create().await;

        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(sessions.touch(&token).await);

        // Activity reset the timer
        tokio::time::advance(Duration::from_secs(120)).await;
        assert!(sessions.touch(&token).await);

        tokio::time::advance(Duration::from_secs(181)).await;
        assert!(!sessions.touch(&token).await);
        assert_eq!(sessions.active_count().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_task_purges_in_background() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        sessions.create().await;
        sessions.create().await;

        let sweeper = spawn_session_sweeper(sessions.clone(), Duration::from_secs(30));
        tokio::time::sleep(Duration::from_secs(95)).await;

        assert_eq!(sessions.active_count().await, 0);
        sweeper.abort();
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_and_remove() {
        let sessions = SessionStore::new(Duration::from_secs(60));
        let old = sessions.create().await;
        tokio::time::advance(Duration::from_secs(61)).await;
        let fresh = sessions.create().await;

        assert_eq!(sessions.purge_expired().await, 1);
        assert!(!sessions.touch(&old).await);
        assert!(sessions.remove(&fresh).await);
        assert!(!sessions.remove(&fresh).await);
    }
}
