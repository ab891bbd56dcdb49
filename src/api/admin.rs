//! Admin login, credentials and drafting endpoints.

use axum::{extract::State, http::HeaderMap};
use serde::Serialize;

use super::{success, ApiResult, AppJson};
use crate::auth::{session_token, verify_credentials};
use crate::draft::{DraftRequest, DraftResponse};
use crate::errors::AppError;
use crate::models::{AdminCredentials, LoginRequest, LoginResponse};
use crate::AppState;

/// Username shown back to the admin panel. The password is never returned.
#[derive(Debug, Serialize)]
pub struct CredentialsView {
    pub username: String,
}

/// Session status for the admin panel.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStatus {
    pub authenticated: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Serialize)]
pub struct DraftStatus {
    pub available: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutResult {
    pub logged_out: bool,
}

/// POST /api/admin/login - Exchange credentials for a session token.
pub async fn login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> ApiResult<LoginResponse> {
    let stored = state.repo.get_credentials().await?;
    if !verify_credentials(&request, &stored) {
        tracing::warn!("Rejected admin login");
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state.sessions.create().await;
    tracing::info!("Admin logged in");
    success(LoginResponse {
        token,
        timeout_secs: state.sessions.timeout().as_secs(),
    })
}

/// POST /api/admin/logout - End the current session.
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> ApiResult<LogoutResult> {
    let logged_out = match session_token(&headers) {
        Some(token) => state.sessions.remove(&token).await,
        None => false,
    };
    success(LogoutResult { logged_out })
}

/// GET /api/admin/session - Only reachable with a live session.
pub async fn session_status(State(state): State<AppState>) -> ApiResult<SessionStatus> {
    success(SessionStatus {
        authenticated: true,
        timeout_secs: state.sessions.timeout().as_secs(),
    })
}

/// GET /api/admin/credentials
pub async fn get_credentials(State(state): State<AppState>) -> ApiResult<CredentialsView> {
    let credentials = state.repo.get_credentials().await?;
    success(CredentialsView {
        username: credentials.username,
    })
}

/// PUT /api/admin/credentials - Replace the admin login.
pub async fn save_credentials(
    State(state): State<AppState>,
    AppJson(credentials): AppJson<AdminCredentials>,
) -> ApiResult<CredentialsView> {
    credentials.validate()?;
    let username = credentials.username.clone();
    state.repo.save_credentials(credentials).await?;
    success(CredentialsView { username })
}

/// GET /api/admin/draft/status
pub async fn draft_status(State(state): State<AppState>) -> ApiResult<DraftStatus> {
    success(DraftStatus {
        available: state.draft.is_available(),
    })
}

/// POST /api/admin/draft - Generate a post body for a topic.
pub async fn draft_post(
    State(state): State<AppState>,
    AppJson(request): AppJson<DraftRequest>,
) -> ApiResult<DraftResponse> {
    let topic = request.topic.trim();
    if topic.is_empty() {
        return Err(AppError::Validation(
            "Please enter a title/topic first so AI knows what to write about.".to_string(),
        ));
    }

    let content = state.draft.draft_post(topic, request.category).await?;
    success(DraftResponse { content })
}
