//! Axum route handlers for the session API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::session::Session;
use crate::notify::{tracked, Action};
use crate::session::LogoutPolicy;
use crate::state::AppState;

/// Any password field sent along is ignored: login is a local mock.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session: Session,
    pub display_name: String,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        let display_name = session.display_name();
        Self {
            session,
            display_name,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub policy: LogoutPolicy,
    pub documents_cleared: bool,
}

/// POST /api/v1/session/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = tracked(state.notifier.as_ref(), Action::Login, async {
        state.sessions.login(&request.email)
    })
    .await?;
    Ok(Json(session.into()))
}

/// POST /api/v1/session/register
///
/// Starts a session and resets every document collection to empty.
pub async fn handle_register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = tracked(state.notifier.as_ref(), Action::Login, async {
        state
            .sessions
            .register(&request.first_name, &request.last_name, &request.email)
    })
    .await?;
    Ok(Json(session.into()))
}

/// GET /api/v1/session
pub async fn handle_current_session(
    State(state): State<AppState>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = state.sessions.current().ok_or(AppError::Unauthorized)?;
    Ok(Json(session.into()))
}

/// DELETE /api/v1/session
pub async fn handle_logout(
    State(state): State<AppState>,
) -> Result<Json<LogoutResponse>, AppError> {
    let documents_cleared = tracked(state.notifier.as_ref(), Action::Logout, async {
        state.sessions.logout()
    })
    .await?;
    Ok(Json(LogoutResponse {
        policy: state.sessions.policy(),
        documents_cleared,
    }))
}
