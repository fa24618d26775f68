use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::require_session;
use crate::errors::AppError;
use crate::models::{AuthSession, Session, UserProfile};
use crate::repositories::users;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub session: AuthSession,
    pub profile: UserProfile,
}

// POST /api/auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let email = req.email.trim().to_lowercase();
    if email.is_empty() || req.password.is_empty() {
        return Err(AppError::validation("email and password are required"));
    }

    let auth = state.backend.sign_in(&email, &req.password).await?;
    users::set_user_context(state.backend.as_ref(), &auth.access_token, auth.user.id).await?;

    let session = Session::from_token(&auth.access_token)?;
    let profile = users::get_profile(state.backend.as_ref(), &session, auth.user.id).await?;

    if profile.is_banned {
        tracing::warn!(user_id = %profile.id, "banned user attempted to sign in");
        if let Err(e) = state.backend.sign_out(&auth.access_token).await {
            tracing::warn!(error = %e, "sign-out after banned login failed");
        }
        let reason = profile.banned_reason.as_deref().unwrap_or("contact support");
        return Err(AppError::Forbidden(format!("account suspended: {reason}")));
    }

    tracing::info!(user_id = %profile.id, "user signed in");
    Ok(Json(LoginResponse {
        session: auth,
        profile,
    }))
}

// POST /api/auth/logout
pub async fn logout(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let session = require_session(&headers)?;
    state.backend.sign_out(&session.access_token).await?;
    tracing::info!(user_id = %session.user_id, "user signed out");
    Ok(Json(json!({ "ok": true })))
}
