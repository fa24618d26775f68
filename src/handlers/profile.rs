use std::sync::Arc;

use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use serde::Serialize;

use super::require_session;
use crate::errors::AppError;
use crate::models::{ProfileUpdate, UserProfile};
use crate::repositories::users;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProfileView {
    #[serde(flatten)]
    profile: UserProfile,
    display_name: String,
    initials: String,
}

impl From<UserProfile> for ProfileView {
    fn from(profile: UserProfile) -> Self {
        Self {
            display_name: profile.display_name(),
            initials: profile.initials(),
            profile,
        }
    }
}

// GET /api/profile
pub async fn get_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<ProfileView>, AppError> {
    let session = require_session(&headers)?;
    let profile = users::get_profile(state.backend.as_ref(), &session, session.user_id).await?;
    Ok(Json(profile.into()))
}

// PATCH /api/profile
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(mut update): Json<ProfileUpdate>,
) -> Result<Json<ProfileView>, AppError> {
    let session = require_session(&headers)?;

    update.full_name = update.full_name.map(|n| n.trim().to_string());
    update.phone = update.phone.map(|p| p.trim().to_string());
    if update.is_empty() {
        return Err(AppError::validation("nothing to update"));
    }
    if update.full_name.as_deref() == Some("") {
        return Err(AppError::validation("name must not be blank"));
    }

    let profile = users::update_profile(state.backend.as_ref(), &session, &update).await?;
    Ok(Json(profile.into()))
}
