use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use super::reports::ReportView;
use super::require_session;
use crate::errors::AppError;
use crate::models::{ReportStatus, Session, UserProfile};
use crate::repositories::{reports, users};
use crate::state::AppState;

async fn require_admin(state: &AppState, headers: &HeaderMap) -> Result<Session, AppError> {
    let session = require_session(headers)?;
    let profile = users::get_profile(state.backend.as_ref(), &session, session.user_id).await?;
    if !profile.is_admin() {
        tracing::warn!(user_id = %session.user_id, "non-admin hit an admin endpoint");
        return Err(AppError::Forbidden("admin only".to_string()));
    }
    Ok(session)
}

// GET /api/admin/reports?status=
#[derive(Deserialize)]
pub struct ReportsQuery {
    pub status: Option<ReportStatus>,
}

pub async fn get_reports(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<Vec<ReportView>>, AppError> {
    let session = require_admin(&state, &headers).await?;
    let list = reports::list_all(state.backend.as_ref(), &session, query.status).await?;
    Ok(Json(list.into_iter().map(ReportView::from).collect()))
}

// POST /api/admin/reports/:id/status
#[derive(Deserialize)]
pub struct ReportStatusRequest {
    pub status: ReportStatus,
    pub admin_notes: Option<String>,
}

pub async fn update_report_status(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<ReportStatusRequest>,
) -> Result<Json<ReportView>, AppError> {
    let session = require_admin(&state, &headers).await?;
    let notes = req
        .admin_notes
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty());

    let report =
        reports::update_status(state.backend.as_ref(), &session, id, req.status, notes).await?;
    Ok(Json(report.into()))
}

// GET /api/admin/users?banned=
#[derive(Deserialize)]
pub struct UsersQuery {
    #[serde(default)]
    pub banned: bool,
}

pub async fn get_users(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<UsersQuery>,
) -> Result<Json<Vec<UserProfile>>, AppError> {
    let session = require_admin(&state, &headers).await?;
    Ok(Json(
        users::list_profiles(state.backend.as_ref(), &session, query.banned).await?,
    ))
}

// POST /api/admin/users/:id/ban
#[derive(Deserialize)]
pub struct BanRequest {
    pub reason: String,
}

pub async fn ban_user(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(req): Json<BanRequest>,
) -> Result<Json<UserProfile>, AppError> {
    let session = require_admin(&state, &headers).await?;

    let reason = req.reason.trim();
    if reason.is_empty() {
        return Err(AppError::validation("a ban needs a reason"));
    }
    if id == session.user_id {
        return Err(AppError::validation("you cannot ban yourself"));
    }

    let profile = users::ban_user(state.backend.as_ref(), &session, id, reason).await?;
    Ok(Json(profile))
}
