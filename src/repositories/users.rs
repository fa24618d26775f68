use serde_json::json;
use uuid::Uuid;

use super::{decode_first, decode_rows};
use crate::errors::AppError;
use crate::models::{ProfileUpdate, Session, UserProfile};
use crate::services::backend::{Backend, Query};

const TABLE: &str = "users";

pub async fn get_profile(backend: &dyn Backend, session: &Session, id: Uuid) -> Result<UserProfile, AppError> {
    let query = Query::new().eq("id", id).limit(1);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %id, "failed to load profile"))?;
    decode_first(rows, || AppError::NotFound(format!("user {id}")))
}

pub async fn update_profile(
    backend: &dyn Backend,
    session: &Session,
    update: &ProfileUpdate,
) -> Result<UserProfile, AppError> {
    let query = Query::new().eq("id", session.user_id);
    let rows = backend
        .update(&session.access_token, TABLE, &query, serde_json::to_value(update)?)
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %session.user_id, "failed to update profile"))?;
    decode_first(rows, || AppError::NotFound(format!("user {}", session.user_id)))
}

pub async fn list_profiles(
    backend: &dyn Backend,
    session: &Session,
    banned_only: bool,
) -> Result<Vec<UserProfile>, AppError> {
    let mut query = Query::new().order("created_at", false);
    if banned_only {
        query = query.eq("is_banned", true);
    }
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load users"))?;
    decode_rows(rows)
}

pub async fn ban_user(
    backend: &dyn Backend,
    session: &Session,
    target: Uuid,
    reason: &str,
) -> Result<UserProfile, AppError> {
    let args = json!({ "target_user_id": target, "reason": reason });
    backend
        .rpc(&session.access_token, "admin_ban_user", args)
        .await
        .inspect_err(|e| tracing::error!(error = %e, target = %target, "admin_ban_user failed"))?;

    tracing::info!(target = %target, admin = %session.user_id, "user banned");
    get_profile(backend, session, target).await
}

pub async fn set_user_context(backend: &dyn Backend, token: &str, user_id: Uuid) -> Result<(), AppError> {
    backend
        .rpc(token, "set_user_context", json!({ "user_id": user_id }))
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %user_id, "set_user_context failed"))?;
    Ok(())
}
