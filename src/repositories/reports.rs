use serde_json::json;
use uuid::Uuid;

use super::{decode_first, decode_rows};
use crate::errors::AppError;
use crate::models::{NewReport, Report, ReportStatus, Session};
use crate::services::backend::{Backend, Query};

const TABLE: &str = "reports";

pub async fn create(backend: &dyn Backend, session: &Session, report: &NewReport) -> Result<Report, AppError> {
    let row = backend
        .insert(&session.access_token, TABLE, serde_json::to_value(report)?)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to submit report"))?;
    let created: Report = serde_json::from_value(row)?;
    tracing::info!(report_id = %created.id, reason = ?created.reason, "report submitted");
    Ok(created)
}

pub async fn list_mine(backend: &dyn Backend, session: &Session) -> Result<Vec<Report>, AppError> {
    let query = Query::new()
        .eq("reporter_id", session.user_id)
        .order("created_at", false);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load own reports"))?;
    decode_rows(rows)
}

pub async fn list_all(
    backend: &dyn Backend,
    session: &Session,
    status: Option<ReportStatus>,
) -> Result<Vec<Report>, AppError> {
    let mut query = Query::new().order("created_at", false);
    if let Some(status) = status {
        query = query.eq("status", status.as_str());
    }
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load reports"))?;
    decode_rows(rows)
}

pub async fn get(backend: &dyn Backend, session: &Session, id: Uuid) -> Result<Report, AppError> {
    let query = Query::new().eq("id", id).limit(1);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, report_id = %id, "failed to load report"))?;
    decode_first(rows, || AppError::NotFound(format!("report {id}")))
}

pub async fn update_status(
    backend: &dyn Backend,
    session: &Session,
    id: Uuid,
    status: ReportStatus,
    admin_notes: Option<&str>,
) -> Result<Report, AppError> {
    let args = json!({
        "report_id": id,
        "new_status": status,
        "admin_notes": admin_notes,
    });
    backend
        .rpc(&session.access_token, "admin_update_report_status", args)
        .await
        .inspect_err(|e| tracing::error!(error = %e, report_id = %id, "admin_update_report_status failed"))?;

    tracing::info!(report_id = %id, status = status.as_str(), "report status updated");
    get(backend, session, id).await
}
