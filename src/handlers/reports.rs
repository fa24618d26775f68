use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_session;
use crate::errors::AppError;
use crate::models::{NewReport, Report, ReportReason, ReportStatus};
use crate::repositories::reports;
use crate::services::validation::validate_new_report;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ReportView {
    #[serde(flatten)]
    report: Report,
    reason_label: &'static str,
    is_open: bool,
}

impl From<Report> for ReportView {
    fn from(report: Report) -> Self {
        Self {
            reason_label: report.reason.label(),
            is_open: report.status.is_open(),
            report,
        }
    }
}

#[derive(Deserialize)]
pub struct SubmitReportRequest {
    pub reported_user_id: Option<Uuid>,
    pub product_id: Option<Uuid>,
    pub reason: ReportReason,
    pub description: Option<String>,
}

// POST /api/reports
pub async fn submit_report(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SubmitReportRequest>,
) -> Result<(StatusCode, Json<ReportView>), AppError> {
    let session = require_session(&headers)?;

    let report = NewReport {
        reporter_id: session.user_id,
        reported_user_id: req.reported_user_id,
        product_id: req.product_id,
        reason: req.reason,
        description: req
            .description
            .map(|d| d.trim().to_string())
            .filter(|d| !d.is_empty()),
        status: ReportStatus::Pending,
    };
    validate_new_report(&report)?;

    let created = reports::create(state.backend.as_ref(), &session, &report).await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

// GET /api/reports
pub async fn my_reports(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ReportView>>, AppError> {
    let session = require_session(&headers)?;
    let list = reports::list_mine(state.backend.as_ref(), &session).await?;
    Ok(Json(list.into_iter().map(ReportView::from).collect()))
}
