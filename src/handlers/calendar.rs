use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use uuid::Uuid;

use super::require_session;
use crate::errors::AppError;
use crate::repositories::{bookings, products};
use crate::services::calendar::generate_ics;
use crate::services::lifecycle::Actor;
use crate::state::AppState;

pub async fn download_ics(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(booking_id): Path<Uuid>,
) -> Result<Response, AppError> {
    let session = require_session(&headers)?;

    let booking = bookings::get(state.backend.as_ref(), &session, booking_id).await?;
    if Actor::of(&booking, session.user_id).is_none() {
        return Err(AppError::Forbidden("not your booking".to_string()));
    }

    // Fall back to a lookup when the select did not embed the product
    let product_name = match booking.product_name() {
        Some(name) => name.to_string(),
        None => products::get(state.backend.as_ref(), &session.access_token, booking.product_id)
            .await
            .map(|p| p.name)
            .inspect_err(|e| {
                tracing::warn!(error = %e, booking_id = %booking_id, "product lookup for calendar failed")
            })
            .unwrap_or_else(|_| "Camera gear".to_string()),
    };

    let ics = generate_ics(&booking, &product_name);
    let filename = format!("rental-{booking_id}.ics");

    Ok((
        [
            (header::CONTENT_TYPE, "text/calendar; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        ics,
    )
        .into_response())
}
