use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{decode_first, decode_rows};
use crate::errors::AppError;
use crate::models::{Booking, BookingStatus, NewBooking, PaymentStatus, Session};
use crate::services::backend::{Backend, Query};
use crate::services::lifecycle::{next_status, BookingAction};

const TABLE: &str = "bookings";
const COLUMNS: &str = "*,products(name,images)";

pub async fn list_for_renter(
    backend: &dyn Backend,
    session: &Session,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, AppError> {
    let query = scoped(Query::new().eq("user_id", session.user_id), status);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %session.user_id, "failed to load renter bookings"))?;
    decode_rows(rows)
}

pub async fn list_for_owner(
    backend: &dyn Backend,
    session: &Session,
    status: Option<BookingStatus>,
) -> Result<Vec<Booking>, AppError> {
    let query = scoped(Query::new().eq("owner_id", session.user_id), status);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %session.user_id, "failed to load owner bookings"))?;
    decode_rows(rows)
}

fn scoped(query: Query, status: Option<BookingStatus>) -> Query {
    let query = query.select(COLUMNS).order("created_at", false);
    match status {
        Some(s) => query.eq("status", s.as_str()),
        None => query,
    }
}

pub async fn get(backend: &dyn Backend, session: &Session, id: Uuid) -> Result<Booking, AppError> {
    let query = Query::new().select(COLUMNS).eq("id", id).limit(1);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, booking_id = %id, "failed to load booking"))?;
    decode_first(rows, || AppError::NotFound(format!("booking {id}")))
}

pub async fn create(
    backend: &dyn Backend,
    session: &Session,
    booking: &NewBooking,
) -> Result<Booking, AppError> {
    let row = backend
        .insert(&session.access_token, TABLE, serde_json::to_value(booking)?)
        .await
        .inspect_err(|e| tracing::error!(error = %e, product_id = %booking.product_id, "failed to create booking"))?;
    let created: Booking = serde_json::from_value(row)?;

    tracing::info!(
        booking_id = %created.id,
        product_id = %created.product_id,
        start = %created.start_date,
        end = %created.end_date,
        "booking created"
    );
    Ok(created)
}

// Guarded on the status seen locally, plus payment_status for confirm
pub async fn transition(
    backend: &dyn Backend,
    session: &Session,
    booking: &Booking,
    action: BookingAction,
) -> Result<Booking, AppError> {
    let next = next_status(booking.status, action, booking.is_paid())?;

    let mut query = Query::new()
        .select(COLUMNS)
        .eq("id", booking.id)
        .eq("status", booking.status.as_str());
    if action == BookingAction::Confirm {
        query = query.eq("payment_status", PaymentStatus::Paid.as_str());
    }
    let patch = json!({ "status": next, "updated_at": Utc::now() });

    let rows = backend
        .update(&session.access_token, TABLE, &query, patch)
        .await
        .inspect_err(|e| tracing::error!(error = %e, booking_id = %booking.id, action = %action, "failed to update booking status"))?;

    let updated: Booking = decode_first(rows, || {
        tracing::warn!(booking_id = %booking.id, action = %action, "status update matched no rows");
        AppError::NotFound(format!("booking {} changed or not found", booking.id))
    })?;

    tracing::info!(
        booking_id = %updated.id,
        from = %booking.status,
        to = %updated.status,
        "booking status changed"
    );
    Ok(updated)
}
