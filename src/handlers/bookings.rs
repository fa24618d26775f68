use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::require_session;
use crate::errors::AppError;
use crate::models::{
    BookedProduct, Booking, BookingStatus, DeliveryMethod, NewBooking, PaymentStatus, Product,
};
use crate::repositories::{bookings, products};
use crate::services::events::publish_booking_event;
use crate::services::lifecycle::{allowed_actions, Actor, BookingAction};
use crate::services::pricing::{self, haversine_km, PriceQuote};
use crate::services::validation::validate_new_booking;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BookingView {
    #[serde(flatten)]
    booking: Booking,
    rental_days: i64,
    rental_subtotal: f64,
    status_label: &'static str,
    payment_label: &'static str,
    is_upcoming: bool,
    is_overdue: bool,
    viewer: Option<Actor>,
    actions: Vec<BookingAction>,
}

impl BookingView {
    pub fn new(booking: Booking, viewer_id: Uuid, today: NaiveDate) -> Self {
        let viewer = Actor::of(&booking, viewer_id);
        let actions = viewer
            .map(|actor| allowed_actions(&booking, actor))
            .unwrap_or_default();
        Self {
            rental_days: booking.rental_days(),
            rental_subtotal: booking.rental_subtotal(),
            status_label: booking.status.label(),
            payment_label: booking.payment_status.label(),
            is_upcoming: booking.is_upcoming(today),
            is_overdue: booking.is_overdue(today),
            viewer,
            actions,
            booking,
        }
    }
}

// GET /api/bookings
#[derive(Deserialize)]
pub struct BookingsQuery {
    pub role: Option<Actor>,
    pub status: Option<BookingStatus>,
}

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<BookingsQuery>,
) -> Result<Json<Vec<BookingView>>, AppError> {
    let session = require_session(&headers)?;

    let list = match query.role.unwrap_or(Actor::Renter) {
        Actor::Renter => {
            bookings::list_for_renter(state.backend.as_ref(), &session, query.status).await?
        }
        Actor::Owner => {
            bookings::list_for_owner(state.backend.as_ref(), &session, query.status).await?
        }
    };

    let today = Utc::now().date_naive();
    Ok(Json(
        list.into_iter()
            .map(|b| BookingView::new(b, session.user_id, today))
            .collect(),
    ))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingView>, AppError> {
    let session = require_session(&headers)?;
    let booking = bookings::get(state.backend.as_ref(), &session, id).await?;
    if Actor::of(&booking, session.user_id).is_none() {
        return Err(AppError::Forbidden("not your booking".to_string()));
    }
    Ok(Json(BookingView::new(
        booking,
        session.user_id,
        Utc::now().date_naive(),
    )))
}

// POST /api/bookings/quote
#[derive(Deserialize)]
pub struct QuoteRequest {
    pub product_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    pub distance_km: Option<f64>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

fn build_quote(state: &AppState, product: &Product, req: &QuoteRequest) -> Result<PriceQuote, AppError> {
    // An explicit distance wins; otherwise measure from the listing's pin
    let distance = req.distance_km.or_else(|| {
        let renter = req.latitude.zip(req.longitude)?;
        product.coordinates().map(|gear| haversine_km(gear, renter))
    });

    pricing::quote(
        product,
        req.start_date,
        req.end_date,
        req.delivery_method,
        distance,
        &state.config.delivery_rates(),
    )
}

pub async fn quote_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<PriceQuote>, AppError> {
    let session = require_session(&headers)?;
    let product = products::get(state.backend.as_ref(), &session.access_token, req.product_id).await?;
    Ok(Json(build_quote(&state, &product, &req)?))
}

// POST /api/bookings
#[derive(Deserialize)]
pub struct CreateBookingRequest {
    #[serde(flatten)]
    pub quote: QuoteRequest,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<BookingView>), AppError> {
    let session = require_session(&headers)?;
    let today = Utc::now().date_naive();

    let product = products::get(state.backend.as_ref(), &session.access_token, req.quote.product_id).await?;
    if !product.is_available {
        return Err(AppError::validation("this item is not available for rent"));
    }

    let quote = build_quote(&state, &product, &req.quote)?;
    let new_booking = NewBooking {
        user_id: session.user_id,
        product_id: product.id,
        owner_id: product.owner_id,
        start_date: req.quote.start_date,
        end_date: req.quote.end_date,
        total_price: quote.total,
        delivery_fee: quote.delivery_fee,
        distance_km: quote.distance_km,
        delivery_method: req.quote.delivery_method,
        delivery_address: req
            .delivery_address
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty()),
        notes: req.notes.filter(|n| !n.trim().is_empty()),
        status: BookingStatus::Pending,
        payment_status: PaymentStatus::Pending,
    };
    validate_new_booking(&new_booking, today)?;

    let mut booking = bookings::create(state.backend.as_ref(), &session, &new_booking).await?;
    if booking.product.is_none() {
        booking.product = Some(BookedProduct {
            name: product.name.clone(),
            images: product.images.clone(),
        });
    }
    publish_booking_event(&state, &booking);

    Ok((
        StatusCode::CREATED,
        Json(BookingView::new(booking, session.user_id, today)),
    ))
}

// POST /api/bookings/:id/:action
pub async fn apply_action(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path((id, action)): Path<(Uuid, String)>,
) -> Result<Json<BookingView>, AppError> {
    let session = require_session(&headers)?;
    let action = BookingAction::parse(&action)
        .ok_or_else(|| AppError::NotFound(format!("unknown booking action: {action}")))?;

    let booking = bookings::get(state.backend.as_ref(), &session, id).await?;
    let actor = Actor::of(&booking, session.user_id)
        .ok_or_else(|| AppError::Forbidden("not your booking".to_string()))?;
    if !actor.permits(action) {
        return Err(AppError::Forbidden(format!(
            "only the owner can {action} a booking"
        )));
    }

    let updated = bookings::transition(state.backend.as_ref(), &session, &booking, action).await?;
    publish_booking_event(&state, &updated);

    Ok(Json(BookingView::new(
        updated,
        session.user_id,
        Utc::now().date_naive(),
    )))
}
