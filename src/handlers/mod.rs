pub mod admin;
pub mod auth;
pub mod bookings;
pub mod calendar;
pub mod events;
pub mod health;
pub mod products;
pub mod profile;
pub mod reports;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::{header, HeaderMap};
use axum::routing::{get, post};
use axum::Router;

use crate::errors::AppError;
use crate::models::Session;
use crate::repositories::storage::MAX_IMAGE_BYTES;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .route(
            "/api/profile",
            get(profile::get_profile).patch(profile::update_profile),
        )
        .route(
            "/api/products",
            get(products::list_products).post(products::create_product),
        )
        .route("/api/products/mine", get(products::my_products))
        .route(
            "/api/products/:id",
            get(products::get_product).patch(products::update_product),
        )
        .route(
            "/api/products/:id/images",
            post(products::upload_image).layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES + 1024)),
        )
        .route(
            "/api/bookings",
            get(bookings::list_bookings).post(bookings::create_booking),
        )
        .route("/api/bookings/quote", post(bookings::quote_booking))
        .route("/api/bookings/:id", get(bookings::get_booking))
        .route("/api/bookings/:id/calendar.ics", get(calendar::download_ics))
        .route("/api/bookings/:id/:action", post(bookings::apply_action))
        .route("/api/events", get(events::events_stream))
        .route(
            "/api/reports",
            get(reports::my_reports).post(reports::submit_report),
        )
        .route("/api/admin/reports", get(admin::get_reports))
        .route(
            "/api/admin/reports/:id/status",
            post(admin::update_report_status),
        )
        .route("/api/admin/users", get(admin::get_users))
        .route("/api/admin/users/:id/ban", post(admin::ban_user))
        .with_state(state)
}

pub fn require_session(headers: &HeaderMap) -> Result<Session, AppError> {
    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    Session::from_authorization(auth)
}

// Guests fall back to the anonymous key
pub fn token_or_anon(state: &AppState, headers: &HeaderMap) -> Result<String, AppError> {
    if headers.contains_key(header::AUTHORIZATION) {
        Ok(require_session(headers)?.access_token)
    } else {
        Ok(state.config.backend_anon_key.clone())
    }
}
