use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, PaymentStatus};
use crate::state::AppState;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BookingEvent {
    pub booking_id: Uuid,
    pub renter_id: Uuid,
    pub owner_id: Uuid,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    pub at: DateTime<Utc>,
}

impl BookingEvent {
    pub fn from_booking(booking: &Booking) -> Self {
        Self {
            booking_id: booking.id,
            renter_id: booking.user_id,
            owner_id: booking.owner_id,
            status: booking.status,
            payment_status: booking.payment_status,
            at: booking.updated_at,
        }
    }

    pub fn concerns(&self, user_id: Uuid) -> bool {
        self.renter_id == user_id || self.owner_id == user_id
    }
}

pub fn publish_booking_event(state: &AppState, booking: &Booking) {
    let event = BookingEvent::from_booking(booking);
    // No subscribers is the normal case when nobody has the app open
    if state.events_tx.send(event).is_err() {
        tracing::debug!(booking_id = %booking.id, "no event subscribers");
    }
}
