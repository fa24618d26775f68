use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
    #[serde(default)]
    pub delivery_fee: f64,
    #[serde(default)]
    pub distance_km: Option<f64>,
    #[serde(default)]
    pub delivery_method: DeliveryMethod,
    #[serde(default)]
    pub delivery_address: Option<String>,
    pub status: BookingStatus,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, rename = "products", skip_serializing_if = "Option::is_none")]
    pub product: Option<BookedProduct>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BookedProduct {
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
}

impl Booking {
    pub fn rental_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days()
    }

    pub fn rental_subtotal(&self) -> f64 {
        self.total_price - self.delivery_fee
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    pub fn is_upcoming(&self, today: NaiveDate) -> bool {
        matches!(self.status, BookingStatus::Pending | BookingStatus::Confirmed)
            && self.start_date >= today
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status == BookingStatus::Active && today > self.end_date
    }

    pub fn product_name(&self) -> Option<&str> {
        self.product.as_ref().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Confirmed => "confirmed",
            BookingStatus::Active => "active",
            BookingStatus::Completed => "completed",
            BookingStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Waiting for confirmation",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::Active => "In rental",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }
}

impl std::fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Processing,
    Paid,
    Failed,
    Expired,
    Cancelled,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Processing => "processing",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Expired => "expired",
            PaymentStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Awaiting payment",
            PaymentStatus::Processing => "Payment processing",
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Failed => "Payment failed",
            PaymentStatus::Expired => "Payment expired",
            PaymentStatus::Cancelled => "Payment cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMethod {
    #[default]
    Pickup,
    Delivery,
}

impl DeliveryMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryMethod::Pickup => "pickup",
            DeliveryMethod::Delivery => "delivery",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub owner_id: Uuid,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_price: f64,
    pub delivery_fee: f64,
    pub distance_km: Option<f64>,
    pub delivery_method: DeliveryMethod,
    pub delivery_address: Option<String>,
    pub notes: Option<String>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    pub fn booking(status: BookingStatus, payment_status: PaymentStatus) -> Booking {
        let at = DateTime::parse_from_rfc3339("2025-06-01T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        Booking {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            start_date: date("2025-06-10"),
            end_date: date("2025-06-13"),
            total_price: 95.0,
            delivery_fee: 20.0,
            distance_km: Some(10.0),
            delivery_method: DeliveryMethod::Delivery,
            delivery_address: Some("12 Shutter Lane".to_string()),
            status,
            payment_status,
            notes: None,
            created_at: at,
            updated_at: at,
            product: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::{booking, date};
    use super::*;

    #[test]
    fn test_deserialize_backend_row() {
        let json = r#"{
            "id": "5f0c6a4e-8a7b-4c7f-9d43-0f7e1b2c3d4e",
            "user_id": "0b8e1d2c-1111-4a2b-8c3d-1234567890ab",
            "product_id": "9a1b2c3d-2222-4e5f-8a7b-abcdefabcdef",
            "owner_id": "7c6d5e4f-3333-4b2a-9c8d-fedcbafedcba",
            "start_date": "2025-07-01",
            "end_date": "2025-07-04",
            "total_price": 150.0,
            "delivery_fee": 0,
            "distance_km": null,
            "delivery_method": "pickup",
            "status": "confirmed",
            "payment_status": "paid",
            "created_at": "2025-06-20T10:00:00+00:00",
            "updated_at": "2025-06-21T08:30:00+00:00",
            "products": {"name": "Sony A7 IV", "images": ["owner/p/1.jpg"]}
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.status, BookingStatus::Confirmed);
        assert_eq!(b.payment_status, PaymentStatus::Paid);
        assert_eq!(b.delivery_method, DeliveryMethod::Pickup);
        assert_eq!(b.rental_days(), 3);
        assert_eq!(b.product_name(), Some("Sony A7 IV"));
        assert!(b.is_paid());
    }

    #[test]
    fn test_missing_optional_columns_use_defaults() {
        let json = r#"{
            "id": "5f0c6a4e-8a7b-4c7f-9d43-0f7e1b2c3d4e",
            "user_id": "0b8e1d2c-1111-4a2b-8c3d-1234567890ab",
            "product_id": "9a1b2c3d-2222-4e5f-8a7b-abcdefabcdef",
            "owner_id": "7c6d5e4f-3333-4b2a-9c8d-fedcbafedcba",
            "start_date": "2025-07-01",
            "end_date": "2025-07-02",
            "total_price": 40,
            "status": "pending",
            "created_at": "2025-06-20T10:00:00Z",
            "updated_at": "2025-06-20T10:00:00Z"
        }"#;
        let b: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(b.payment_status, PaymentStatus::Pending);
        assert_eq!(b.delivery_fee, 0.0);
        assert!(b.product.is_none());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"status": "archived"}"#;
        #[derive(Deserialize)]
        #[allow(dead_code)]
        struct Only {
            status: BookingStatus,
        }
        assert!(serde_json::from_str::<Only>(json).is_err());
    }

    #[test]
    fn test_rental_subtotal_excludes_delivery() {
        let b = booking(BookingStatus::Pending, PaymentStatus::Pending);
        assert_eq!(b.rental_subtotal(), 75.0);
    }

    #[test]
    fn test_upcoming_and_overdue() {
        let mut b = booking(BookingStatus::Confirmed, PaymentStatus::Paid);
        assert!(b.is_upcoming(date("2025-06-09")));
        assert!(!b.is_upcoming(date("2025-06-11")));

        b.status = BookingStatus::Active;
        assert!(!b.is_overdue(date("2025-06-13")));
        assert!(b.is_overdue(date("2025-06-14")));
    }
}
