use chrono::NaiveDate;

use crate::errors::AppError;
use crate::models::{DeliveryMethod, NewBooking, NewProduct, NewReport, ProductUpdate};

pub const MAX_REPORT_DESCRIPTION: usize = 1000;
pub const MAX_RENTAL_DAYS: i64 = 90;

pub fn validate_new_booking(booking: &NewBooking, today: NaiveDate) -> Result<(), AppError> {
    if booking.end_date <= booking.start_date {
        return Err(AppError::validation("end date must be after start date"));
    }
    if booking.start_date < today {
        return Err(AppError::validation("start date cannot be in the past"));
    }
    if (booking.end_date - booking.start_date).num_days() > MAX_RENTAL_DAYS {
        return Err(AppError::Validation(format!(
            "rentals are limited to {MAX_RENTAL_DAYS} days"
        )));
    }
    if booking.user_id == booking.owner_id {
        return Err(AppError::validation("you cannot rent your own gear"));
    }

    non_negative("total price", booking.total_price)?;
    non_negative("delivery fee", booking.delivery_fee)?;
    if let Some(km) = booking.distance_km {
        non_negative("distance", km)?;
    }
    if booking.delivery_fee > booking.total_price {
        return Err(AppError::validation("delivery fee exceeds the total price"));
    }

    match booking.delivery_method {
        DeliveryMethod::Pickup if booking.delivery_fee > 0.0 => {
            Err(AppError::validation("pickup bookings carry no delivery fee"))
        }
        DeliveryMethod::Delivery if is_blank(booking.delivery_address.as_deref()) => {
            Err(AppError::validation("delivery address is required"))
        }
        _ => Ok(()),
    }
}

pub fn validate_new_product(product: &NewProduct) -> Result<(), AppError> {
    if product.name.trim().is_empty() {
        return Err(AppError::validation("product name is required"));
    }
    non_negative("price per day", product.price_per_day)?;
    if let Some(deposit) = product.deposit {
        non_negative("deposit", deposit)?;
    }
    validate_coordinates(product.latitude, product.longitude)
}

pub fn validate_product_update(update: &ProductUpdate) -> Result<(), AppError> {
    if let Some(name) = &update.name {
        if name.trim().is_empty() {
            return Err(AppError::validation("product name is required"));
        }
    }
    if let Some(price) = update.price_per_day {
        non_negative("price per day", price)?;
    }
    if let Some(deposit) = update.deposit {
        non_negative("deposit", deposit)?;
    }
    validate_coordinates(update.latitude, update.longitude)
}

pub fn validate_new_report(report: &NewReport) -> Result<(), AppError> {
    if report.reported_user_id.is_none() && report.product_id.is_none() {
        return Err(AppError::validation("a report needs a user or a product"));
    }
    if report.reported_user_id == Some(report.reporter_id) {
        return Err(AppError::validation("you cannot report yourself"));
    }
    if let Some(description) = &report.description {
        if description.chars().count() > MAX_REPORT_DESCRIPTION {
            return Err(AppError::Validation(format!(
                "description is limited to {MAX_REPORT_DESCRIPTION} characters"
            )));
        }
    }
    Ok(())
}

fn non_negative(field: &str, value: f64) -> Result<(), AppError> {
    if !value.is_finite() || value < 0.0 {
        return Err(AppError::Validation(format!("{field} must not be negative")));
    }
    Ok(())
}

fn validate_coordinates(lat: Option<f64>, lng: Option<f64>) -> Result<(), AppError> {
    if let Some(lat) = lat {
        if !(-90.0..=90.0).contains(&lat) {
            return Err(AppError::validation("latitude out of range"));
        }
    }
    if let Some(lng) = lng {
        if !(-180.0..=180.0).contains(&lng) {
            return Err(AppError::validation("longitude out of range"));
        }
    }
    Ok(())
}

fn is_blank(s: Option<&str>) -> bool {
    s.map(|s| s.trim().is_empty()).unwrap_or(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::booking::fixtures::date;
    use crate::models::{BookingStatus, PaymentStatus, ProductCategory, ReportReason, ReportStatus};
    use uuid::Uuid;

    fn new_booking() -> NewBooking {
        NewBooking {
            user_id: Uuid::new_v4(),
            product_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            start_date: date("2025-06-10"),
            end_date: date("2025-06-12"),
            total_price: 110.0,
            delivery_fee: 20.0,
            distance_km: Some(10.0),
            delivery_method: DeliveryMethod::Delivery,
            delivery_address: Some("Jl. Kemang Raya 5".to_string()),
            notes: None,
            status: BookingStatus::Pending,
            payment_status: PaymentStatus::Pending,
        }
    }

    fn today() -> NaiveDate {
        date("2025-06-01")
    }

    #[test]
    fn test_valid_booking() {
        assert!(validate_new_booking(&new_booking(), today()).is_ok());
    }

    #[test]
    fn test_end_must_follow_start() {
        let mut b = new_booking();
        b.end_date = b.start_date;
        let err = validate_new_booking(&b, today()).unwrap_err();
        assert!(err.to_string().contains("end date must be after start date"));

        b.end_date = date("2025-06-09");
        assert!(validate_new_booking(&b, today()).is_err());
    }

    #[test]
    fn test_rental_length_capped() {
        let mut b = new_booking();
        b.end_date = b.start_date + chrono::Duration::days(MAX_RENTAL_DAYS);
        assert!(validate_new_booking(&b, today()).is_ok());

        b.end_date = b.start_date + chrono::Duration::days(MAX_RENTAL_DAYS + 1);
        assert!(matches!(
            validate_new_booking(&b, today()),
            Err(AppError::Validation(_))
        ));

        b.end_date = NaiveDate::MAX;
        assert!(validate_new_booking(&b, today()).is_err());
    }

    #[test]
    fn test_start_in_past_rejected() {
        let b = new_booking();
        assert!(validate_new_booking(&b, date("2025-06-10")).is_ok());
        assert!(validate_new_booking(&b, date("2025-06-11")).is_err());
    }

    #[test]
    fn test_negative_money_rejected() {
        let mut b = new_booking();
        b.total_price = -1.0;
        assert!(matches!(validate_new_booking(&b, today()), Err(AppError::Validation(_))));

        let mut b = new_booking();
        b.distance_km = Some(-3.0);
        assert!(validate_new_booking(&b, today()).is_err());
    }

    #[test]
    fn test_pickup_and_delivery_rules() {
        let mut b = new_booking();
        b.delivery_method = DeliveryMethod::Pickup;
        assert!(validate_new_booking(&b, today()).is_err());
        b.delivery_fee = 0.0;
        assert!(validate_new_booking(&b, today()).is_ok());

        let mut b = new_booking();
        b.delivery_address = Some("  ".to_string());
        assert!(validate_new_booking(&b, today()).is_err());
    }

    #[test]
    fn test_owner_cannot_rent_own_product() {
        let mut b = new_booking();
        b.owner_id = b.user_id;
        assert!(validate_new_booking(&b, today()).is_err());
    }

    #[test]
    fn test_product_validation() {
        let mut p = NewProduct {
            owner_id: Uuid::new_v4(),
            name: "Canon RF 50mm f/1.8".to_string(),
            description: String::new(),
            category: ProductCategory::Lens,
            brand: Some("Canon".to_string()),
            price_per_day: 8.0,
            deposit: Some(50.0),
            location: None,
            latitude: Some(-6.2),
            longitude: Some(106.8),
        };
        assert!(validate_new_product(&p).is_ok());

        p.price_per_day = -0.5;
        assert!(validate_new_product(&p).is_err());
        p.price_per_day = 0.0;
        assert!(validate_new_product(&p).is_ok());

        p.latitude = Some(95.0);
        assert!(validate_new_product(&p).is_err());

        let update = ProductUpdate {
            name: Some("".to_string()),
            ..Default::default()
        };
        assert!(validate_product_update(&update).is_err());
    }

    #[test]
    fn test_report_validation() {
        let reporter = Uuid::new_v4();
        let mut r = NewReport {
            reporter_id: reporter,
            reported_user_id: None,
            product_id: None,
            reason: ReportReason::Fraud,
            description: None,
            status: ReportStatus::Pending,
        };
        assert!(validate_new_report(&r).is_err());

        r.reported_user_id = Some(reporter);
        assert!(validate_new_report(&r).is_err());

        r.reported_user_id = Some(Uuid::new_v4());
        assert!(validate_new_report(&r).is_ok());

        r.description = Some("x".repeat(MAX_REPORT_DESCRIPTION + 1));
        assert!(validate_new_report(&r).is_err());
    }
}
