use chrono::NaiveDate;
use serde::Serialize;

use crate::errors::AppError;
use crate::models::{DeliveryMethod, Product};

const EARTH_RADIUS_KM: f64 = 6371.0;

#[derive(Debug, Clone, Copy)]
pub struct DeliveryRates {
    pub base_fee: f64,
    pub per_km: f64,
    pub max_distance_km: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceQuote {
    pub days: i64,
    pub daily_rate: f64,
    pub rental_subtotal: f64,
    pub delivery_fee: f64,
    pub distance_km: Option<f64>,
    pub total: f64,
}

pub fn rental_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days()
}

pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lon1) = (from.0.to_radians(), from.1.to_radians());
    let (lat2, lon2) = (to.0.to_radians(), to.1.to_radians());
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;

    let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().asin()
}

pub fn delivery_fee(distance_km: f64, rates: &DeliveryRates) -> Result<f64, AppError> {
    if !distance_km.is_finite() || distance_km < 0.0 {
        return Err(AppError::validation("distance must be a non-negative number"));
    }
    if distance_km > rates.max_distance_km {
        return Err(AppError::Validation(format!(
            "delivery is only available within {} km",
            rates.max_distance_km
        )));
    }
    Ok(round_money(rates.base_fee + rates.per_km * distance_km))
}

pub fn quote(
    product: &Product,
    start: NaiveDate,
    end: NaiveDate,
    method: DeliveryMethod,
    distance_km: Option<f64>,
    rates: &DeliveryRates,
) -> Result<PriceQuote, AppError> {
    let days = rental_days(start, end);
    if days <= 0 {
        return Err(AppError::validation("end date must be after start date"));
    }

    let rental_subtotal = round_money(product.price_per_day * days as f64);
    let (delivery_fee, distance_km) = match method {
        DeliveryMethod::Pickup => (0.0, None),
        DeliveryMethod::Delivery => {
            let km = distance_km.ok_or_else(|| {
                AppError::validation("delivery needs a distance or a delivery location")
            })?;
            (delivery_fee(km, rates)?, Some(round_money(km)))
        }
    };

    Ok(PriceQuote {
        days,
        daily_rate: product.price_per_day,
        rental_subtotal,
        delivery_fee,
        distance_km,
        total: round_money(rental_subtotal + delivery_fee),
    })
}

fn round_money(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
