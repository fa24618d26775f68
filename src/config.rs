use std::env;
use std::time::Duration;

use crate::errors::AppError;
use crate::services::pricing::DeliveryRates;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub backend_url: String,
    pub backend_anon_key: String,
    pub product_image_bucket: String,
    pub request_timeout_secs: u64,
    pub delivery_base_fee: f64,
    pub delivery_fee_per_km: f64,
    pub max_delivery_km: f64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            backend_url: env::var("BACKEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .unwrap_or_default(),
            backend_anon_key: env::var("BACKEND_ANON_KEY").unwrap_or_default(),
            product_image_bucket: env::var("PRODUCT_IMAGE_BUCKET")
                .unwrap_or_else(|_| "product-images".to_string()),
            request_timeout_secs: parse_var("REQUEST_TIMEOUT_SECS").unwrap_or(15),
            delivery_base_fee: parse_var("DELIVERY_BASE_FEE").unwrap_or(5.0),
            delivery_fee_per_km: parse_var("DELIVERY_FEE_PER_KM").unwrap_or(1.5),
            max_delivery_km: parse_var("MAX_DELIVERY_KM").unwrap_or(30.0),
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.backend_url.is_empty() {
            return Err(AppError::Config("BACKEND_URL must be set".to_string()));
        }
        if self.backend_anon_key.is_empty() {
            return Err(AppError::Config("BACKEND_ANON_KEY must be set".to_string()));
        }
        if self.max_delivery_km <= 0.0 || self.delivery_base_fee < 0.0 || self.delivery_fee_per_km < 0.0 {
            return Err(AppError::Config("delivery rates must not be negative".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn delivery_rates(&self) -> DeliveryRates {
        DeliveryRates {
            base_fee: self.delivery_base_fee,
            per_km: self.delivery_fee_per_km,
            max_distance_km: self.max_delivery_km,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
