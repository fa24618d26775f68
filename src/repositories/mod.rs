pub mod bookings;
pub mod products;
pub mod reports;
pub mod storage;
pub mod users;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::AppError;

fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>) -> Result<Vec<T>, AppError> {
    rows.into_iter()
        .map(|row| serde_json::from_value(row).map_err(AppError::from))
        .collect()
}

fn decode_first<T: DeserializeOwned>(rows: Vec<Value>, missing: impl FnOnce() -> AppError) -> Result<T, AppError> {
    match rows.into_iter().next() {
        Some(row) => Ok(serde_json::from_value(row)?),
        None => Err(missing()),
    }
}
