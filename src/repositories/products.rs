use chrono::Utc;
use serde_json::json;
use uuid::Uuid;

use super::{decode_first, decode_rows};
use crate::errors::AppError;
use crate::models::{NewProduct, Product, ProductUpdate, Session};
use crate::services::backend::{Backend, Query};

const TABLE: &str = "products";

pub async fn list(backend: &dyn Backend, token: &str) -> Result<Vec<Product>, AppError> {
    let query = Query::new().select("*").order("created_at", false);
    let rows = backend
        .select(token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to load products"))?;
    decode_rows(rows)
}

pub async fn list_for_owner(backend: &dyn Backend, session: &Session) -> Result<Vec<Product>, AppError> {
    let query = Query::new()
        .select("*")
        .eq("owner_id", session.user_id)
        .order("created_at", false);
    let rows = backend
        .select(&session.access_token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, user_id = %session.user_id, "failed to load owner products"))?;
    decode_rows(rows)
}

pub async fn get(backend: &dyn Backend, token: &str, id: Uuid) -> Result<Product, AppError> {
    let query = Query::new().select("*").eq("id", id).limit(1);
    let rows = backend
        .select(token, TABLE, &query)
        .await
        .inspect_err(|e| tracing::error!(error = %e, product_id = %id, "failed to load product"))?;
    decode_first(rows, || AppError::NotFound(format!("product {id}")))
}

pub async fn create(
    backend: &dyn Backend,
    session: &Session,
    product: &NewProduct,
) -> Result<Product, AppError> {
    let row = backend
        .insert(&session.access_token, TABLE, serde_json::to_value(product)?)
        .await
        .inspect_err(|e| tracing::error!(error = %e, "failed to create product"))?;
    let created: Product = serde_json::from_value(row)?;
    tracing::info!(product_id = %created.id, name = %created.name, "product listed");
    Ok(created)
}

pub async fn update(
    backend: &dyn Backend,
    session: &Session,
    id: Uuid,
    update: &ProductUpdate,
) -> Result<Product, AppError> {
    let mut patch = serde_json::to_value(update)?;
    patch["updated_at"] = json!(Utc::now());

    let query = Query::new().eq("id", id).eq("owner_id", session.user_id);
    let rows = backend
        .update(&session.access_token, TABLE, &query, patch)
        .await
        .inspect_err(|e| tracing::error!(error = %e, product_id = %id, "failed to update product"))?;
    decode_first(rows, || AppError::NotFound(format!("product {id}")))
}

pub async fn add_image(
    backend: &dyn Backend,
    session: &Session,
    product: &Product,
    path: &str,
) -> Result<Product, AppError> {
    let mut images = product.images.clone();
    images.push(path.to_string());
    let patch = json!({ "images": images, "updated_at": Utc::now() });

    let query = Query::new()
        .eq("id", product.id)
        .eq("owner_id", session.user_id);
    let rows = backend
        .update(&session.access_token, TABLE, &query, patch)
        .await
        .inspect_err(|e| tracing::error!(error = %e, product_id = %product.id, "failed to attach product image"))?;
    decode_first(rows, || AppError::NotFound(format!("product {}", product.id)))
}
