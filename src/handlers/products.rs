use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{require_session, token_or_anon};
use crate::errors::AppError;
use crate::models::{filter_products, NewProduct, Product, ProductCategory, ProductFilter, ProductUpdate};
use crate::repositories::{products, storage};
use crate::services::validation::{validate_new_product, validate_product_update};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProductView {
    #[serde(flatten)]
    product: Product,
    image_urls: Vec<String>,
    cover_url: Option<String>,
    has_location: bool,
}

impl ProductView {
    fn new(state: &AppState, product: Product) -> Self {
        let backend = state.backend.as_ref();
        let bucket = &state.config.product_image_bucket;
        Self {
            image_urls: storage::image_urls(backend, bucket, &product),
            cover_url: product
                .cover_image()
                .map(|path| backend.public_url(bucket, path)),
            has_location: product.has_coordinates(),
            product,
        }
    }
}

// GET /api/products
pub async fn list_products(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let token = token_or_anon(&state, &headers)?;
    let all = products::list(state.backend.as_ref(), &token).await?;

    let views = filter_products(all, &filter)
        .into_iter()
        .map(|p| ProductView::new(&state, p))
        .collect();
    Ok(Json(views))
}

// GET /api/products/mine
pub async fn my_products(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ProductView>>, AppError> {
    let session = require_session(&headers)?;
    let list = products::list_for_owner(state.backend.as_ref(), &session).await?;
    Ok(Json(
        list.into_iter().map(|p| ProductView::new(&state, p)).collect(),
    ))
}

// GET /api/products/:id
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductView>, AppError> {
    let token = token_or_anon(&state, &headers)?;
    let product = products::get(state.backend.as_ref(), &token, id).await?;
    Ok(Json(ProductView::new(&state, product)))
}

// POST /api/products
#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: ProductCategory,
    pub brand: Option<String>,
    pub price_per_day: f64,
    pub deposit: Option<f64>,
    pub location: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

pub async fn create_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<ProductView>), AppError> {
    let session = require_session(&headers)?;

    let new_product = NewProduct {
        owner_id: session.user_id,
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        category: req.category,
        brand: req.brand,
        price_per_day: req.price_per_day,
        deposit: req.deposit,
        location: req.location,
        latitude: req.latitude,
        longitude: req.longitude,
    };
    validate_new_product(&new_product)?;

    let product = products::create(state.backend.as_ref(), &session, &new_product).await?;
    Ok((StatusCode::CREATED, Json(ProductView::new(&state, product))))
}

// PATCH /api/products/:id
pub async fn update_product(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    Json(update): Json<ProductUpdate>,
) -> Result<Json<ProductView>, AppError> {
    let session = require_session(&headers)?;
    validate_product_update(&update)?;

    let product = products::update(state.backend.as_ref(), &session, id, &update).await?;
    Ok(Json(ProductView::new(&state, product)))
}

// POST /api/products/:id/images (raw image body)
pub async fn upload_image(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<Uuid>,
    body: Bytes,
) -> Result<(StatusCode, Json<ProductView>), AppError> {
    let session = require_session(&headers)?;
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    let product = products::get(state.backend.as_ref(), &session.access_token, id).await?;
    if product.owner_id != session.user_id {
        return Err(AppError::Forbidden("only the owner can add photos".to_string()));
    }

    let path = storage::upload_product_image(
        state.backend.as_ref(),
        &session,
        &state.config.product_image_bucket,
        product.id,
        body.to_vec(),
        content_type,
    )
    .await?;
    let updated = products::add_image(state.backend.as_ref(), &session, &product, &path).await?;

    Ok((StatusCode::CREATED, Json(ProductView::new(&state, updated))))
}
