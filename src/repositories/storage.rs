use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{Product, Session};
use crate::services::backend::Backend;

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

pub fn image_extension(content_type: &str) -> Option<&'static str> {
    match content_type.split(';').next().map(str::trim) {
        Some("image/jpeg") => Some("jpg"),
        Some("image/png") => Some("png"),
        Some("image/webp") => Some("webp"),
        _ => None,
    }
}

pub async fn upload_product_image(
    backend: &dyn Backend,
    session: &Session,
    bucket: &str,
    product_id: Uuid,
    bytes: Vec<u8>,
    content_type: &str,
) -> Result<String, AppError> {
    let ext = image_extension(content_type)
        .ok_or_else(|| AppError::validation("images must be JPEG, PNG or WebP"))?;
    if bytes.is_empty() {
        return Err(AppError::validation("image is empty"));
    }
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::validation("image is larger than 5 MB"));
    }

    let path = format!("{}/{}/{}.{ext}", session.user_id, product_id, Uuid::new_v4());
    let size = bytes.len();
    let stored = backend
        .upload(&session.access_token, bucket, &path, bytes, content_type)
        .await
        .inspect_err(|e| tracing::error!(error = %e, product_id = %product_id, "failed to upload product image"))?;

    tracing::info!(product_id = %product_id, path = %stored, size, "product image uploaded");
    Ok(stored)
}

pub fn image_urls(backend: &dyn Backend, bucket: &str, product: &Product) -> Vec<String> {
    product
        .images
        .iter()
        .map(|path| backend.public_url(bucket, path))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extension() {
        assert_eq!(image_extension("image/jpeg"), Some("jpg"));
        assert_eq!(image_extension("image/png; charset=binary"), Some("png"));
        assert_eq!(image_extension("image/webp"), Some("webp"));
        assert_eq!(image_extension("image/gif"), None);
        assert_eq!(image_extension(""), None);
    }
}
