//! Image upload route
//!
//! Accepts a multipart `image` field, checks the extension allow-list and
//! content type, and stores the bytes on disk under a generated name. The
//! body size ceiling is enforced by the router's `DefaultBodyLimit`.

use anyhow::Result;
use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{error, info};

use crate::{error::ApiError, state::AppState};

const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];
const ALLOWED_CONTENT_TYPES: &[&str] = &["image/jpeg", "image/jpg", "image/png"];

/// Upload configuration
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Directory uploaded files are stored under
    pub upload_dir: PathBuf,
    /// Base URL prefixed to returned image URLs
    pub public_base_url: String,
}

impl UploadConfig {
    /// Create a new UploadConfig from environment variables
    ///
    /// # Environment Variables
    /// - `UPLOAD_DIR`: Storage directory (default: "uploads")
    /// - `PUBLIC_BASE_URL`: URL prefix for stored files (default: "http://localhost:5000")
    pub fn from_env() -> Result<Self> {
        let upload_dir = std::env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string());

        let public_base_url = std::env::var("PUBLIC_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:5000".to_string());

        Ok(UploadConfig {
            upload_dir: PathBuf::from(upload_dir),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// Upload an image
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Failed to read multipart field: {}", e);
        ApiError::BadRequest("Invalid upload payload.".to_string())
    })? {
        if field.name() != Some("image") {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("No file uploaded".to_string()))?;

        let extension = image_extension(&filename).ok_or_else(|| {
            ApiError::UnprocessableEntity(
                "Invalid file type. Only JPEG, JPG and PNG are allowed.".to_string(),
            )
        })?;

        if !field.content_type().is_some_and(allowed_content_type) {
            return Err(ApiError::UnprocessableEntity(
                "Invalid file type. Only JPEG, JPG and PNG are allowed.".to_string(),
            ));
        }

        let bytes = field.bytes().await.map_err(|e| {
            error!("Failed to read upload body: {}", e);
            ApiError::BadRequest("Could not read the uploaded file.".to_string())
        })?;

        let stored_name = unique_filename(&extension);
        let images_dir = state.upload_config.upload_dir.join("images");

        tokio::fs::create_dir_all(&images_dir).await.map_err(|e| {
            error!("Failed to create upload directory: {}", e);
            ApiError::InternalServerError
        })?;

        tokio::fs::write(images_dir.join(&stored_name), &bytes)
            .await
            .map_err(|e| {
                error!("Failed to store uploaded file: {}", e);
                ApiError::InternalServerError
            })?;

        info!("Stored uploaded image as {}", stored_name);

        let image_url = format!(
            "{}/uploads/images/{}",
            state.upload_config.public_base_url, stored_name
        );

        return Ok((
            StatusCode::CREATED,
            Json(json!({
                "message": "File uploaded successfully",
                "imageUrl": image_url,
            })),
        ));
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

/// Check a declared content type against the image allow-list
fn allowed_content_type(content_type: &str) -> bool {
    ALLOWED_CONTENT_TYPES.contains(&content_type)
}

/// Extract a lowercased, allow-listed extension from a filename
fn image_extension(filename: &str) -> Option<String> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())?
        .to_ascii_lowercase();

    if ALLOWED_EXTENSIONS.contains(&extension.as_str()) {
        Some(extension)
    } else {
        None
    }
}

/// Generate a collision-resistant stored filename
fn unique_filename(extension: &str) -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    format!("{}-{}.{}", millis, rand::random::<u32>(), extension)
}
