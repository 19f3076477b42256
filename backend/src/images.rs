//! Image-hosting collaborator and the upload endpoint.
//!
//! Files arrive base64-encoded, are pushed to an ImageKit-style upload API,
//! and the resulting URLs are attached to a newly submitted (pending)
//! property.

use async_trait::async_trait;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::json;
use thiserror::Error;

use crate::approval::{self, SubmitProperty};
use crate::auth::Identity;
use crate::error::ApiError;
use crate::models::Property;
use crate::store::pg::PgStore;
use crate::store::Store;
use crate::AppState;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image upload failed: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedImage {
    pub file_name: String,
    pub file_url: String,
}

#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Uploads one base64-encoded file and returns its hosted location.
    async fn upload(&self, file_name: &str, data: &str) -> Result<UploadedImage, ImageError>;
}

pub struct ImageKitClient {
    http: reqwest::Client,
    upload_url: String,
    private_key: String,
}

impl ImageKitClient {
    pub fn new(upload_url: &str, private_key: &str) -> Self {
        ImageKitClient {
            http: reqwest::Client::new(),
            upload_url: upload_url.to_string(),
            private_key: private_key.to_string(),
        }
    }
}

#[derive(Deserialize)]
struct ImageKitResponse {
    name: String,
    url: String,
}

#[async_trait]
impl ImageHost for ImageKitClient {
    async fn upload(&self, file_name: &str, data: &str) -> Result<UploadedImage, ImageError> {
        let form = reqwest::multipart::Form::new()
            .text("file", data.to_string())
            .text("fileName", file_name.to_string())
            .text("folder", "uploads");
        let response: ImageKitResponse = self
            .http
            .post(&self.upload_url)
            // ImageKit authenticates with the private key as username.
            .basic_auth(&self.private_key, Some(""))
            .multipart(form)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(UploadedImage {
            file_name: response.name,
            file_url: response.url,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadRequest {
    pub files: Vec<String>,
    pub details: SubmitProperty,
}

/// Uploads every file, then submits one pending property carrying the first
/// hosted URL. Upload failures fail the request; there is nothing durable
/// yet to fall back on.
pub async fn upload_and_submit(
    store: &mut dyn Store,
    images: &dyn ImageHost,
    identity: &Identity,
    input: &UploadRequest,
) -> Result<(Property, Vec<UploadedImage>), ApiError> {
    if input.files.is_empty() {
        return Err(ApiError::validation("Invalid files input."));
    }

    let stamp = chrono::Utc::now().timestamp();
    let mut uploaded = Vec::with_capacity(input.files.len());
    for (index, data) in input.files.iter().enumerate() {
        let file_name = format!("image-{stamp}-{index}");
        uploaded.push(images.upload(&file_name, data).await?);
    }

    let mut details = input.details.clone();
    details.image_url = Some(uploaded[0].file_url.clone());
    let property = approval::submit(store, identity, &details)?;
    Ok((property, uploaded))
}

pub async fn upload_images(
    State(state): State<AppState>,
    identity: Identity,
    Json(input): Json<UploadRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let mut store = PgStore::connect(&state.config.database_url)?;
    let (property, uploaded) =
        upload_and_submit(&mut store, state.images.as_ref(), &identity, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "uploadedImages": uploaded,
            "message": "Property submitted for admin approval",
            "property": property,
        })),
    ))
}
