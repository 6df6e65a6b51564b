use std::path::PathBuf;

use anyhow::{Context, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::{config::CloudinaryConfig, error::AppError};

/// Stores an uploaded image and returns the URL it is served from.
#[async_trait]
pub trait ImageHost: Send + Sync + 'static {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError>;
}

/// Keeps only characters that are safe in a path segment.
fn sanitize_file_name(file_name: &str) -> String {
    let cleaned: String = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

pub struct LocalImageHost {
    root: PathBuf,
    subdirectory: String,
}

impl LocalImageHost {
    pub fn new(root: impl Into<PathBuf>, subdirectory: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            subdirectory: subdirectory.into(),
        }
    }
}

#[async_trait]
impl ImageHost for LocalImageHost {
    async fn upload(
        &self,
        file_name: &str,
        _content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let upload_dir = self.root.join(&self.subdirectory);

        tokio::fs::create_dir_all(&upload_dir).await.map_err(|e| {
            AppError::InternalError(anyhow!("Failed to create upload directory: {e}"))
        })?;

        let unique_filename = format!("{}_{}", Uuid::new_v4(), sanitize_file_name(file_name));
        let file_path = upload_dir.join(&unique_filename);

        let mut file = tokio::fs::File::create(&file_path)
            .await
            .map_err(|e| AppError::InternalError(anyhow!("Failed to create file: {e}")))?;

        file.write_all(&data)
            .await
            .map_err(|e| AppError::InternalError(anyhow!("Failed to write file: {e}")))?;

        tracing::info!("Stored image at {}", file_path.display());

        Ok(format!("/uploads/{}/{unique_filename}", self.subdirectory))
    }
}

#[derive(Debug, Deserialize)]
struct CloudinaryUploadResponse {
    secure_url: String,
}

/// Unsigned uploads to Cloudinary through an upload preset.
pub struct CloudinaryImageHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryImageHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.config.cloud_name
        )
    }
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    async fn upload(
        &self,
        file_name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<String, AppError> {
        let part = reqwest::multipart::Part::bytes(data)
            .file_name(sanitize_file_name(file_name))
            .mime_str(content_type)
            .context("invalid image content type")?;

        let form = reqwest::multipart::Form::new()
            .text("upload_preset", self.config.upload_preset.clone())
            .text("folder", self.config.folder.clone())
            .part("file", part);

        let response = self
            .client
            .post(self.endpoint())
            .multipart(form)
            .send()
            .await
            .context("Cloudinary request failed")?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(anyhow!(
                "Cloudinary upload failed with {status}: {body}"
            )));
        }

        let uploaded: CloudinaryUploadResponse = response
            .json()
            .await
            .context("unexpected Cloudinary response")?;

        tracing::info!("Uploaded image to {}", uploaded.secure_url);
        Ok(uploaded.secure_url)
    }
}
