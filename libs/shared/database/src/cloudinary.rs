use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use reqwest::Client;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{debug, error, info};

use shared_config::AppConfig;
use shared_models::error::AppError;

/// Uploads are resized to this width server-side.
const UPLOAD_TRANSFORMATION: &str = "w_300,c_scale";

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("Image host not configured")]
    NotConfigured,

    #[error("Invalid image data: {0}")]
    InvalidImage(String),

    #[error("Image host request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Image host API error: {0}")]
    Api(String),
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidImage(msg) => AppError::BadRequest(msg),
            other => {
                tracing::error!("Image host failure: {}", other);
                AppError::Internal("Failed to upload image".to_string())
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Signed-upload client for the Cloudinary image API.
pub struct CloudinaryClient {
    client: Client,
    base_url: String,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl CloudinaryClient {
    pub fn new(config: &AppConfig) -> Result<Self, MediaError> {
        if !config.is_media_configured() {
            return Err(MediaError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.cloudinary_base_url.trim_end_matches('/').to_string(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        })
    }

    /// Uploads a base64 data URI (`data:image/png;base64,...`) into `folder`.
    pub async fn upload(&self, data_uri: &str, folder: &str) -> Result<UploadedImage, MediaError> {
        validate_data_uri(data_uri)?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[
                ("folder", folder),
                ("timestamp", &timestamp),
                ("transformation", UPLOAD_TRANSFORMATION),
            ],
            &self.api_secret,
        );

        let url = format!("{}/{}/image/upload", self.base_url, self.cloud_name);
        debug!("Uploading image to folder {}", folder);

        let form = [
            ("file", data_uri),
            ("folder", folder),
            ("timestamp", &timestamp),
            ("transformation", UPLOAD_TRANSFORMATION),
            ("api_key", &self.api_key),
            ("signature", &signature),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            error!("Image upload failed: {} - {}", status, text);
            return Err(MediaError::Api(format!("HTTP {}: {}", status, text)));
        }

        let uploaded: UploadedImage = serde_json::from_str(&text)
            .map_err(|e| MediaError::Api(format!("Failed to parse upload response: {}", e)))?;

        info!("Uploaded image {}", uploaded.public_id);
        Ok(uploaded)
    }

    /// Deletes an image by public id (`doctors/abc123`).
    pub async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.api_secret,
        );

        let url = format!("{}/{}/image/destroy", self.base_url, self.cloud_name);
        debug!("Deleting image {}", public_id);

        let form = [
            ("public_id", public_id),
            ("timestamp", &timestamp),
            ("api_key", &self.api_key),
            ("signature", &signature),
            ("signature_algorithm", "sha256"),
        ];

        let response = self.client.post(&url).form(&form).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(MediaError::Api(format!("HTTP {}: {}", status, text)));
        }

        let destroyed: DestroyResponse = serde_json::from_str(&text)
            .map_err(|e| MediaError::Api(format!("Failed to parse destroy response: {}", e)))?;

        if destroyed.result != "ok" {
            return Err(MediaError::Api(format!("Unexpected destroy result: {}", destroyed.result)));
        }

        Ok(())
    }
}

/// SHA-256 request signature: params sorted by key, joined as `k=v&k=v`,
/// with the API secret appended.
pub fn sign(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
    sorted.sort_by(|a, b| a.0.cmp(b.0));

    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let digest = Sha256::digest(format!("{}{}", joined, secret).as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Derives `folder/name` from a delivery URL such as
/// `https://res.cloudinary.com/demo/image/upload/v1712/doctors/abc123.jpg`.
pub fn public_id_from_url(url: &str, folder: &str) -> Option<String> {
    let file = url.rsplit('/').next()?;
    let stem = file.split('.').next()?;
    if stem.is_empty() {
        return None;
    }
    Some(format!("{}/{}", folder, stem))
}

fn validate_data_uri(data_uri: &str) -> Result<(), MediaError> {
    let (header, data) = data_uri
        .split_once(',')
        .ok_or_else(|| MediaError::InvalidImage("Image must be a base64 data URI".to_string()))?;

    if !header.starts_with("data:image/") || !header.ends_with(";base64") {
        return Err(MediaError::InvalidImage("Image must be a base64 data URI".to_string()));
    }

    BASE64
        .decode(data.trim())
        .map_err(|_| MediaError::InvalidImage("Image data is not valid base64".to_string()))?;

    Ok(())
}
