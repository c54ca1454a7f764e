//! HTTP provider for a Cloudinary-style upload API.
//!
//! Endpoints:
//! - `POST {base_url}/{kind}/upload` (multipart: `file`, `api_key`) returning
//!   `{secure_url, public_id, responsive_breakpoints?}`
//! - `POST {base_url}/{kind}/destroy` (form: `public_id`, `api_key`)
//!   returning `{result: "ok" | ...}`

use serde::Deserialize;

use crate::{AssetKind, AssetStore, AssetStoreError, UploadedImage, UploadedVideo};

/// Poster/avatar transformation width requested from the store.
const IMAGE_MAX_WIDTH: u32 = 1280;

/// Maximum derived responsive variants requested per image.
const RESPONSIVE_MAX_IMAGES: u32 = 3;

/// Maximum width of a derived responsive variant.
const RESPONSIVE_MAX_WIDTH: u32 = 640;

/// Configuration for [`HttpAssetStore`], loaded from the environment.
#[derive(Debug, Clone)]
pub struct AssetStoreConfig {
    /// Base URL of the upload API, e.g. `https://assets.example.com/v1`.
    pub base_url: String,
    /// API key sent with every request.
    pub api_key: String,
}

impl AssetStoreConfig {
    /// Load configuration from `ASSET_STORE_URL` / `ASSET_STORE_KEY`.
    ///
    /// # Panics
    ///
    /// Panics if either variable is missing; the server cannot run without
    /// its asset store.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("ASSET_STORE_URL").expect("ASSET_STORE_URL must be set");
        let api_key = std::env::var("ASSET_STORE_KEY").expect("ASSET_STORE_KEY must be set");
        Self { base_url, api_key }
    }
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
    #[serde(default)]
    responsive_breakpoints: Vec<BreakpointSet>,
}

#[derive(Debug, Deserialize)]
struct BreakpointSet {
    #[serde(default)]
    breakpoints: Vec<Breakpoint>,
}

#[derive(Debug, Deserialize)]
struct Breakpoint {
    secure_url: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// Asset store backed by an HTTP upload API.
pub struct HttpAssetStore {
    client: reqwest::Client,
    config: AssetStoreConfig,
}

impl HttpAssetStore {
    pub fn new(config: AssetStoreConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        kind: AssetKind,
    ) -> Result<UploadResponse, AssetStoreError> {
        let mut form = reqwest::multipart::Form::new()
            .text("api_key", self.config.api_key.clone())
            .part(
                "file",
                reqwest::multipart::Part::bytes(data).file_name(filename.to_string()),
            );

        if kind == AssetKind::Image {
            form = form
                .text("width", IMAGE_MAX_WIDTH.to_string())
                .text("responsive_max_images", RESPONSIVE_MAX_IMAGES.to_string())
                .text("responsive_max_width", RESPONSIVE_MAX_WIDTH.to_string());
        }

        let url = format!("{}/{}/upload", self.config.base_url, kind.as_str());
        let response = self.client.post(&url).multipart(form).send().await?;

        if !response.status().is_success() {
            return Err(AssetStoreError::Rejected(format!(
                "upload returned HTTP {}",
                response.status()
            )));
        }

        Ok(response.json::<UploadResponse>().await?)
    }
}

#[async_trait::async_trait]
impl AssetStore for HttpAssetStore {
    async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, AssetStoreError> {
        let uploaded = self.upload(data, filename, AssetKind::Image).await?;

        let responsive = uploaded
            .responsive_breakpoints
            .into_iter()
            .flat_map(|set| set.breakpoints)
            .map(|bp| bp.secure_url)
            .collect();

        Ok(UploadedImage {
            url: uploaded.secure_url,
            asset_id: uploaded.public_id,
            responsive,
        })
    }

    async fn upload_video(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedVideo, AssetStoreError> {
        let uploaded = self.upload(data, filename, AssetKind::Video).await?;
        Ok(UploadedVideo {
            url: uploaded.secure_url,
            asset_id: uploaded.public_id,
        })
    }

    async fn destroy(&self, asset_id: &str, kind: AssetKind) -> Result<(), AssetStoreError> {
        let url = format!("{}/{}/destroy", self.config.base_url, kind.as_str());
        let response = self
            .client
            .post(&url)
            .form(&[
                ("public_id", asset_id),
                ("api_key", self.config.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AssetStoreError::Rejected(format!(
                "destroy returned HTTP {}",
                response.status()
            )));
        }

        let body = response.json::<DestroyResponse>().await?;
        if body.result != "ok" {
            return Err(AssetStoreError::Rejected(format!(
                "destroy result was '{}'",
                body.result
            )));
        }
        Ok(())
    }
}
