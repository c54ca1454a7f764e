//! External asset-store capability.
//!
//! Poster, trailer, and avatar binaries never touch the database; they live
//! in an external object store addressed by an opaque asset id. This crate
//! defines the [`AssetStore`] trait the API layer talks to, an HTTP provider
//! for a Cloudinary-style upload API, and an in-memory provider for tests.

pub mod http;
pub mod memory;

pub use http::HttpAssetStore;
pub use memory::MemoryAssetStore;

/// Whether an asset id names an image or a video. Destroy calls must name
/// the right resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetKind {
    Image,
    Video,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Image => "image",
            AssetKind::Video => "video",
        }
    }
}

/// An uploaded image: canonical URL, opaque asset id, and any derived
/// responsive-size URLs the store produced.
#[derive(Debug, Clone)]
pub struct UploadedImage {
    pub url: String,
    pub asset_id: String,
    pub responsive: Vec<String>,
}

/// An uploaded video: canonical URL and opaque asset id.
#[derive(Debug, Clone)]
pub struct UploadedVideo {
    pub url: String,
    pub asset_id: String,
}

/// Error type for asset-store operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetStoreError {
    /// The HTTP round trip itself failed.
    #[error("asset store transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The store answered but did not report success.
    #[error("asset store rejected the operation: {0}")]
    Rejected(String),
}

/// The upload/destroy capability every provider implements.
#[async_trait::async_trait]
pub trait AssetStore: Send + Sync {
    /// Upload an image; the store derives responsive variants.
    async fn upload_image(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, AssetStoreError>;

    /// Upload a video (movie trailers).
    async fn upload_video(
        &self,
        data: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedVideo, AssetStoreError>;

    /// Destroy an asset by id. A non-"ok" answer is an error, not a no-op.
    async fn destroy(&self, asset_id: &str, kind: AssetKind) -> Result<(), AssetStoreError>;
}
