//! In-memory asset store for tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use crate::{AssetKind, AssetStore, AssetStoreError, UploadedImage, UploadedVideo};

/// Asset store that keeps uploads in a map and hands out predictable ids.
///
/// `destroy` on an unknown id answers the way a real store would: with a
/// rejection, not success.
#[derive(Default)]
pub struct MemoryAssetStore {
    assets: Mutex<HashMap<String, AssetKind>>,
    next_id: AtomicU64,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not yet destroyed) assets.
    pub fn len(&self) -> usize {
        self.assets.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether an asset id is currently stored.
    pub fn contains(&self, asset_id: &str) -> bool {
        self.assets.lock().unwrap().contains_key(asset_id)
    }

    fn store(&self, kind: AssetKind) -> String {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let asset_id = format!("{}-{}", kind.as_str(), id);
        self.assets.lock().unwrap().insert(asset_id.clone(), kind);
        asset_id
    }
}

#[async_trait::async_trait]
impl AssetStore for MemoryAssetStore {
    async fn upload_image(
        &self,
        _data: Vec<u8>,
        _filename: &str,
    ) -> Result<UploadedImage, AssetStoreError> {
        let asset_id = self.store(AssetKind::Image);
        Ok(UploadedImage {
            url: format!("https://assets.test/image/{asset_id}.jpg"),
            asset_id: asset_id.clone(),
            responsive: vec![
                format!("https://assets.test/image/{asset_id}_640.jpg"),
                format!("https://assets.test/image/{asset_id}_320.jpg"),
            ],
        })
    }

    async fn upload_video(
        &self,
        _data: Vec<u8>,
        _filename: &str,
    ) -> Result<UploadedVideo, AssetStoreError> {
        let asset_id = self.store(AssetKind::Video);
        Ok(UploadedVideo {
            url: format!("https://assets.test/video/{asset_id}.mp4"),
            asset_id,
        })
    }

    async fn destroy(&self, asset_id: &str, _kind: AssetKind) -> Result<(), AssetStoreError> {
        if self.assets.lock().unwrap().remove(asset_id).is_none() {
            return Err(AssetStoreError::Rejected(format!(
                "destroy result was 'not found' for '{asset_id}'"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_then_destroy() {
        let store = MemoryAssetStore::new();
        let image = store.upload_image(vec![1, 2, 3], "poster.jpg").await.unwrap();
        assert!(store.contains(&image.asset_id));
        assert_eq!(image.responsive.len(), 2);

        store
            .destroy(&image.asset_id, AssetKind::Image)
            .await
            .unwrap();
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_destroy_unknown_id_is_rejected() {
        let store = MemoryAssetStore::new();
        let err = store.destroy("nope", AssetKind::Video).await.unwrap_err();
        assert!(matches!(err, AssetStoreError::Rejected(_)));
    }
}
