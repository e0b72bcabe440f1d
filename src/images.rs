use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// An image file received alongside the product fields.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Map an accepted image MIME type to the extension stored files get.
fn extension_for(content_type: &str) -> Option<&'static str> {
    match content_type {
        "image/jpeg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

/// Check type and size limits without touching the filesystem.
pub fn validate(upload: &ImageUpload) -> AppResult<&'static str> {
    let ext = extension_for(&upload.content_type).ok_or_else(|| {
        AppError::Validation(format!(
            "unsupported image type {}; allowed: JPEG, PNG, GIF, WebP",
            upload.content_type
        ))
    })?;
    if upload.bytes.len() > MAX_IMAGE_BYTES {
        return Err(AppError::Validation(
            "image exceeds the 5 MB size limit".to_string(),
        ));
    }
    Ok(ext)
}

/// Writes validated uploads under a local directory and hands out the
/// public URLs they are served from.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
    public_base: String,
}

impl ImageStore {
    pub fn new(root: impl Into<PathBuf>, public_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base: format!("{}/uploads", public_url.trim_end_matches('/')),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Validate and persist an upload, returning the public URL the stored
    /// file is reachable at. The record pointing at it must only be written
    /// after this returns.
    pub async fn store(&self, upload: &ImageUpload) -> AppResult<String> {
        let ext = validate(upload)?;
        let file_name = format!("{}.{ext}", Uuid::new_v4());
        fs::create_dir_all(&self.root)
            .await
            .map_err(AppError::Storage)?;
        let path = self.root.join(&file_name);
        fs::write(&path, &upload.bytes)
            .await
            .map_err(AppError::Storage)?;
        tracing::debug!(file = %file_name, bytes = upload.bytes.len(), "stored image");
        Ok(format!("{}/{file_name}", self.public_base))
    }

    /// Remove a previously stored file, given the public URL `store`
    /// returned. URLs pointing anywhere else are ignored.
    pub async fn discard(&self, url: &str) {
        let Some(file_name) = url.strip_prefix(&format!("{}/", self.public_base)) else {
            return;
        };
        // Only plain file names; a crafted URL must not escape the root.
        if file_name.contains('/') || file_name.contains("..") {
            return;
        }
        if let Err(err) = fs::remove_file(self.root.join(file_name)).await {
            tracing::warn!(error = %err, file = %file_name, "failed to remove stored image");
        }
    }
}
