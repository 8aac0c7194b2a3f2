//! # pw-storage-local
//! poster-wall/crates/pw-storage-local/src/lib.rs
//! Local filesystem implementation of `ImageStore`.
//! Features: image allow-list validation, content sniffing, and
//! timestamp-derived collision-resistant filenames.

use async_trait::async_trait;
use chrono::Utc;
use image::ImageFormat;
use pw_core::error::{AppError, Result};
use pw_core::traits::ImageStore;
use std::path::{Path, PathBuf};
use tokio::fs;
use uuid::Uuid;

/// Extensions the gallery accepts. Both the file extension and the declared
/// MIME type must land in this set, and the bytes must sniff as one of them.
const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "gif"];
const ALLOWED_MIME_TYPES: [&str; 3] = ["image/jpeg", "image/png", "image/gif"];

pub struct LocalImageStore {
    /// Root directory for all uploads (e.g., "./public/uploads")
    root_path: PathBuf,
    /// Public URL prefix (e.g., "/uploads")
    url_prefix: String,
}

impl LocalImageStore {
    pub fn new(root: PathBuf, url_prefix: String) -> Self {
        Self {
            root_path: root,
            url_prefix: url_prefix.trim_end_matches('/').to_string(),
        }
    }

    /// Lowercased extension of the client's original filename.
    fn extension_of(original_name: &str) -> Option<String> {
        Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
    }

    /// Generates "\<unix-millis\>-\<8 hex\>.\<ext\>". The random suffix keeps
    /// two uploads landing in the same millisecond from colliding.
    fn generate_name(ext: &str) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!("{}-{}.{}", Utc::now().timestamp_millis(), &suffix[..8], ext)
    }

    /// The three allowed-set checks: extension, declared MIME, sniffed bytes.
    fn validate(data: &[u8], original_name: &str, content_type: &str) -> Result<String> {
        let ext = Self::extension_of(original_name).ok_or_else(|| {
            AppError::ValidationError(format!("file '{}' has no extension", original_name))
        })?;
        if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(AppError::ValidationError(format!(
                "only image files are allowed, got '.{}'",
                ext
            )));
        }
        if !ALLOWED_MIME_TYPES.contains(&content_type) {
            return Err(AppError::ValidationError(format!(
                "only image files are allowed, got content type '{}'",
                content_type
            )));
        }
        // Don't trust the headers: the bytes themselves must parse as an
        // allowed image format.
        match image::guess_format(data) {
            Ok(ImageFormat::Jpeg) | Ok(ImageFormat::Png) | Ok(ImageFormat::Gif) => Ok(ext),
            _ => Err(AppError::ValidationError(
                "file content is not a recognized image".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ImageStore for LocalImageStore {
    /// Validates and writes an upload under a timestamp-derived name.
    async fn save(&self, data: Vec<u8>, original_name: &str, content_type: &str) -> Result<String> {
        if data.is_empty() {
            return Err(AppError::ValidationError("uploaded file is empty".to_string()));
        }
        let ext = Self::validate(&data, original_name, content_type)?;

        // Upload directory is created lazily on first use.
        fs::create_dir_all(&self.root_path)
            .await
            .map_err(|e| AppError::Internal(format!("creating upload dir: {}", e)))?;

        let name = Self::generate_name(&ext);
        let target = self.root_path.join(&name);
        fs::write(&target, &data)
            .await
            .map_err(|e| AppError::Internal(format!("writing upload: {}", e)))?;

        log::debug!("stored upload {} ({} bytes)", name, data.len());
        Ok(name)
    }

    /// Removes a stored file, treating "already gone" as success.
    async fn remove(&self, file_name: &str) -> anyhow::Result<()> {
        // Stored names never contain separators; anything else is not ours.
        if file_name.contains('/') || file_name.contains("..") {
            anyhow::bail!("refusing to remove non-local name '{}'", file_name);
        }
        match fs::remove_file(self.root_path.join(file_name)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn public_url(&self, file_name: &str) -> String {
        format!("{}/{}", self.url_prefix, file_name)
    }

    fn file_name(&self, public_url: &str) -> Option<String> {
        let rest = public_url.strip_prefix(&self.url_prefix)?.strip_prefix('/')?;
        if rest.is_empty() || rest.contains('/') {
            return None;
        }
        Some(rest.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::DynamicImage;
    use std::io::Cursor;

    fn temp_store() -> LocalImageStore {
        let dir = std::env::temp_dir().join(format!("pw-storage-test-{}", Uuid::new_v4()));
        LocalImageStore::new(dir, "/uploads".to_string())
    }

    fn png_bytes() -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        DynamicImage::new_rgb8(2, 2)
            .write_to(&mut buf, image::ImageOutputFormat::Png)
            .unwrap();
        buf.into_inner()
    }

    #[tokio::test]
    async fn test_save_and_remove_round_trip() {
        let store = temp_store();
        let name = store
            .save(png_bytes(), "poster.png", "image/png")
            .await
            .unwrap();
        assert!(name.ends_with(".png"));
        assert!(store.root_path.join(&name).exists());

        let url = store.public_url(&name);
        assert_eq!(store.file_name(&url).as_deref(), Some(name.as_str()));

        store.remove(&name).await.unwrap();
        assert!(!store.root_path.join(&name).exists());
        // Removing again is not an error.
        store.remove(&name).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_disallowed_extension() {
        let store = temp_store();
        let err = store
            .save(png_bytes(), "notes.txt", "text/plain")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
        // Nothing was written.
        assert!(!store.root_path.exists());
    }

    #[tokio::test]
    async fn test_rejects_non_image_content() {
        let store = temp_store();
        let err = store
            .save(b"plain text pretending".to_vec(), "fake.png", "image/png")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_two_saves_get_distinct_names() {
        let store = temp_store();
        let a = store.save(png_bytes(), "a.png", "image/png").await.unwrap();
        let b = store.save(png_bytes(), "b.png", "image/png").await.unwrap();
        assert_ne!(a, b);
    }
}
