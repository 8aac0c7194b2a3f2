//! # Core Traits (Ports)
//!
//! Any plugin must implement these traits to be used by the binary.

use async_trait::async_trait;
use crate::models::{Comment, Poster};
use uuid::Uuid;

/// Data persistence contract for posters and their embedded comments.
#[async_trait]
pub trait PosterRepo: Send + Sync {
    /// All posters, newest first (created_at descending), comments embedded.
    async fn list_posters(&self) -> anyhow::Result<Vec<Poster>>;

    async fn get_poster(&self, id: Uuid) -> anyhow::Result<Option<Poster>>;

    async fn create_poster(&self, poster: &Poster) -> anyhow::Result<()>;

    /// Atomic `likes = likes + 1` by identifier. Returns the updated poster,
    /// or None when the identifier does not resolve. Never read-modify-write:
    /// two concurrent likes must both count.
    async fn add_like(&self, id: Uuid) -> anyhow::Result<Option<Poster>>;

    /// Appends a comment (comments are append-only, never edited or removed
    /// individually). Returns the updated poster, or None on unknown id.
    async fn add_comment(&self, id: Uuid, comment: Comment) -> anyhow::Result<Option<Poster>>;

    /// Writes back scalar fields and image_url; comments and likes are not
    /// touched by this path.
    async fn update_poster(&self, poster: &Poster) -> anyhow::Result<()>;

    /// Removes the document (comments cascade). Returns false on unknown id.
    async fn delete_poster(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Media storage contract for handling image uploads.
#[async_trait]
pub trait ImageStore: Send + Sync {
    /// Validates and persists raw bytes; returns the generated file name.
    /// Rejects anything that is not a jpeg/jpg/png/gif by extension,
    /// declared MIME type, and sniffed content.
    async fn save(
        &self,
        data: Vec<u8>,
        original_name: &str,
        content_type: &str,
    ) -> crate::error::Result<String>;

    /// Best-effort removal of a previously stored file. A missing file is
    /// not an error.
    async fn remove(&self, file_name: &str) -> anyhow::Result<()>;

    /// Public URL under which the stored file is served.
    fn public_url(&self, file_name: &str) -> String;

    /// Inverse of `public_url`: the file name for a stored URL, if the URL
    /// points into this store.
    fn file_name(&self, public_url: &str) -> Option<String>;
}
