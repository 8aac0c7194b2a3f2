//! # Domain Models
//!
//! These structs represent the core entities of Poster-Wall.
//! We use UUID v7 for time-ordered, globally unique identification.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Utc};

/// The primary content record: one gallery entry.
///
/// Serialized in camelCase because that is the wire shape the gallery
/// page (and any other JSON consumer) expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poster {
    pub id: Uuid,
    /// Required, trimmed, non-empty at creation
    pub title: String,
    /// Public path of the stored image (e.g., "/uploads/1693...-a1b2c3d4.png")
    pub image_url: String,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Ordered; parsed from a comma-separated string on upload
    pub tags: Vec<String>,
    /// Defaults to the upload time when the client omits it
    pub display_date: Option<DateTime<Utc>>,
    /// Monotonically non-decreasing; mutated only by the like operation
    pub likes: i64,
    /// Insertion order = display order. Append-only.
    pub comments: Vec<Comment>,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every mutation
    pub updated_at: DateTime<Utc>,
}

/// A user-submitted text annotation attached to a Poster.
/// Owned entirely by its parent and destroyed with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub author: String,
    pub created_at: DateTime<Utc>,
}

impl Poster {
    /// Constructs a fresh Poster with zeroed counters and stamped timestamps.
    pub fn new(title: String, image_url: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title,
            image_url,
            description: None,
            category: None,
            tags: Vec::new(),
            display_date: Some(now),
            likes: 0,
            comments: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Splits a comma-separated tag string into trimmed, non-empty tags,
/// preserving order.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
