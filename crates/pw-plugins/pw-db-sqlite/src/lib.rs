//! # pw-db-sqlite Implementation
//!
//! This module implements the data mapping between the SQLite relational model
//! and the `pw-core` domain models. Posters live in one table; their embedded
//! comments live in a child table ordered by insertion sequence, so the
//! append-only display order never depends on timestamp resolution.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pw_core::models::{Comment, Poster};
use pw_core::traits::PosterRepo;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::HashMap;
use std::str::FromStr;
use uuid::Uuid;

const CREATE_POSTERS: &str = "
CREATE TABLE IF NOT EXISTS posters (
    id           BLOB PRIMARY KEY,
    title        TEXT NOT NULL,
    image_url    TEXT NOT NULL,
    description  TEXT,
    category     TEXT,
    tags         TEXT NOT NULL DEFAULT '[]',
    display_date TEXT,
    likes        INTEGER NOT NULL DEFAULT 0,
    created_at   TEXT NOT NULL,
    updated_at   TEXT NOT NULL
)";

const CREATE_COMMENTS: &str = "
CREATE TABLE IF NOT EXISTS comments (
    seq        INTEGER PRIMARY KEY AUTOINCREMENT,
    poster_id  BLOB NOT NULL REFERENCES posters(id) ON DELETE CASCADE,
    text       TEXT NOT NULL,
    author     TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

pub struct SqlitePosterRepo {
    pool: SqlitePool,
}

// Helper for UUID conversion
fn uuid_to_blob(id: Uuid) -> Vec<u8> {
    id.as_bytes().to_vec()
}

fn blob_to_uuid(blob: &[u8]) -> Uuid {
    Uuid::from_slice(blob).unwrap_or_default()
}

impl SqlitePosterRepo {
    /// Connects (creating the database file if missing) and applies the
    /// schema. SQLite is single-writer anyway; one pooled connection also
    /// keeps `sqlite::memory:` databases coherent across calls.
    pub async fn new(url: &str) -> anyhow::Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        sqlx::query(CREATE_POSTERS).execute(&pool).await?;
        sqlx::query(CREATE_COMMENTS).execute(&pool).await?;
        log::debug!("sqlite schema ready at {}", url);

        Ok(Self { pool })
    }

    fn row_to_poster(row: &sqlx::sqlite::SqliteRow, comments: Vec<Comment>) -> Poster {
        Poster {
            id: blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice()),
            title: row.get("title"),
            image_url: row.get("image_url"),
            description: row.get("description"),
            category: row.get("category"),
            tags: serde_json::from_str(&row.get::<String, _>("tags")).unwrap_or_default(),
            display_date: row.get("display_date"),
            likes: row.get("likes"),
            comments,
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
        }
    }

    fn row_to_comment(row: &sqlx::sqlite::SqliteRow) -> Comment {
        Comment {
            text: row.get("text"),
            author: row.get("author"),
            created_at: row.get("created_at"),
        }
    }

    async fn comments_for(&self, id: Uuid) -> anyhow::Result<Vec<Comment>> {
        let rows = sqlx::query(
            "SELECT text, author, created_at FROM comments WHERE poster_id = ? ORDER BY seq ASC",
        )
        .bind(uuid_to_blob(id))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.iter().map(Self::row_to_comment).collect())
    }
}

#[async_trait]
impl PosterRepo for SqlitePosterRepo {
    /// Full collection, newest first, with comments embedded. Comments are
    /// pulled in one query and grouped in memory rather than per poster.
    async fn list_posters(&self) -> anyhow::Result<Vec<Poster>> {
        let comment_rows =
            sqlx::query("SELECT poster_id, text, author, created_at FROM comments ORDER BY seq ASC")
                .fetch_all(&self.pool)
                .await?;

        let mut by_poster: HashMap<Uuid, Vec<Comment>> = HashMap::new();
        for row in &comment_rows {
            let poster_id = blob_to_uuid(row.get::<Vec<u8>, _>("poster_id").as_slice());
            by_poster.entry(poster_id).or_default().push(Self::row_to_comment(row));
        }

        let rows = sqlx::query("SELECT * FROM posters ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .iter()
            .map(|row| {
                let id = blob_to_uuid(row.get::<Vec<u8>, _>("id").as_slice());
                Self::row_to_poster(row, by_poster.remove(&id).unwrap_or_default())
            })
            .collect())
    }

    async fn get_poster(&self, id: Uuid) -> anyhow::Result<Option<Poster>> {
        let row = sqlx::query("SELECT * FROM posters WHERE id = ?")
            .bind(uuid_to_blob(id))
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let comments = self.comments_for(id).await?;
                Ok(Some(Self::row_to_poster(&row, comments)))
            }
            None => Ok(None),
        }
    }

    async fn create_poster(&self, poster: &Poster) -> anyhow::Result<()> {
        sqlx::query(
            "INSERT INTO posters (id, title, image_url, description, category, tags, display_date, likes, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(uuid_to_blob(poster.id))
        .bind(&poster.title)
        .bind(&poster.image_url)
        .bind(&poster.description)
        .bind(&poster.category)
        .bind(serde_json::to_string(&poster.tags)?)
        .bind(poster.display_date)
        .bind(poster.likes)
        .bind(poster.created_at)
        .bind(poster.updated_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// The increment happens inside the database, so two concurrent likes
    /// both count — no read-modify-write window.
    async fn add_like(&self, id: Uuid) -> anyhow::Result<Option<Poster>> {
        let result = sqlx::query("UPDATE posters SET likes = likes + 1, updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_poster(id).await
    }

    /// Appends inside a transaction so the parent's updated_at stamp and the
    /// comment row land together.
    async fn add_comment(&self, id: Uuid, comment: Comment) -> anyhow::Result<Option<Poster>> {
        let mut tx = self.pool.begin().await?;

        let stamped = sqlx::query("UPDATE posters SET updated_at = ? WHERE id = ?")
            .bind(comment.created_at)
            .bind(uuid_to_blob(id))
            .execute(&mut *tx)
            .await?;
        if stamped.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }

        sqlx::query("INSERT INTO comments (poster_id, text, author, created_at) VALUES (?, ?, ?, ?)")
            .bind(uuid_to_blob(id))
            .bind(&comment.text)
            .bind(&comment.author)
            .bind(comment.created_at)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        self.get_poster(id).await
    }

    /// Writes back scalar fields and image_url. Likes and comments are owned
    /// by their own operations and are deliberately absent here.
    async fn update_poster(&self, poster: &Poster) -> anyhow::Result<()> {
        sqlx::query(
            "UPDATE posters SET title = ?, image_url = ?, description = ?, category = ?, tags = ?, display_date = ?, updated_at = ? WHERE id = ?",
        )
        .bind(&poster.title)
        .bind(&poster.image_url)
        .bind(&poster.description)
        .bind(&poster.category)
        .bind(serde_json::to_string(&poster.tags)?)
        .bind(poster.display_date)
        .bind(poster.updated_at)
        .bind(uuid_to_blob(poster.id))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Comments go with the parent via ON DELETE CASCADE.
    async fn delete_poster(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM posters WHERE id = ?")
            .bind(uuid_to_blob(id))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
