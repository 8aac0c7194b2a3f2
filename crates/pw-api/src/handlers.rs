//! # pw-api Handlers
//!
//! This module coordinates the flow between HTTP requests and Core traits.

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use askama::Template;
use chrono::{DateTime, NaiveDate, Utc};
use pw_core::error::AppError;
use pw_core::models::{parse_tags, Comment, Poster};
use pw_core::traits::{ImageStore, PosterRepo};
use pw_ui::GalleryTemplate;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::error::ApiError;
use crate::forms::{parse_poster_form, PosterForm, UploadedImage};

/// State shared across all Actix-web workers.
pub struct AppState {
    pub repo: Box<dyn PosterRepo>,
    pub store: Box<dyn ImageStore>,
}

/// GET /post — the full collection, newest first, comments embedded.
pub async fn list_posters(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posters = data.repo.list_posters().await?;
    Ok(HttpResponse::Ok().json(posters))
}

/// POST /post — create a poster from a multipart form.
///
/// The image is written to the store first; if the document insert then
/// fails, the freshly written file is removed best-effort so a rejected
/// create leaves nothing behind.
pub async fn create_poster(
    data: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let form = parse_poster_form(payload).await?;

    // 1. Required fields.
    let title = required_trimmed(form.title.as_deref(), "title")?;
    let image = form
        .image
        .as_ref()
        .ok_or_else(|| AppError::ValidationError("an image file is required".to_string()))?;

    // 2. File first: validation + disk write happen inside the store.
    let file_name = save_image(data.store.as_ref(), image).await?;

    // 3. Assemble the document.
    let mut poster = Poster::new(title, data.store.public_url(&file_name));
    poster.description = optional_trimmed(form.description.as_deref());
    poster.category = optional_trimmed(form.category.as_deref());
    poster.tags = form.tags.as_deref().map(parse_tags).unwrap_or_default();
    poster.display_date = Some(match form.display_date.as_deref() {
        Some(raw) if !raw.trim().is_empty() => parse_display_date(raw)?,
        // The original defaulted a missing display date to the upload time.
        _ => poster.created_at,
    });

    // 4. Persist, cleaning up the file if the insert is rejected.
    if let Err(err) = data.repo.create_poster(&poster).await {
        if let Err(cleanup) = data.store.remove(&file_name).await {
            log::warn!("orphaned upload {} after failed insert: {}", file_name, cleanup);
        }
        return Err(err.into());
    }

    log::info!("created poster {} ({})", poster.id, poster.title);
    Ok(HttpResponse::Created().json(poster))
}

/// POST /post/{id}/like — atomic increment; likes only ever go up.
pub async fn like_poster(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    match data.repo.add_like(id).await? {
        Some(poster) => Ok(HttpResponse::Ok().json(poster)),
        None => Err(not_found(id)),
    }
}

#[derive(Deserialize)]
pub struct CommentBody {
    text: Option<String>,
    author: Option<String>,
}

/// POST /post/{id}/comment — appends a comment with a server-assigned time.
pub async fn comment_poster(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentBody>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let comment = Comment {
        text: required_trimmed(body.text.as_deref(), "text")?,
        author: required_trimmed(body.author.as_deref(), "author")?,
        created_at: Utc::now(),
    };
    match data.repo.add_comment(id, comment).await? {
        Some(poster) => Ok(HttpResponse::Ok().json(poster)),
        None => Err(not_found(id)),
    }
}

/// PUT /post/{id} — merge update. Fields absent from the form keep their
/// prior value; a supplied image replaces the old file, which is removed
/// from disk only after the document write confirms.
pub async fn update_poster(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let form = parse_poster_form(payload).await?;

    // 1. Load the current document.
    let mut poster = data.repo.get_poster(id).await?.ok_or_else(|| not_found(id))?;
    let old_image_url = poster.image_url.clone();

    // 2. New file (if any) is written before the document is touched.
    let new_file = match form.image.as_ref() {
        Some(image) => Some(save_image(data.store.as_ref(), image).await?),
        None => None,
    };

    // 3. Merge scalar fields.
    merge_fields(&mut poster, &form)?;
    if let Some(name) = &new_file {
        poster.image_url = data.store.public_url(name);
    }
    poster.updated_at = Utc::now();

    data.repo.update_poster(&poster).await?;

    // 4. Only now is the replaced file deleted; absence is ignored, failure
    //    merely orphans a file and never dangles a reference.
    if new_file.is_some() {
        remove_stored_file(data.store.as_ref(), &old_image_url).await;
    }

    Ok(HttpResponse::Ok().json(poster))
}

/// DELETE /post/{id} — removes the document, then its image file.
pub async fn delete_poster(
    data: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();

    let poster = data.repo.get_poster(id).await?.ok_or_else(|| not_found(id))?;
    if !data.repo.delete_poster(id).await? {
        // Raced with another delete.
        return Err(not_found(id));
    }

    remove_stored_file(data.store.as_ref(), &poster.image_url).await;

    log::info!("deleted poster {} ({})", poster.id, poster.title);
    Ok(HttpResponse::Ok().json(json!({ "message": "Poster deleted" })))
}

/// GET / — the server-rendered gallery page.
pub async fn gallery(data: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let posters = data.repo.list_posters().await?;
    let html = GalleryTemplate { posters: &posters }
        .render()
        .map_err(|e| AppError::Internal(format!("rendering gallery: {}", e)))?;
    Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

// ── helpers ────────────────────────────────────────────────────────────────

fn not_found(id: Uuid) -> ApiError {
    AppError::NotFound("Poster".to_string(), id.to_string()).into()
}

fn required_trimmed(value: Option<&str>, field: &str) -> Result<String, ApiError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::ValidationError(format!("'{}' is required", field)).into()),
    }
}

fn optional_trimmed(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

async fn save_image(store: &dyn ImageStore, image: &UploadedImage) -> Result<String, ApiError> {
    store
        .save(image.data.clone(), &image.file_name, &image.content_type)
        .await
        .map_err(ApiError::from)
}

/// Best-effort removal of the file behind a stored image URL.
async fn remove_stored_file(store: &dyn ImageStore, image_url: &str) {
    let Some(file_name) = store.file_name(image_url) else {
        log::warn!("image url '{}' does not point into the store", image_url);
        return;
    };
    if let Err(e) = store.remove(&file_name).await {
        log::warn!("could not remove stored file {}: {}", file_name, e);
    }
}

/// Applies supplied scalar fields onto an existing poster. A blank title is
/// rejected rather than merged — posters never lose their title.
fn merge_fields(poster: &mut Poster, form: &PosterForm) -> Result<(), ApiError> {
    if let Some(title) = form.title.as_deref() {
        let title = title.trim();
        if title.is_empty() {
            return Err(AppError::ValidationError("'title' cannot be blank".to_string()).into());
        }
        poster.title = title.to_string();
    }
    if let Some(description) = form.description.as_deref() {
        poster.description = optional_trimmed(Some(description));
    }
    if let Some(category) = form.category.as_deref() {
        poster.category = optional_trimmed(Some(category));
    }
    if let Some(tags) = form.tags.as_deref() {
        poster.tags = parse_tags(tags);
    }
    if let Some(raw) = form.display_date.as_deref() {
        if !raw.trim().is_empty() {
            poster.display_date = Some(parse_display_date(raw)?);
        }
    }
    Ok(())
}

/// Accepts RFC 3339 or the bare `YYYY-MM-DD` the date picker submits.
fn parse_display_date(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    Err(AppError::ValidationError(format!("'{}' is not a valid display date", raw)).into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_display_date_accepts_bare_date() {
        let dt = parse_display_date("2024-05-01").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-05-01T00:00:00+00:00");
    }

    #[test]
    fn test_parse_display_date_accepts_rfc3339() {
        assert!(parse_display_date("2024-05-01T12:30:00Z").is_ok());
    }

    #[test]
    fn test_parse_display_date_rejects_garbage() {
        assert!(parse_display_date("next tuesday").is_err());
    }

    #[test]
    fn test_required_trimmed() {
        assert_eq!(required_trimmed(Some("  hi "), "title").unwrap(), "hi");
        assert!(required_trimmed(Some("   "), "title").is_err());
        assert!(required_trimmed(None, "title").is_err());
    }
}
