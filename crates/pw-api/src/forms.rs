//! Multipart extraction for the poster create/update forms.
//!
//! The gallery page submits `multipart/form-data` with scalar text fields
//! plus an optional `image` file part. Everything is drained into memory up
//! front (posters are small images, capped below) so handlers work with a
//! plain struct instead of a stream.

use actix_multipart::Multipart;
use futures_util::TryStreamExt;
use pw_core::error::AppError;

use crate::error::ApiError;

/// Uploads above this are refused before any disk or DB work happens.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// An image file part, as received from the client.
pub struct UploadedImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Scalar fields of the poster form. `None` means the field was absent from
/// the submission, which matters for update's merge semantics.
#[derive(Default)]
pub struct PosterForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub display_date: Option<String>,
    pub image: Option<UploadedImage>,
}

pub async fn parse_poster_form(mut payload: Multipart) -> Result<PosterForm, ApiError> {
    let mut form = PosterForm::default();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("malformed multipart body: {}", e)))?
    {
        let disposition = field.content_disposition();
        let name = disposition.get_name().unwrap_or_default().to_string();
        let file_name = disposition.get_filename().map(str::to_string);

        let mut data = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("reading field '{}': {}", name, e)))?
        {
            if data.len() + chunk.len() > MAX_UPLOAD_BYTES {
                return Err(AppError::ValidationError(format!(
                    "upload exceeds {} byte limit",
                    MAX_UPLOAD_BYTES
                ))
                .into());
            }
            data.extend_from_slice(&chunk);
        }

        if name == "image" {
            // A file picker left empty still submits a part with no filename
            // and no bytes; treat that as "no image supplied".
            let file_name = file_name.unwrap_or_default();
            if file_name.is_empty() && data.is_empty() {
                continue;
            }
            let content_type = field
                .content_type()
                .map(|m| m.to_string())
                .unwrap_or_else(|| "application/octet-stream".to_string());
            form.image = Some(UploadedImage {
                file_name,
                content_type,
                data,
            });
            continue;
        }

        let value = String::from_utf8(data)
            .map_err(|_| AppError::ValidationError(format!("field '{}' is not UTF-8", name)))?;
        match name.as_str() {
            "title" => form.title = Some(value),
            "description" => form.description = Some(value),
            "category" => form.category = Some(value),
            "tags" => form.tags = Some(value),
            "displayDate" => form.display_date = Some(value),
            // Unknown fields are ignored, as the original server did.
            _ => {}
        }
    }

    Ok(form)
}
