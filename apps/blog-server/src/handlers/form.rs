//! Multipart post form extraction.

use actix_multipart::{Field, Multipart};
use bytes::{Bytes, BytesMut};
use futures::TryStreamExt;

use blog_core::PostForm;
use blog_core::domain::UploadedFile;

use crate::middleware::error::AppError;

/// Errors raised while reading a submitted form.
#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("malformed multipart payload: {0}")]
    Multipart(String),

    #[error("field `{field}` exceeds {limit} bytes")]
    TooLarge { field: String, limit: usize },

    #[error("field `{field}` must be a numeric id")]
    InvalidId { field: String },

    #[error("field `{field}` is not valid UTF-8")]
    InvalidText { field: String },
}

impl From<FormError> for AppError {
    fn from(err: FormError) -> Self {
        match err {
            FormError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            other => AppError::BadRequest(other.to_string()),
        }
    }
}

/// Read `title`, `content`, `category`, `tags` (or `tags[]`) and `thumbnail`.
/// Unknown fields are skipped.
pub async fn read_post_form(mut payload: Multipart, limit: usize) -> Result<PostForm, FormError> {
    let mut form = PostForm::default();

    while let Some(field) = payload.try_next().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => form.title = read_text(field, &name, limit).await?,
            "content" => form.content = read_text(field, &name, limit).await?,
            "category" => {
                let value = read_text(field, &name, limit).await?;
                form.category = parse_id(&value, &name)?;
            }
            "tags" | "tags[]" => {
                let value = read_text(field, &name, limit).await?;
                if let Some(id) = parse_id(&value, &name)? {
                    form.tags.push(id);
                }
            }
            "thumbnail" => form.thumbnail = read_file(field, limit).await?,
            _ => {
                tracing::debug!(field = %name, "Skipping unknown form field");
                read_bytes(field, &name, limit).await?;
            }
        }
    }

    Ok(form)
}

async fn read_file(field: Field, limit: usize) -> Result<Option<UploadedFile>, FormError> {
    let file_name = field
        .content_disposition()
        .and_then(|cd| cd.get_filename())
        .map(|name| name.trim().to_string())
        .unwrap_or_default();
    let data = read_bytes(field, "thumbnail", limit).await?;

    // Browsers send an empty part when no file was chosen.
    if file_name.is_empty() && data.is_empty() {
        return Ok(None);
    }

    Ok(Some(UploadedFile::new(file_name, data)))
}

async fn read_text(field: Field, name: &str, limit: usize) -> Result<String, FormError> {
    let data = read_bytes(field, name, limit).await?;
    String::from_utf8(data.to_vec()).map_err(|_| FormError::InvalidText {
        field: name.to_string(),
    })
}

async fn read_bytes(mut field: Field, name: &str, limit: usize) -> Result<Bytes, FormError> {
    let mut buf = BytesMut::new();
    while let Some(chunk) = field.try_next().await.map_err(multipart_error)? {
        if buf.len() + chunk.len() > limit {
            return Err(FormError::TooLarge {
                field: name.to_string(),
                limit,
            });
        }
        buf.extend_from_slice(&chunk);
    }
    Ok(buf.freeze())
}

/// Blank means "not submitted"; anything else must be an integer id.
fn parse_id(value: &str, field: &str) -> Result<Option<i64>, FormError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| FormError::InvalidId {
        field: field.to_string(),
    })
}

fn multipart_error(err: actix_multipart::MultipartError) -> FormError {
    FormError::Multipart(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id(" 7 ", "category").unwrap(), Some(7));
        assert_eq!(parse_id("", "category").unwrap(), None);
        assert!(matches!(
            parse_id("seven", "tags"),
            Err(FormError::InvalidId { .. })
        ));
    }
}
