//! Post form input and its validation rules.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use validator::Validate;

use crate::domain::UploadedFile;

/// Largest accepted thumbnail, in kilobytes.
pub const MAX_THUMBNAIL_KB: usize = 2048;

/// Thumbnail extensions accepted by the `mimes` rule.
pub const THUMBNAIL_EXTENSIONS: [&str; 3] = ["jpg", "png", "jpeg"];

/// Whether a thumbnail must accompany the submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThumbnailRule {
    /// Creating a post: a thumbnail is mandatory.
    Required,
    /// Editing a post: the current thumbnail is kept when none is sent.
    Optional,
}

/// Raw post form as submitted by the client.
#[derive(Debug, Clone, Default, Validate)]
pub struct PostForm {
    #[validate(length(
        min = 10,
        max = 25,
        message = "The title must be between 10 and 25 characters."
    ))]
    pub title: String,

    #[validate(length(min = 1, message = "The content field is required."))]
    pub content: String,

    #[validate(required(message = "The category field is required."))]
    pub category: Option<i64>,

    #[validate(length(min = 1, message = "The tags field is required."))]
    pub tags: Vec<i64>,

    pub thumbnail: Option<UploadedFile>,
}

/// Post input that passed every field rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPost {
    pub title: String,
    pub content: String,
    pub category_id: i64,
    /// Sorted, without duplicates.
    pub tag_ids: Vec<i64>,
    pub thumbnail: Option<UploadedFile>,
}

impl PostForm {
    /// Check every field rule, collecting all violations.
    pub fn validated(mut self, rule: ThumbnailRule) -> Result<ValidatedPost, FieldErrors> {
        self.title = self.title.trim().to_string();
        self.content = self.content.trim().to_string();

        let mut errors = match self.validate() {
            Ok(()) => FieldErrors::default(),
            Err(report) => FieldErrors::from(report),
        };
        check_thumbnail(self.thumbnail.as_ref(), rule, &mut errors);

        match self.category {
            Some(category_id) if errors.is_empty() => {
                let mut tag_ids = self.tags;
                tag_ids.sort_unstable();
                tag_ids.dedup();

                Ok(ValidatedPost {
                    title: self.title,
                    content: self.content,
                    category_id,
                    tag_ids,
                    thumbnail: self.thumbnail,
                })
            }
            _ => Err(errors),
        }
    }
}

fn check_thumbnail(file: Option<&UploadedFile>, rule: ThumbnailRule, errors: &mut FieldErrors) {
    let Some(file) = file else {
        if rule == ThumbnailRule::Required {
            errors.add("thumbnail", "The thumbnail field is required.");
        }
        return;
    };

    if file.size() == 0 {
        errors.add("thumbnail", "The thumbnail failed to upload.");
        return;
    }

    if !file.mime_type().is_some_and(|mime| mime.starts_with("image/")) {
        errors.add("thumbnail", "The thumbnail must be an image.");
    }

    // Both the client name and the sniffed contents must be an allowed type.
    let extension_ok = file
        .extension()
        .is_some_and(|ext| THUMBNAIL_EXTENSIONS.contains(&ext.as_str()));
    let content_ok = file
        .content_extensions()
        .iter()
        .any(|ext| THUMBNAIL_EXTENSIONS.contains(ext));
    if !extension_ok || !content_ok {
        errors.add(
            "thumbnail",
            format!(
                "The thumbnail must be a file of type: {}.",
                THUMBNAIL_EXTENSIONS.join(", ")
            ),
        );
    }

    if file.size() > MAX_THUMBNAIL_KB * 1024 {
        errors.add(
            "thumbnail",
            format!("The thumbnail must not be greater than {MAX_THUMBNAIL_KB} kilobytes."),
        );
    }
}

/// Per-field validation messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn into_map(self) -> BTreeMap<String, Vec<String>> {
        self.0
    }
}

impl From<validator::ValidationErrors> for FieldErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut errors = FieldErrors::default();
        for (field, failures) in report.field_errors() {
            for failure in failures {
                let message = failure
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| format!("The {field} field is invalid."));
                errors.add(field.to_string(), message);
            }
        }
        errors
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn jpeg(size: usize) -> UploadedFile {
        let mut data = vec![0xFF, 0xD8, 0xFF, 0xE0];
        data.resize(size, 0);
        UploadedFile::new("valid.jpg", Bytes::from(data))
    }

    fn form(title: &str) -> PostForm {
        PostForm {
            title: title.to_string(),
            content: "body".to_string(),
            category: Some(1),
            tags: vec![2, 3],
            thumbnail: Some(jpeg(128)),
        }
    }

    #[test]
    fn test_title_length_boundaries() {
        let rejects = |title: &str| {
            form(title)
                .validated(ThumbnailRule::Required)
                .unwrap_err()
                .has("title")
        };

        assert!(rejects(&"a".repeat(9)));
        assert!(form(&"a".repeat(10)).validated(ThumbnailRule::Required).is_ok());
        assert!(form(&"a".repeat(25)).validated(ThumbnailRule::Required).is_ok());
        assert!(rejects(&"a".repeat(26)));
    }

    #[test]
    fn test_title_counts_characters_not_bytes() {
        assert!(form("ééééééééééé").validated(ThumbnailRule::Required).is_ok());
    }

    #[test]
    fn test_tags_required() {
        let mut empty = form("Hello World Example");
        empty.tags.clear();
        let errors = empty.validated(ThumbnailRule::Required).unwrap_err();
        assert_eq!(errors.get("tags"), Some(&["The tags field is required.".to_string()][..]));

        let mut single = form("Hello World Example");
        single.tags = vec![4];
        assert!(single.validated(ThumbnailRule::Required).is_ok());
    }

    #[test]
    fn test_tags_are_deduplicated() {
        let mut input = form("Hello World Example");
        input.tags = vec![3, 2, 3, 2];
        let post = input.validated(ThumbnailRule::Required).unwrap();
        assert_eq!(post.tag_ids, vec![2, 3]);
    }

    #[test]
    fn test_every_violation_is_reported() {
        let errors = PostForm::default()
            .validated(ThumbnailRule::Required)
            .unwrap_err();

        for field in ["title", "content", "category", "tags", "thumbnail"] {
            assert!(errors.has(field), "missing error for {field}");
        }
    }

    #[test]
    fn test_blank_content_rejected() {
        let mut input = form("Hello World Example");
        input.content = "   ".to_string();
        assert!(input.validated(ThumbnailRule::Required).unwrap_err().has("content"));
    }

    #[test]
    fn test_thumbnail_optional_when_editing() {
        let mut input = form("Hello World Example");
        input.thumbnail = None;
        assert!(input.clone().validated(ThumbnailRule::Optional).is_ok());
        assert!(input.validated(ThumbnailRule::Required).unwrap_err().has("thumbnail"));
    }

    #[test]
    fn test_thumbnail_type_and_size() {
        let mut gif = form("Hello World Example");
        gif.thumbnail = Some(UploadedFile::new(
            "anim.gif",
            Bytes::from_static(b"GIF89a\x01\x00\x01\x00"),
        ));
        let errors = gif.validated(ThumbnailRule::Required).unwrap_err();
        assert_eq!(
            errors.get("thumbnail"),
            Some(&["The thumbnail must be a file of type: jpg, png, jpeg.".to_string()][..])
        );

        let mut text = form("Hello World Example");
        text.thumbnail = Some(UploadedFile::new("notes.txt", Bytes::from_static(b"hi")));
        let errors = text.validated(ThumbnailRule::Required).unwrap_err();
        assert_eq!(errors.get("thumbnail").map(<[String]>::len), Some(2));

        let mut exact = form("Hello World Example");
        exact.thumbnail = Some(jpeg(MAX_THUMBNAIL_KB * 1024));
        assert!(exact.validated(ThumbnailRule::Required).is_ok());

        let mut large = form("Hello World Example");
        large.thumbnail = Some(jpeg(MAX_THUMBNAIL_KB * 1024 + 1));
        assert!(large.validated(ThumbnailRule::Required).unwrap_err().has("thumbnail"));
    }

    #[test]
    fn test_thumbnail_contents_must_be_an_image() {
        let mut disguised = form("Hello World Example");
        disguised.thumbnail = Some(UploadedFile::new(
            "evil.jpg",
            Bytes::from_static(b"<?php system($_GET['c']); ?> not an image"),
        ));
        let errors = disguised.validated(ThumbnailRule::Required).unwrap_err();
        assert_eq!(
            errors.get("thumbnail"),
            Some(
                &[
                    "The thumbnail must be an image.".to_string(),
                    "The thumbnail must be a file of type: jpg, png, jpeg.".to_string(),
                ][..]
            )
        );

        let mut renamed_gif = form("Hello World Example");
        renamed_gif.thumbnail = Some(UploadedFile::new(
            "cover.png",
            Bytes::from_static(b"GIF89a\x01\x00\x01\x00"),
        ));
        assert!(renamed_gif.validated(ThumbnailRule::Required).unwrap_err().has("thumbnail"));

        let mut png = form("Hello World Example");
        png.thumbnail = Some(UploadedFile::new(
            "cover.png",
            Bytes::from_static(b"\x89PNG\r\n\x1a\n\x00\x00\x00\x0dIHDR"),
        ));
        assert!(png.validated(ThumbnailRule::Required).is_ok());
    }
}
