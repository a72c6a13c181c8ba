//! Image uploads for featured images and in-post pictures.
//!
//! Files are stored under a random name with an extension taken from the
//! declared content type. Only PNG, JPEG, GIF and WebP are accepted, and the
//! leading bytes must match the declared type.

use std::future::Future;
use std::path::PathBuf;

use axum::http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::config::MediaConfig;

/// Errors from storing an upload.
#[derive(Debug, Error)]
pub enum MediaError {
    #[error("no file was uploaded")]
    Empty,

    #[error("unsupported file type {0}; upload a PNG, JPEG, GIF or WebP image")]
    UnsupportedType(String),

    #[error("file contents do not match {0}")]
    ContentMismatch(&'static str),

    #[error("file is larger than {max_bytes} bytes")]
    TooLarge { max_bytes: usize },

    #[error("could not write file: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Empty | Self::ContentMismatch(_) => StatusCode::BAD_REQUEST,
            Self::UnsupportedType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            Self::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Accepted image formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageKind {
    /// Map a `Content-Type` value, ignoring parameters and case.
    #[must_use]
    pub fn from_content_type(content_type: &str) -> Option<Self> {
        let essence = content_type.split(';').next().unwrap_or_default().trim();
        match essence.to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            "image/gif" => Some(Self::Gif),
            "image/webp" => Some(Self::Webp),
            _ => None,
        }
    }

    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
            Self::Webp => "webp",
        }
    }

    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }

    /// Whether `bytes` starts with this format's signature.
    #[must_use]
    pub fn matches(self, bytes: &[u8]) -> bool {
        match self {
            Self::Png => bytes.starts_with(b"\x89PNG\r\n\x1a\n"),
            Self::Jpeg => bytes.starts_with(&[0xFF, 0xD8, 0xFF]),
            Self::Gif => bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a"),
            Self::Webp => {
                bytes.starts_with(b"RIFF") && bytes.get(8..12).is_some_and(|tag| tag == b"WEBP")
            }
        }
    }
}

/// A stored upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StoredMedia {
    pub file_name: String,
    pub url: String,
}

/// Where uploads go.
pub trait MediaStore: Send + Sync {
    /// Check and store an upload, returning its public URL.
    ///
    /// # Errors
    ///
    /// Returns a `MediaError` for empty, oversized, unsupported or mislabelled
    /// files, and for write failures.
    fn save(
        &self,
        content_type: &str,
        bytes: &[u8],
    ) -> impl Future<Output = Result<StoredMedia, MediaError>> + Send;
}

/// Uploads written to a local directory that the public site serves at
/// `/media`.
#[derive(Debug, Clone)]
pub struct LocalMediaStore {
    dir: PathBuf,
    base_url: String,
    max_bytes: usize,
}

impl LocalMediaStore {
    #[must_use]
    pub fn new(config: &MediaConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            base_url: config.base_url.clone(),
            max_bytes: config.max_bytes,
        }
    }

    #[must_use]
    pub const fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    fn check(&self, content_type: &str, bytes: &[u8]) -> Result<ImageKind, MediaError> {
        if bytes.is_empty() {
            return Err(MediaError::Empty);
        }
        if bytes.len() > self.max_bytes {
            return Err(MediaError::TooLarge {
                max_bytes: self.max_bytes,
            });
        }
        let kind = ImageKind::from_content_type(content_type)
            .ok_or_else(|| MediaError::UnsupportedType(content_type.to_owned()))?;
        if !kind.matches(bytes) {
            return Err(MediaError::ContentMismatch(kind.mime()));
        }
        Ok(kind)
    }
}

impl MediaStore for LocalMediaStore {
    async fn save(&self, content_type: &str, bytes: &[u8]) -> Result<StoredMedia, MediaError> {
        let kind = self.check(content_type, bytes)?;
        let file_name = format!("{}.{}", Uuid::new_v4(), kind.extension());

        tokio::fs::create_dir_all(&self.dir).await?;
        tokio::fs::write(self.dir.join(&file_name), bytes).await?;

        tracing::info!(file = %file_name, size = bytes.len(), "Stored upload");
        Ok(StoredMedia {
            url: format!("{}/{file_name}", self.base_url),
            file_name,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";

    fn store(dir: &std::path::Path, max_bytes: usize) -> LocalMediaStore {
        LocalMediaStore::new(&MediaConfig {
            dir: dir.to_path_buf(),
            base_url: "https://lumen.studio/media".to_owned(),
            max_bytes,
        })
    }

    #[test]
    fn test_content_type_mapping() {
        assert_eq!(ImageKind::from_content_type("image/png"), Some(ImageKind::Png));
        assert_eq!(
            ImageKind::from_content_type("Image/JPEG; charset=binary"),
            Some(ImageKind::Jpeg)
        );
        assert_eq!(ImageKind::from_content_type("image/svg+xml"), None);
        assert_eq!(ImageKind::from_content_type("text/html"), None);
    }

    #[test]
    fn test_signatures() {
        assert!(ImageKind::Png.matches(PNG));
        assert!(!ImageKind::Png.matches(b"GIF89a"));
        assert!(ImageKind::Webp.matches(b"RIFF\0\0\0\0WEBPVP8 "));
        assert!(!ImageKind::Webp.matches(b"RIFF\0\0\0\0WAVE"));
    }

    #[tokio::test]
    async fn test_save_writes_file_under_random_name() {
        let dir = tempfile::tempdir().unwrap();
        let stored = store(dir.path(), 1024).save("image/png", PNG).await.unwrap();

        assert!(stored.file_name.ends_with(".png"));
        assert_eq!(stored.url, format!("https://lumen.studio/media/{}", stored.file_name));
        let written = std::fs::read(dir.path().join(&stored.file_name)).unwrap();
        assert_eq!(written, PNG);
    }

    #[tokio::test]
    async fn test_save_rejects_bad_uploads() {
        let dir = tempfile::tempdir().unwrap();
        let media = store(dir.path(), 16);

        assert!(matches!(media.save("image/png", b"").await, Err(MediaError::Empty)));
        assert!(matches!(
            media.save("image/svg+xml", b"<svg/>").await,
            Err(MediaError::UnsupportedType(_))
        ));
        assert!(matches!(
            media.save("image/png", b"<html></html>").await,
            Err(MediaError::ContentMismatch("image/png"))
        ));
        assert!(matches!(
            media.save("image/png", &[0u8; 17]).await,
            Err(MediaError::TooLarge { max_bytes: 16 })
        ));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }
}
