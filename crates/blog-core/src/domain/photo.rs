use std::fmt;
use std::path::Path;

use uuid::Uuid;

use crate::domain::blog::UPLOADS_PREFIX;
use crate::error::UploadError;

/// Multipart field that carries the photo.
pub const PHOTO_FIELD: &str = "photo";

/// Default upper bound for a single photo, in bytes.
pub const MAX_PHOTO_BYTES: usize = 2_000_000;

const ALLOWED_MEDIA_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/jpg"];

/// Image extensions accepted for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageExtension {
    Png,
    Jpeg,
    Jpg,
}

impl ImageExtension {
    /// Extract the extension of a client file name, case-insensitively.
    pub fn from_filename(filename: &str) -> Result<Self, UploadError> {
        let ext = Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "png" => Ok(Self::Png),
            "jpeg" => Ok(Self::Jpeg),
            "jpg" => Ok(Self::Jpg),
            _ => Err(UploadError::UnsupportedExtension(ext)),
        }
    }

    fn from_stored(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Png),
            "jpeg" => Some(Self::Jpeg),
            "jpg" => Some(Self::Jpg),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Jpg => "jpg",
        }
    }
}

impl fmt::Display for ImageExtension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type and size rules applied to every uploaded photo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadPolicy {
    max_bytes: usize,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self::new(MAX_PHOTO_BYTES)
    }
}

impl UploadPolicy {
    pub fn new(max_bytes: usize) -> Self {
        Self { max_bytes }
    }

    /// Check the file name first, then the declared media type.
    pub fn check_file(
        &self,
        filename: Option<&str>,
        media_type: Option<&str>,
    ) -> Result<ImageExtension, UploadError> {
        let extension = ImageExtension::from_filename(filename.unwrap_or(""))?;

        let media_type = media_type.unwrap_or("").to_ascii_lowercase();
        if !ALLOWED_MEDIA_TYPES.contains(&media_type.as_str()) {
            return Err(UploadError::UnsupportedMediaType(media_type));
        }

        Ok(extension)
    }

    /// Called with the running total while the file streams in.
    pub fn check_size(&self, received: usize) -> Result<(), UploadError> {
        if received > self.max_bytes {
            return Err(UploadError::TooLarge {
                limit: self.max_bytes,
            });
        }
        Ok(())
    }
}

/// Server-generated file name for a stored photo: `blog_<32 hex>.<ext>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhotoName(String);

impl PhotoName {
    pub fn generate(extension: ImageExtension) -> Self {
        Self(format!("blog_{}.{}", Uuid::new_v4().simple(), extension))
    }

    /// Accept only names `generate` could have produced.
    pub fn parse(name: &str) -> Option<Self> {
        let (stem, ext) = name.strip_prefix("blog_")?.split_once('.')?;
        let hex = stem.len() == 32
            && stem
                .bytes()
                .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b));
        (hex && ImageExtension::from_stored(ext).is_some()).then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path under which the static file server exposes this photo.
    pub fn public_path(&self) -> String {
        format!("{UPLOADS_PREFIX}{}", self.0)
    }
}

impl fmt::Display for PhotoName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
