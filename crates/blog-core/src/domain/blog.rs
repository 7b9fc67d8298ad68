use serde::{Deserialize, Serialize};

use crate::domain::photo::PhotoName;
use crate::error::DomainError;

/// Value stored in `photo` until an image is attached.
pub const DEFAULT_PHOTO: &str = "None";

/// Public URL prefix under which uploaded photos are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Blog entity - a single post as stored by the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blog {
    pub id: String,
    pub title: String,
    pub content: String,
    pub photo: String,
}

impl Blog {
    /// Apply every field present in `patch`, leaving the rest untouched.
    pub fn apply(&mut self, patch: &BlogPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        if let Some(photo) = &patch.photo {
            self.photo.clone_from(photo);
        }
    }
}

/// A validated blog that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBlog {
    pub title: String,
    pub content: String,
    pub photo: String,
}

impl NewBlog {
    /// Validate client input. `title` and `content` are required and must not be blank.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        photo: Option<String>,
    ) -> Result<Self, DomainError> {
        let title = require_text("title", title)?;
        let content = require_text("content", content)?;
        let photo = match photo {
            Some(photo) => {
                validate_photo(&photo)?;
                photo
            }
            None => DEFAULT_PHOTO.to_string(),
        };

        Ok(Self {
            title,
            content,
            photo,
        })
    }

    /// Attach the identifier assigned by the store.
    pub fn with_id(self, id: String) -> Blog {
        Blog {
            id,
            title: self.title,
            content: self.content,
            photo: self.photo,
        }
    }
}

/// Partial update. `None` means "leave as is".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlogPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub photo: Option<String>,
}

impl BlogPatch {
    /// Validate a client-supplied partial update against the stored invariants.
    pub fn new(
        title: Option<String>,
        content: Option<String>,
        photo: Option<String>,
    ) -> Result<Self, DomainError> {
        let title = title.map(|t| require_text("title", Some(t))).transpose()?;
        let content = content
            .map(|c| require_text("content", Some(c)))
            .transpose()?;
        if let Some(photo) = &photo {
            validate_photo(photo)?;
        }

        Ok(Self {
            title,
            content,
            photo,
        })
    }

    /// Patch that only sets the photo path produced by the upload handler.
    pub fn photo(path: impl Into<String>) -> Self {
        Self {
            photo: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.photo.is_none()
    }
}

fn require_text(field: &'static str, value: Option<String>) -> Result<String, DomainError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        Some(_) => Err(DomainError::Validation(format!("`{field}` must not be empty"))),
        None => Err(DomainError::Validation(format!("`{field}` is required"))),
    }
}

/// A photo is either the sentinel or a generated name under `/uploads/`.
pub fn validate_photo(photo: &str) -> Result<(), DomainError> {
    if photo == DEFAULT_PHOTO {
        return Ok(());
    }

    let valid = photo
        .strip_prefix(UPLOADS_PREFIX)
        .and_then(PhotoName::parse)
        .is_some();

    if valid {
        Ok(())
    } else {
        Err(DomainError::Validation(format!(
            "`photo` must be \"{DEFAULT_PHOTO}\" or an uploaded photo path"
        )))
    }
}
