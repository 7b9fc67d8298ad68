//! Domain entities and rules.

mod blog;
mod filter;
mod photo;

pub use blog::{Blog, BlogPatch, DEFAULT_PHOTO, NewBlog, UPLOADS_PREFIX, validate_photo};
pub use filter::{BlogFilter, Page};
pub use photo::{ImageExtension, MAX_PHOTO_BYTES, PHOTO_FIELD, PhotoName, UploadPolicy};
