//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /blogs`. Fields are optional so that missing values surface
/// as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub photo: Option<String>,
}

/// Body of `PUT /blogs/{id}`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub photo: Option<String>,
}

/// Query string of `GET /blogs`. `filter` carries a JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListBlogsQuery {
    pub filter: Option<String>,
    pub skip: Option<u64>,
    pub limit: Option<u64>,
}

/// A blog as exposed over HTTP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogDto {
    pub id: String,
    pub title: String,
    pub content: String,
    pub photo: String,
}

/// Result of a detached upload: only the public path is known.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedPhotoDto {
    pub photo: String,
}
