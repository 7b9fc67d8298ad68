//! Photo upload handlers.
//!
//! The photo is validated (extension, media type, size) while it streams in
//! and only reaches disk once every check has passed.

use actix_multipart::{Multipart, MultipartError};
use actix_web::{HttpResponse, web};
use futures::TryStreamExt;

use blog_core::domain::{BlogPatch, ImageExtension, PHOTO_FIELD, PhotoName, UploadPolicy};
use blog_core::error::UploadError;
use blog_shared::BlogResponse;
use blog_shared::dto::UploadedPhotoDto;

use super::blog_dto;
use crate::middleware::error::{AppError, AppResult};
use crate::observability::RequestId;
use crate::state::AppState;

/// A photo that passed validation but has not been written yet.
struct PendingPhoto {
    extension: ImageExtension,
    bytes: Vec<u8>,
}

fn malformed(err: MultipartError) -> AppError {
    UploadError::Malformed(err.to_string()).into()
}

/// Find the `photo` field and buffer it, enforcing the policy along the way.
async fn read_photo(mut payload: Multipart, policy: &UploadPolicy) -> AppResult<PendingPhoto> {
    while let Some(mut field) = payload.try_next().await.map_err(malformed)? {
        if field.name() != Some(PHOTO_FIELD) {
            while field.try_next().await.map_err(malformed)?.is_some() {}
            continue;
        }

        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_owned);
        let media_type = field.content_type().map(|m| m.essence_str().to_owned());
        let extension = policy.check_file(filename.as_deref(), media_type.as_deref())?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(malformed)? {
            policy.check_size(bytes.len() + chunk.len())?;
            bytes.extend_from_slice(&chunk);
        }

        return Ok(PendingPhoto { extension, bytes });
    }

    Err(UploadError::MissingFile(PHOTO_FIELD).into())
}

async fn store_photo(state: &AppState, payload: Multipart) -> AppResult<PhotoName> {
    let photo = read_photo(payload, &state.upload_policy).await?;
    let name = PhotoName::generate(photo.extension);

    state.photos.save(name.as_str(), &photo.bytes).await?;
    tracing::info!(file = %name, size = photo.bytes.len(), "Photo stored");

    Ok(name)
}

/// Remove a stored photo whose blog update did not go through.
async fn discard_orphan(state: &AppState, name: &PhotoName) -> AppResult<()> {
    state.photos.remove(name.as_str()).await.map_err(|e| {
        tracing::error!(file = %name, error = %e, "Failed to remove orphaned photo");
        AppError::Internal(format!("orphaned photo {name} could not be removed"))
    })
}

/// POST /blogs/upload
#[tracing::instrument(skip_all, fields(request_id = %request_id.as_str()))]
pub async fn upload_photo(
    state: web::Data<AppState>,
    request_id: RequestId,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let name = store_photo(&state, payload).await?;

    Ok(HttpResponse::Ok().json(BlogResponse::ok(UploadedPhotoDto {
        photo: name.public_path(),
    })))
}

/// POST /blogs/upload/{id}
#[tracing::instrument(skip_all, fields(request_id = %request_id.as_str(), blog_id = %id))]
pub async fn upload_blog_photo(
    state: web::Data<AppState>,
    request_id: RequestId,
    id: web::Path<String>,
    payload: Multipart,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    let name = store_photo(&state, payload).await?;

    match state
        .blogs
        .update_by_id(&id, BlogPatch::photo(name.public_path()))
        .await
    {
        Ok(Some(blog)) => {
            tracing::info!(file = %name, "Photo attached to blog");
            Ok(HttpResponse::Ok().json(BlogResponse::ok(blog_dto(blog))))
        }
        Ok(None) => {
            discard_orphan(&state, &name).await?;
            Err(AppError::NotFound)
        }
        Err(err) => {
            if let Err(cleanup) = state.photos.remove(name.as_str()).await {
                tracing::warn!(file = %name, error = %cleanup, "Orphaned photo left on disk");
            }
            Err(err.into())
        }
    }
}
