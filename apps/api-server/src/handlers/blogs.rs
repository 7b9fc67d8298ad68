//! Blog CRUD handlers.

use actix_web::{HttpResponse, web};

use blog_core::domain::{BlogFilter, BlogPatch, NewBlog, Page};
use blog_shared::dto::{CreateBlogRequest, ListBlogsQuery, UpdateBlogRequest};
use blog_shared::{AckResponse, BlogListResponse, BlogResponse};

use super::blog_dto;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// GET /blogs?filter=<json>&skip=<n>&limit=<n>
pub async fn list_blogs(
    state: web::Data<AppState>,
    query: web::Query<ListBlogsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();

    let filter = match query.filter.as_deref().map(str::trim) {
        Some(raw) if !raw.is_empty() => BlogFilter::parse(raw)?,
        _ => BlogFilter::default(),
    };
    let page = Page::new(query.skip, query.limit);

    let blogs = state.blogs.find(&filter, page).await?;
    tracing::debug!(count = blogs.len(), "Listed blogs");

    Ok(HttpResponse::Ok().json(BlogListResponse::ok(
        blogs.into_iter().map(blog_dto).collect(),
    )))
}

/// POST /blogs
pub async fn create_blog(
    state: web::Data<AppState>,
    body: web::Json<CreateBlogRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();
    let new_blog = NewBlog::new(req.title, req.content, req.photo)?;

    let blog = state.blogs.insert(new_blog).await?;
    tracing::info!(blog_id = %blog.id, "Blog created");

    Ok(HttpResponse::Ok().json(BlogResponse::ok(blog_dto(blog))))
}

/// PUT /blogs/{id}
pub async fn update_blog(
    state: web::Data<AppState>,
    id: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();
    let req = body.into_inner();
    let patch = BlogPatch::new(req.title, req.content, req.photo)?;

    let blog = state
        .blogs
        .update_by_id(&id, patch)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(blog_id = %blog.id, "Blog updated");

    Ok(HttpResponse::Ok().json(BlogResponse::ok(blog_dto(blog))))
}

/// DELETE /blogs/{id}
pub async fn delete_blog(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = id.into_inner();

    state
        .blogs
        .delete_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)?;
    tracing::info!(blog_id = %id, "Blog deleted");

    Ok(HttpResponse::Ok().json(AckResponse::ok()))
}
