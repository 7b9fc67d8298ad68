//! HTTP handlers and route configuration.

mod blogs;
mod health;
mod upload;

#[cfg(test)]
mod tests;

use actix_web::{HttpRequest, error, web};
use blog_core::domain::Blog;
use blog_shared::dto::BlogDto;

use crate::middleware::error::AppError;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(query_error_handler))
        .route("/health", web::get().to(health::health_check))
        // Upload routes go first: `/blogs/upload` would otherwise match `/blogs/{id}`
        .service(web::resource("/blogs/upload").route(web::post().to(upload::upload_photo)))
        .service(
            web::resource("/blogs/upload/{id}").route(web::post().to(upload::upload_blog_photo)),
        )
        .service(
            web::resource("/blogs")
                .route(web::get().to(blogs::list_blogs))
                .route(web::post().to(blogs::create_blog)),
        )
        .service(
            web::resource("/blogs/{id}")
                .route(web::put().to(blogs::update_blog))
                .route(web::delete().to(blogs::delete_blog)),
        );
}

fn json_error_handler(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

fn query_error_handler(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::validation(err.to_string()).into()
}

fn blog_dto(blog: Blog) -> BlogDto {
    BlogDto {
        id: blog.id,
        title: blog.title,
        content: blog.content,
        photo: blog.photo,
    }
}
