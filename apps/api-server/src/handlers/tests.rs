use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::http::{StatusCode, header};
use actix_web::{App, test, web};
use async_trait::async_trait;
use serde_json::{Value, json};

use blog_core::domain::{Blog, BlogFilter, BlogPatch, NewBlog, Page, UploadPolicy};
use blog_core::error::{RepoError, StorageError};
use blog_core::ports::{BlogRepository, PhotoStore};
use blog_infra::{InMemoryBlogRepository, LocalPhotoStore};

use super::configure_routes;
use crate::state::AppState;

const BOUNDARY: &str = "----blog-test-boundary";
const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-image-data";

macro_rules! init_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .wrap(actix_web::middleware::from_fn(crate::observability::request_id))
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("blog-api-{}", uuid::Uuid::new_v4().simple()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn state_with(photos: Arc<dyn PhotoStore>, policy: UploadPolicy) -> AppState {
    AppState::from_parts(Arc::new(InMemoryBlogRepository::new()), photos, policy)
}

fn local_state(dir: &Path) -> AppState {
    state_with(Arc::new(LocalPhotoStore::new(dir)), UploadPolicy::default())
}

fn files_in(dir: &Path) -> Vec<String> {
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect()
}

fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri(uri)
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

fn create_request(body: Value) -> test::TestRequest {
    test::TestRequest::post().uri("/blogs").set_json(body)
}

/// Photo store that writes normally but can never delete.
struct UndeletableStore(LocalPhotoStore);

#[async_trait]
impl PhotoStore for UndeletableStore {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<(), StorageError> {
        self.0.save(name, bytes).await
    }

    async fn remove(&self, name: &str) -> Result<(), StorageError> {
        Err(StorageError::Io {
            name: name.to_string(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }
}

/// Repository whose backend is unreachable.
struct UnreachableRepository;

#[async_trait]
impl BlogRepository for UnreachableRepository {
    async fn find(&self, _: &BlogFilter, _: Page) -> Result<Vec<Blog>, RepoError> {
        Err(RepoError::Connection("connection refused (10.0.0.7:27017)".into()))
    }

    async fn insert(&self, _: NewBlog) -> Result<Blog, RepoError> {
        Err(RepoError::Connection("connection refused (10.0.0.7:27017)".into()))
    }

    async fn update_by_id(&self, _: &str, _: BlogPatch) -> Result<Option<Blog>, RepoError> {
        Err(RepoError::Connection("connection refused (10.0.0.7:27017)".into()))
    }

    async fn delete_by_id(&self, _: &str) -> Result<Option<Blog>, RepoError> {
        Err(RepoError::Connection("connection refused (10.0.0.7:27017)".into()))
    }
}

#[actix_web::test]
async fn create_update_delete_list_round_trip() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    let resp = test::call_service(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["blog"]["title"], json!("A"));
    assert_eq!(body["blog"]["content"], json!("B"));
    assert_eq!(body["blog"]["photo"], json!("None"));
    let id = body["blog"]["id"].as_str().unwrap().to_string();
    assert!(!id.is_empty());

    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .set_json(json!({"title": "A2"}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(
        body,
        json!({"success": true, "blog": {"id": id, "title": "A2", "content": "B", "photo": "None"}})
    );

    let req = test::TestRequest::delete()
        .uri(&format!("/blogs/{id}"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true}));

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({"success": true, "blogs": []}));
}

#[actix_web::test]
async fn create_requires_title_and_content() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    for payload in [
        json!({"title": "A"}),
        json!({"content": "B"}),
        json!({"title": "", "content": "B"}),
    ] {
        let resp = test::call_service(&app, create_request(payload).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["success"], json!(false));
        assert_eq!(body["error"]["code"], json!("validation_failed"));
    }

    let req = test::TestRequest::post()
        .uri("/blogs")
        .insert_header((header::CONTENT_TYPE, "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["blogs"], json!([]));
}

#[actix_web::test]
async fn update_and_delete_of_unknown_id_are_not_found() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));
    test::call_service(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;

    let req = test::TestRequest::put()
        .uri("/blogs/does-not-exist")
        .set_json(json!({"title": "A2"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false}));

    let req = test::TestRequest::delete()
        .uri("/blogs/does-not-exist")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get().uri("/blogs").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["blogs"].as_array().unwrap().len(), 1);
    assert_eq!(body["blogs"][0]["title"], json!("A"));
}

#[actix_web::test]
async fn empty_update_returns_blog_unchanged() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));
    let created: Value = test::call_and_read_body_json(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;
    let id = created["blog"]["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, created);

    let req = test::TestRequest::put()
        .uri("/blogs/does-not-exist")
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false}));
}

#[actix_web::test]
async fn client_supplied_photo_must_be_a_generated_upload() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    let resp = test::call_service(
        &app,
        create_request(json!({"title": "A", "content": "B", "photo": "/uploads/evil.html"}))
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("validation_failed"));

    let created: Value = test::call_and_read_body_json(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;
    let id = created["blog"]["id"].as_str().unwrap();

    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .set_json(json!({"photo": "/uploads/not-generated.exe"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let generated = format!("/uploads/blog_{}.jpg", uuid::Uuid::new_v4().simple());
    let req = test::TestRequest::put()
        .uri(&format!("/blogs/{id}"))
        .set_json(json!({"photo": &generated}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["blog"]["photo"], json!(generated));

    let listed: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/blogs").to_request())
            .await;
    assert_eq!(listed["blogs"].as_array().unwrap().len(), 1);
    assert_eq!(listed["blogs"][0]["photo"], json!(generated));
}

#[actix_web::test]
async fn list_passes_filter_skip_and_limit_through() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));
    for title in ["a", "b", "a"] {
        test::call_service(
            &app,
            create_request(json!({"title": title, "content": "x"})).to_request(),
        )
        .await;
    }

    let req = test::TestRequest::get().uri("/blogs?skip=0&limit=2").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["blogs"].as_array().unwrap().len(), 2);

    let filtered = "/blogs?filter=%7B%22title%22%3A%22a%22%7D";
    let first: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(filtered).to_request())
            .await;
    let second: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri(filtered).to_request())
            .await;
    assert_eq!(first["blogs"].as_array().unwrap().len(), 2);
    assert_eq!(first, second);

    let req = test::TestRequest::get()
        .uri("/blogs?filter=%7B%22title%22%3A%22a%22%7D&skip=1")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["blogs"], json!([first["blogs"][1].clone()]));
}

#[actix_web::test]
async fn list_rejects_operator_filters_and_bad_numbers() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    // {"title":{"$ne":null}}
    let req = test::TestRequest::get()
        .uri("/blogs?filter=%7B%22title%22%3A%7B%22%24ne%22%3Anull%7D%7D")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // {"views":18446744073709551615}
    let req = test::TestRequest::get()
        .uri("/blogs?filter=%7B%22views%22%3A18446744073709551615%7D")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/blogs?limit=lots").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("validation_failed"));
}

#[actix_web::test]
async fn png_upload_attaches_generated_photo_path() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));
    let created: Value = test::call_and_read_body_json(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;
    let id = created["blog"]["id"].as_str().unwrap();

    let body = multipart_body("photo", "Sunset.PNG", "image/png", PNG_BYTES);
    let resp = test::call_service(
        &app,
        upload_request(&format!("/blogs/upload/{id}"), body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["blog"]["title"], json!("A"));
    assert_eq!(body["blog"]["content"], json!("B"));

    let photo = body["blog"]["photo"].as_str().unwrap();
    let stem = photo
        .strip_prefix("/uploads/blog_")
        .and_then(|rest| rest.strip_suffix(".png"))
        .unwrap();
    assert_eq!(stem.len(), 32);
    assert!(stem.chars().all(|c| c.is_ascii_hexdigit()));

    let file_name = photo.trim_start_matches("/uploads/");
    assert_eq!(std::fs::read(dir.join(file_name)).unwrap(), PNG_BYTES);
}

#[actix_web::test]
async fn gif_upload_is_rejected_before_anything_is_written() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));
    let created: Value = test::call_and_read_body_json(
        &app,
        create_request(json!({"title": "A", "content": "B"})).to_request(),
    )
    .await;
    let id = created["blog"]["id"].as_str().unwrap();

    let body = multipart_body("photo", "anim.gif", "image/gif", b"GIF89a");
    let resp = test::call_service(
        &app,
        upload_request(&format!("/blogs/upload/{id}"), body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("unsupported_extension"));

    // png name with a foreign media type
    let body = multipart_body("photo", "page.png", "text/html", b"<html>");
    let resp = test::call_service(
        &app,
        upload_request(&format!("/blogs/upload/{id}"), body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert!(files_in(&dir).is_empty());
    let listed: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/blogs").to_request())
            .await;
    assert_eq!(listed["blogs"][0]["photo"], json!("None"));
}

#[actix_web::test]
async fn oversized_and_missing_files_are_rejected() {
    let dir = scratch_dir();
    let state = state_with(Arc::new(LocalPhotoStore::new(&dir)), UploadPolicy::new(8));
    let app = init_app!(state);

    let body = multipart_body("photo", "big.jpg", "image/jpeg", &[0u8; 64]);
    let resp = test::call_service(&app, upload_request("/blogs/upload", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("file_too_large"));

    let body = multipart_body("avatar", "a.jpg", "image/jpeg", b"tiny");
    let resp = test::call_service(&app, upload_request("/blogs/upload", body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"]["code"], json!("missing_file"));

    assert!(files_in(&dir).is_empty());
}

#[actix_web::test]
async fn upload_to_unknown_blog_removes_the_orphan() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    let body = multipart_body("photo", "cat.jpeg", "image/jpeg", b"jpeg-data");
    let resp = test::call_service(
        &app,
        upload_request("/blogs/upload/missing", body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false}));

    assert!(files_in(&dir).is_empty());
}

#[actix_web::test]
async fn failed_orphan_cleanup_is_escalated() {
    let dir = scratch_dir();
    let state = state_with(
        Arc::new(UndeletableStore(LocalPhotoStore::new(&dir))),
        UploadPolicy::default(),
    );
    let app = init_app!(state);

    let body = multipart_body("photo", "cat.png", "image/png", PNG_BYTES);
    let resp = test::call_service(
        &app,
        upload_request("/blogs/upload/missing", body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"success": false, "error": {"code": "internal_error"}}));
}

#[actix_web::test]
async fn detached_upload_returns_public_path_and_request_id() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    let req = upload_request(
        "/blogs/upload",
        multipart_body("photo", "shot.jpg", "image/jpeg", b"jpg-data"),
    )
    .insert_header(("x-request-id", "req-42"))
    .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "req-42");

    let body: Value = test::read_body_json(resp).await;
    let photo = body["blog"]["photo"].as_str().unwrap();
    assert!(photo.starts_with("/uploads/blog_") && photo.ends_with(".jpg"));
    assert_eq!(files_in(&dir), vec![photo.trim_start_matches("/uploads/").to_string()]);
}

#[actix_web::test]
async fn repository_failures_do_not_leak_details() {
    let dir = scratch_dir();
    let state = AppState::from_parts(
        Arc::new(UnreachableRepository),
        Arc::new(LocalPhotoStore::new(&dir)),
        UploadPolicy::default(),
    );
    let app = init_app!(state);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/blogs").to_request()).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(resp.headers().contains_key("x-request-id"));
    let body = test::read_body(resp).await;
    assert!(!String::from_utf8_lossy(&body).contains("10.0.0.7"));

    // the photo is cleaned up when the update itself fails
    let body = multipart_body("photo", "cat.png", "image/png", PNG_BYTES);
    let resp = test::call_service(
        &app,
        upload_request("/blogs/upload/some-id", body).to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(files_in(&dir).is_empty());
}

#[actix_web::test]
async fn health_reports_ok() {
    let dir = scratch_dir();
    let app = init_app!(local_state(&dir));

    let body: Value =
        test::call_and_read_body_json(&app, test::TestRequest::get().uri("/health").to_request())
            .await;
    assert_eq!(body["status"], json!("ok"));
}
