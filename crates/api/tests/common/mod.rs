#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use async_trait::async_trait;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use lms_api::auth::jwt::{generate_access_token, JwtConfig};
use lms_api::config::{MediaBackend, MediaConfig, ServerConfig};
use lms_api::router::build_app_router;
use lms_api::state::AppState;
use lms_core::authz::Subscription;
use lms_core::media::{ResourceType, MAX_UPLOAD_BYTES};
use lms_core::roles::Role;
use lms_db::MemoryCourseStore;
use lms_storage::{
    MediaUploader, MemoryObjectStore, ObjectSpec, ObjectStore, StorageError,
};

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";

const BOUNDARY: &str = "lms-test-boundary-7d1f3a";

/// Build a test `ServerConfig` staging uploads into `upload_dir`.
pub fn test_config(upload_dir: &std::path::Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
        media: MediaConfig {
            upload_dir: upload_dir.to_path_buf(),
            max_upload_bytes: MAX_UPLOAD_BYTES,
            folder: "lms".to_string(),
            backend: MediaBackend::Memory,
        },
    }
}

/// The full application over in-memory stores, plus handles on those
/// stores so tests can inspect state and inject failures.
pub struct TestApp {
    pub router: Router,
    pub courses: Arc<MemoryCourseStore>,
    pub objects: Arc<MemoryObjectStore>,
    pub config: ServerConfig,
    staging: TempDir,
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Number of files left in the staging directory.
    pub fn staged_file_count(&self) -> usize {
        std::fs::read_dir(self.staging.path()).unwrap().count()
    }
}

/// Build the application the same way `main.rs` does, using the given
/// config adjustments.
pub fn build_test_app_with(adjust: impl FnOnce(&mut ServerConfig)) -> TestApp {
    build_test_app_over(adjust, |objects| objects as Arc<dyn ObjectStore>)
}

/// Like [`build_test_app_with`], but the uploader talks to whatever `wrap`
/// builds around the in-memory object store.
pub fn build_test_app_over(
    adjust: impl FnOnce(&mut ServerConfig),
    wrap: impl FnOnce(Arc<MemoryObjectStore>) -> Arc<dyn ObjectStore>,
) -> TestApp {
    let staging = tempfile::tempdir().unwrap();
    let mut config = test_config(staging.path());
    adjust(&mut config);

    let courses = Arc::new(MemoryCourseStore::new());
    let objects = Arc::new(MemoryObjectStore::new());

    let state = AppState {
        courses: courses.clone(),
        media: MediaUploader::new(wrap(objects.clone())),
        config: Arc::new(config.clone()),
    };

    TestApp {
        router: build_app_router(state, &config),
        courses,
        objects,
        config,
        staging,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(|_| {})
}

/// Object store whose uploads take `delay` before reaching `inner`.
pub struct SlowObjectStore {
    pub inner: Arc<MemoryObjectStore>,
    pub delay: Duration,
}

#[async_trait]
impl ObjectStore for SlowObjectStore {
    async fn put(&self, local_path: &Path, spec: &ObjectSpec) -> Result<String, StorageError> {
        tokio::time::sleep(self.delay).await;
        self.inner.put(local_path, spec).await
    }

    async fn delete(&self, object_id: &str, resource_type: ResourceType) -> Result<(), StorageError> {
        self.inner.delete(object_id, resource_type).await
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

fn token(user_id: i64, role: Role, subscription: Option<Subscription>) -> String {
    let config = JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    };
    generate_access_token(user_id, Some("test@example.com"), role, subscription, &config).unwrap()
}

pub fn admin_token() -> String {
    token(1, Role::Admin, None)
}

/// A USER with no subscription.
pub fn user_token() -> String {
    token(2, Role::User, None)
}

/// A USER with an active subscription.
pub fn subscriber_token() -> String {
    token(
        3,
        Role::User,
        Some(Subscription {
            id: Some("sub_123".to_string()),
            status: Some("active".to_string()),
        }),
    )
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

/// Minimal `multipart/form-data` body builder.
#[derive(Default)]
pub struct Form {
    body: Vec<u8>,
}

impl Form {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

/// A complete create-course form without a thumbnail.
pub fn course_form(title: &str) -> Form {
    Form::new()
        .text("title", title)
        .text("description", "Learn it properly")
        .text("category", "Programming")
        .text("created_by", "Jane Doe")
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub fn multipart_request(method: Method, uri: &str, token: Option<&str>, form: Form) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header(
        CONTENT_TYPE,
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(form.finish())).unwrap()
}

pub fn request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    request(Method::GET, uri, None)
}

pub fn get_auth(uri: &str, token: &str) -> Request<Body> {
    request(Method::GET, uri, Some(token))
}

pub fn get_with_cookie(uri: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header(COOKIE, format!("theme=dark; token={token}"))
        .body(Body::empty())
        .unwrap()
}

pub fn delete_auth(uri: &str, token: &str) -> Request<Body> {
    request(Method::DELETE, uri, Some(token))
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Create a course through the API as admin and return its JSON.
pub async fn create_course(app: &TestApp, form: Form) -> serde_json::Value {
    let token = admin_token();
    let response = app
        .send(multipart_request(Method::POST, "/api/v1/courses", Some(&token), form))
        .await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await["data"].clone()
}

/// Append a lecture through the API as admin and return the course JSON.
pub async fn add_lecture(app: &TestApp, course_id: i64, form: Form) -> serde_json::Value {
    let token = admin_token();
    let response = app
        .send(multipart_request(
            Method::POST,
            &format!("/api/v1/courses/{course_id}"),
            Some(&token),
            form,
        ))
        .await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await["data"].clone()
}

pub fn lecture_form(title: &str) -> Form {
    Form::new()
        .text("title", title)
        .text("description", "Lecture notes")
}
