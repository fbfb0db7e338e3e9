#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use sea_orm::{ConnectOptions, Database};
use serde_json::{Value, json};
use tower::ServiceExt;

use reviewhub_migration::{Migrator, MigratorTrait};
use reviewhub_server::api::{AppState, create_router};
use reviewhub_server::auth::TokenService;
use reviewhub_server::media::{MediaError, VideoStorage};

/// In-memory stand-in for the external media service.
pub struct MockVideoStorage {
    fail: AtomicBool,
    uploads: Mutex<Vec<String>>,
    deletes: Mutex<Vec<String>>,
}

impl MockVideoStorage {
    pub fn new() -> Self {
        Self {
            fail: AtomicBool::new(false),
            uploads: Mutex::new(Vec::new()),
            deletes: Mutex::new(Vec::new()),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.fail.store(failing, Ordering::SeqCst);
    }

    pub fn uploaded_ids(&self) -> Vec<String> {
        self.uploads.lock().expect("uploads lock").clone()
    }

    pub fn deleted_ids(&self) -> Vec<String> {
        self.deletes.lock().expect("deletes lock").clone()
    }
}

#[async_trait]
impl VideoStorage for MockVideoStorage {
    async fn upload(
        &self,
        public_id: &str,
        _content_type: &str,
        _bytes: Vec<u8>,
    ) -> Result<String, MediaError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MediaError::Upstream("mock upload failure".to_string()));
        }

        self.uploads
            .lock()
            .expect("uploads lock")
            .push(public_id.to_string());
        Ok(format!("https://media.test/{public_id}"))
    }

    async fn delete(&self, public_id: &str) -> Result<(), MediaError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(MediaError::Upstream("mock delete failure".to_string()));
        }

        self.deletes
            .lock()
            .expect("deletes lock")
            .push(public_id.to_string());
        Ok(())
    }
}

/// Builds the full router against a fresh in-memory database.
pub async fn test_app() -> (Router, Arc<MockVideoStorage>) {
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1);

    let db = Database::connect(options)
        .await
        .expect("in-memory sqlite should connect");
    Migrator::up(&db, None)
        .await
        .expect("migrations should apply");

    let media = Arc::new(MockVideoStorage::new());
    let state = Arc::new(AppState::new(
        db,
        TokenService::new("integration-test-secret", 60),
        media.clone(),
        "walkthroughs".to_string(),
    ));

    (create_router(state), media)
}

/// Sends a request with an optional bearer token and JSON body, returning the
/// status and the parsed response body (`Value::Null` for empty bodies).
pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .expect("request should build"),
        None => builder.body(Body::empty()).expect("request should build"),
    };

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should be handled");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    (status, value)
}

pub struct MultipartField {
    pub name: &'static str,
    pub filename: Option<&'static str>,
    pub content_type: Option<&'static str>,
    pub data: Vec<u8>,
}

impl MultipartField {
    pub fn text(name: &'static str, value: &str) -> Self {
        Self {
            name,
            filename: None,
            content_type: None,
            data: value.as_bytes().to_vec(),
        }
    }

    pub fn file(
        name: &'static str,
        filename: &'static str,
        content_type: &'static str,
        data: Vec<u8>,
    ) -> Self {
        Self {
            name,
            filename: Some(filename),
            content_type: Some(content_type),
            data,
        }
    }
}

/// Sends a multipart/form-data request.
pub async fn send_multipart(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    fields: Vec<MultipartField>,
) -> (StatusCode, Value) {
    const BOUNDARY: &str = "reviewhub-test-boundary";

    let mut body = Vec::new();
    for field in &fields {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match field.filename {
            Some(filename) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                    field.name, filename
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n", field.name).as_bytes(),
            ),
        }
        if let Some(content_type) = field.content_type {
            body.extend_from_slice(format!("Content-Type: {content_type}\r\n").as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&field.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());

    let mut builder = Request::builder().method(method).uri(path).header(
        "Content-Type",
        format!("multipart/form-data; boundary={BOUNDARY}"),
    );
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = builder.body(Body::from(body)).expect("request should build");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request should be handled");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();

    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response body should be JSON")
    };

    (status, value)
}

/// Registers a user and returns a bearer token for them.
pub async fn register_and_login(app: &Router, name: &str, email: &str, role: &str) -> String {
    let (status, _) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({
            "name": name,
            "email": email,
            "password": "s3cret-pw",
            "role": role,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "registration should succeed");

    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"email": email, "password": "s3cret-pw"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login should succeed");

    body["access_token"]
        .as_str()
        .expect("login response should carry a token")
        .to_string()
}

/// Creates a submission as the given student and returns its id.
pub async fn create_submission(
    app: &Router,
    token: &str,
    title: &str,
    language: &str,
    tags: &[&str],
) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/submissions",
        Some(token),
        Some(json!({
            "title": title,
            "description": "a worked example",
            "code_content": "print('hello')\n",
            "language": language,
            "tags": tags,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "submission should be created");

    body["id"]
        .as_str()
        .expect("submission response should carry an id")
        .to_string()
}
