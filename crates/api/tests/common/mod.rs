#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use dishbook_api::config::ServerConfig;
use dishbook_api::images::LocalImageStore;
use dishbook_api::repository::MemoryDishRepository;
use dishbook_api::router::build_app_router;
use dishbook_api::state::AppState;

pub const BASE_URL: &str = "http://localhost:8000";
const BOUNDARY: &str = "dishbook-test-boundary";

/// Build a test `ServerConfig` with safe defaults, storing images in `dir`.
pub fn test_config(dir: &TempDir) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        image_dir: dir.path().to_path_buf(),
        public_base_url: BASE_URL.to_string(),
        store: None,
    }
}

/// In-memory backends plus a temporary image directory. Each call to
/// [`TestContext::app`] builds a fresh router over the same state, so one
/// test can send several requests.
pub struct TestContext {
    pub state: AppState,
    pub config: ServerConfig,
    pub dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(&dir);
        let state = AppState {
            config: Arc::new(config.clone()),
            dishes: Arc::new(MemoryDishRepository::new()),
            images: Arc::new(LocalImageStore::new(dir.path(), BASE_URL)),
        };
        Self { state, config, dir }
    }

    /// The full application router with all middleware layers.
    pub fn app(&self) -> Router {
        build_app_router(self.state.clone(), &self.config)
    }
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, Body::empty(), None).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, Body::empty(), None).await
}

pub async fn post_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    send(app, Method::POST, uri, Body::from(form.finish()), Some(form_content_type())).await
}

pub async fn put_multipart(app: Router, uri: &str, form: MultipartForm) -> Response<Body> {
    send(app, Method::PUT, uri, Body::from(form.finish()), Some(form_content_type())).await
}

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    body: Body,
    content_type: Option<String>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header("content-type", content_type);
    }
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

// ---------------------------------------------------------------------------
// Multipart bodies
// ---------------------------------------------------------------------------

fn form_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}

/// Minimal `multipart/form-data` encoder.
#[derive(Default)]
pub struct MultipartForm {
    body: Vec<u8>,
}

impl MultipartForm {
    /// A form carrying `dish_name` and `ingredients`.
    pub fn dish(name: &str, ingredients: &str) -> Self {
        Self::default()
            .text("dish_name", name)
            .text("ingredients", ingredients)
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

    pub fn file(mut self, name: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn finish(&self) -> Vec<u8> {
        let mut body = self.body.clone();
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }
}

/// A solid-colour PNG of the given size.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(width, height, image::Rgb([200, 80, 40])))
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}
