//! HTTP-level integration tests for the `/api/dishes` endpoints.
//!
//! Uses Axum's tower::ServiceExt to send requests directly to the router
//! without an actual TCP listener.

mod common;

use axum::http::StatusCode;
use common::{body_bytes, body_json, delete, get, png, post_multipart, put_multipart, MultipartForm, TestContext};

async fn create(ctx: &TestContext, form: MultipartForm) -> serde_json::Value {
    let response = post_multipart(ctx.app(), "/api/dishes", form).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

fn object_file(ctx: &TestContext, url: &str) -> std::path::PathBuf {
    let path = url
        .strip_prefix(&format!("{}/images/", common::BASE_URL))
        .expect("local image url");
    ctx.dir.path().join(path)
}

// ---------------------------------------------------------------------------
// Root and health
// ---------------------------------------------------------------------------

#[tokio::test]
async fn root_reports_running() {
    let ctx = TestContext::new();
    let response = get(ctx.app(), "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Dish Management API is running");
}

#[tokio::test]
async fn health_check_returns_ok_with_version() {
    let ctx = TestContext::new();
    let response = get(ctx.app(), "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-request-id").is_some());

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_201_with_trimmed_ingredients() {
    let ctx = TestContext::new();
    let json = create(&ctx, MultipartForm::dish("Pancakes", "Eggs, Flour , Milk")).await;

    assert_eq!(json["dish_name"], "Pancakes");
    assert_eq!(json["ingredients"], serde_json::json!(["Eggs", "Flour", "Milk"]));
    assert!(json["id"].is_string());
    assert!(json["created_at"].is_string());
    assert!(json["image_url"].is_null());
}

#[tokio::test]
async fn create_keeps_empty_ingredient_tokens() {
    let ctx = TestContext::new();
    let json = create(&ctx, MultipartForm::dish("Toast", "Bread,,Butter,")).await;
    assert_eq!(json["ingredients"], serde_json::json!(["Bread", "", "Butter", ""]));
}

#[tokio::test]
async fn create_with_image_stores_resized_jpeg() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Soup", "Water").file("image", "soup.png", "image/png", &png(2400, 600));
    let json = create(&ctx, form).await;

    let url = json["image_url"].as_str().unwrap();
    assert!(url.starts_with("http://localhost:8000/images/dishes/"));
    assert!(url.ends_with(".jpg"));

    let stored = std::fs::read(object_file(&ctx, url)).unwrap();
    let decoded = image::load_from_memory(&stored).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (1200, 300));

    // The stored object is served back by the API itself.
    let path = url.strip_prefix(common::BASE_URL).unwrap();
    let response = get(ctx.app(), path).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, stored);
}

#[tokio::test]
async fn create_with_blank_name_is_rejected() {
    let ctx = TestContext::new();
    let response = post_multipart(ctx.app(), "/api/dishes", MultipartForm::dish("  ", "Eggs")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Dish name is required");
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let list = body_json(get(ctx.app(), "/api/dishes").await).await;
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn create_without_ingredients_field_is_rejected() {
    let ctx = TestContext::new();
    let form = MultipartForm::default().text("dish_name", "Toast");
    let response = post_multipart(ctx.app(), "/api/dishes", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["detail"], "Missing required 'ingredients' field");
}

#[tokio::test]
async fn create_with_undecodable_image_is_rejected() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Soup", "Water").file("image", "soup.png", "image/png", b"not a png");
    let response = post_multipart(ctx.app(), "/api/dishes", form).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let detail = body_json(response).await["detail"].as_str().unwrap().to_string();
    assert!(detail.starts_with("Image processing failed"), "{detail}");
}

// ---------------------------------------------------------------------------
// Read and search
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_is_newest_first() {
    let ctx = TestContext::new();
    create(&ctx, MultipartForm::dish("First", "A")).await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    create(&ctx, MultipartForm::dish("Second", "B")).await;

    let json = body_json(get(ctx.app(), "/api/dishes").await).await;
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["dish_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Second", "First"]);
}

#[tokio::test]
async fn get_returns_dish_or_404() {
    let ctx = TestContext::new();
    let created = create(&ctx, MultipartForm::dish("Salad", "Lettuce")).await;
    let id = created["id"].as_str().unwrap();

    let response = get(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["dish_name"], "Salad");

    let missing = uuid::Uuid::new_v4();
    let response = get(ctx.app(), &format!("/api/dishes/{missing}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["detail"], "Dish not found");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn search_matches_ingredients_case_insensitively() {
    let ctx = TestContext::new();
    create(&ctx, MultipartForm::dish("Pancakes", "Eggs, Flour")).await;
    create(&ctx, MultipartForm::dish("Salad", "Lettuce, Tomato")).await;

    let json = body_json(get(ctx.app(), "/api/dishes/search?q=tomato").await).await;
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["dish_name"], "Salad");

    let json = body_json(get(ctx.app(), "/api/dishes/search?q=caviar").await).await;
    assert!(json.as_array().unwrap().is_empty());

    let json = body_json(get(ctx.app(), "/api/dishes/search?q=").await).await;
    assert_eq!(json.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let ctx = TestContext::new();
    let response = get(ctx.app(), "/api/dishes/search").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_without_image_keeps_current_image() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Pancakes", "Eggs, Flour, Milk").file("image", "p.png", "image/png", &png(10, 10));
    let created = create(&ctx, form).await;
    let id = created["id"].as_str().unwrap();

    let response = put_multipart(
        ctx.app(),
        &format!("/api/dishes/{id}"),
        MultipartForm::dish("Pancakes", "Eggs, Flour"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["ingredients"], serde_json::json!(["Eggs", "Flour"]));
    assert_eq!(json["image_url"], created["image_url"]);
    assert_eq!(json["created_at"], created["created_at"]);
}

#[tokio::test]
async fn update_with_image_replaces_old_object() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Stew", "Beef").file("image", "old.png", "image/png", &png(10, 10));
    let created = create(&ctx, form).await;
    let id = created["id"].as_str().unwrap();
    let old_file = object_file(&ctx, created["image_url"].as_str().unwrap());
    assert!(old_file.exists());

    let form = MultipartForm::dish("Stew", "Beef, Carrot").file("image", "new.png", "image/png", &png(20, 20));
    let json = body_json(put_multipart(ctx.app(), &format!("/api/dishes/{id}"), form).await).await;

    let new_url = json["image_url"].as_str().unwrap();
    assert!(new_url.ends_with(&format!("dishes/{id}.jpg")));
    assert!(!old_file.exists());
    assert!(object_file(&ctx, new_url).exists());
}

#[tokio::test]
async fn update_with_undecodable_image_keeps_old_photo() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Stew", "Beef").file("image", "old.png", "image/png", &png(10, 10));
    let created = create(&ctx, form).await;
    let id = created["id"].as_str().unwrap();
    let old_url = created["image_url"].as_str().unwrap();
    let old_file = object_file(&ctx, old_url);

    let form = MultipartForm::dish("Stew", "Beef, Carrot").file("image", "new.png", "image/png", b"not an image");
    let response = put_multipart(ctx.app(), &format!("/api/dishes/{id}"), form).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert!(old_file.exists());
    let json = body_json(get(ctx.app(), &format!("/api/dishes/{id}")).await).await;
    assert_eq!(json["image_url"], old_url);
    assert_eq!(json["ingredients"], serde_json::json!(["Beef"]));
}

#[tokio::test]
async fn update_missing_dish_is_404() {
    let ctx = TestContext::new();
    let id = uuid::Uuid::new_v4();
    let response = put_multipart(ctx.app(), &format!("/api/dishes/{id}"), MultipartForm::dish("X", "Y")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_record_and_image() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Curry", "Rice").file("image", "c.png", "image/png", &png(10, 10));
    let created = create(&ctx, form).await;
    let id = created["id"].as_str().unwrap();
    let file = object_file(&ctx, created["image_url"].as_str().unwrap());

    let response = delete(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Dish deleted successfully");
    assert!(!file.exists());

    let response = get(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_succeeds_when_image_cannot_be_removed() {
    let ctx = TestContext::new();
    let form = MultipartForm::dish("Curry", "Rice").file("image", "c.png", "image/png", &png(10, 10));
    let created = create(&ctx, form).await;
    let id = created["id"].as_str().unwrap();

    // A directory where the photo was makes the file removal fail.
    let file = object_file(&ctx, created["image_url"].as_str().unwrap());
    std::fs::remove_file(&file).unwrap();
    std::fs::create_dir(&file).unwrap();

    let response = delete(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(ctx.app(), &format!("/api/dishes/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
