use axum::http::{header, Method, StatusCode};
use serde_json::json;

mod support;

use roster_db::repo::UserRepo;
use support::TestApp;

#[tokio::test]
async fn index_shows_placeholder_when_empty() {
    let app = TestApp::new().await;

    let (status, html) = app.get_html("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("All Users"));
    assert!(html.contains("No users!"));
}

#[tokio::test]
async fn index_lists_users_created_through_api() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send_json(
            Method::POST,
            "/users",
            json!({ "username": "Iron Man", "email": "ironman@avengers.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, html) = app.get_html("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!html.contains("No users!"));
    assert!(html.contains("Iron Man"));
    assert!(html.contains("ironman@avengers.com"));
}

#[tokio::test]
async fn form_submission_redirects_and_lists_user() {
    let app = TestApp::new().await;

    let (status, headers) = app
        .post_form("/", "username=Dr.+Strange&email=drstrange%40avenger.com")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    assert_eq!(
        headers.get(header::LOCATION).and_then(|v| v.to_str().ok()),
        Some("/")
    );

    let (status, html) = app.get_html("/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("Dr. Strange"));
    assert!(html.contains("drstrange@avenger.com"));
}

#[tokio::test]
async fn form_duplicate_leaves_store_unchanged() {
    let app = TestApp::new().await;

    let (status, _) = app
        .post_form("/", "username=Iron+Man&email=ironman%40avengers.com")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);
    let (status, _) = app
        .post_form("/", "username=Tony+Stark&email=ironman%40avengers.com")
        .await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let users = UserRepo::new(&app.pool).list_all().await.expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "Iron Man");
}

#[tokio::test]
async fn form_accepts_empty_fields() {
    let app = TestApp::new().await;

    let (status, _) = app.post_form("/", "username=&email=blank%40example.com").await;
    assert_eq!(status, StatusCode::SEE_OTHER);

    let users = UserRepo::new(&app.pool).list_all().await.expect("list");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].username, "");
}

#[tokio::test]
async fn form_missing_field_is_bad_request() {
    let app = TestApp::new().await;

    let (status, _) = app.post_form("/", "username=only").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = app.post_form("/", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let users = UserRepo::new(&app.pool).list_all().await.expect("list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn closed_store_fails_page_with_server_error() {
    let app = TestApp::new().await;
    app.pool.close().await;

    let (status, _) = app.get_html("/").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let (status, headers) = app
        .post_form("/", "username=Vision&email=vision%40avengers.com")
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(headers.get(header::LOCATION).is_none());
}
