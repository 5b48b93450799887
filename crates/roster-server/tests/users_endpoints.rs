use axum::http::{Method, StatusCode};
use serde_json::json;

mod support;

use roster_db::repo::UserRepo;
use support::TestApp;

async fn add_user(app: &TestApp, username: &str, email: &str) -> i64 {
    let (status, body) = app
        .send_json(
            Method::POST,
            "/users",
            json!({ "username": username, "email": email }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "create {email}: {body}");
    UserRepo::new(&app.pool)
        .get_by_email(email)
        .await
        .expect("get by email")
        .expect("created user")
        .id
}

#[tokio::test]
async fn ping_returns_pong() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/users/ping").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "message": "pong!" }));
}

#[tokio::test]
async fn create_user_returns_created_message() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/users",
            json!({ "username": "Iron Man", "email": "ironman@avengers.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "Success");
    assert_eq!(body["message"], "ironman@avengers.com was added");
}

#[tokio::test]
async fn created_user_is_retrievable_and_listed() {
    let app = TestApp::new().await;

    let id = add_user(&app, "Iron Man", "ironman@avengers.com").await;

    let (status, body) = app.get_json(&format!("/user/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(
        body["data"],
        json!({ "id": id, "username": "Iron Man", "email": "ironman@avengers.com" })
    );

    let (status, body) = app.get_json("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    let users = body["data"].as_array().expect("data array");
    assert_eq!(users.len(), 1);
    assert_eq!(users[0]["email"], "ironman@avengers.com");
}

#[tokio::test]
async fn duplicate_email_is_rejected_and_store_unchanged() {
    let app = TestApp::new().await;

    add_user(&app, "Iron Man", "ironman@avengers.com").await;
    let (status, body) = app
        .send_json(
            Method::POST,
            "/users",
            json!({ "username": "Tony Stark", "email": "ironman@avengers.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(
        body["message"],
        "Sorry. ironman@avengers.com already exists"
    );

    let count = UserRepo::new(&app.pool)
        .count_by_email("ironman@avengers.com")
        .await
        .expect("count");
    assert_eq!(count, 1);
    let stored = UserRepo::new(&app.pool)
        .get_by_email("ironman@avengers.com")
        .await
        .expect("get")
        .expect("user");
    assert_eq!(stored.username, "Iron Man");
}

#[tokio::test]
async fn empty_object_is_invalid_json() {
    let app = TestApp::new().await;

    let (status, body) = app.send_json(Method::POST, "/users", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "status": "fail", "message": "Invalid json" }));
}

#[tokio::test]
async fn missing_username_is_invalid_json() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(
            Method::POST,
            "/users",
            json!({ "email": "ironman@avengers.com" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], "fail");
    assert_eq!(body["message"], "Invalid json");

    let users = UserRepo::new(&app.pool).list_all().await.expect("list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn missing_email_or_empty_fields_are_invalid_json() {
    let app = TestApp::new().await;

    for payload in [
        json!({ "username": "Iron Man" }),
        json!({ "username": "", "email": "ironman@avengers.com" }),
        json!({ "username": "Iron Man", "email": "" }),
        json!({ "username": null, "email": "ironman@avengers.com" }),
    ] {
        let (status, body) = app.send_json(Method::POST, "/users", payload).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid json");
    }
}

#[tokio::test]
async fn unparsable_or_missing_body_is_invalid_json() {
    let app = TestApp::new().await;

    let cases = [
        (Some("application/json"), "{not json"),
        (Some("application/json"), ""),
        (Some("application/json"), "[]"),
        (
            Some("application/json"),
            r#"["Iron Man", "ironman@avengers.com"]"#,
        ),
        (Some("application/json"), r#""ironman@avengers.com""#),
        (Some("application/json"), r#"{"username": 5, "email": "a@b.c"}"#),
        (Some("text/plain"), r#"{"username": "a", "email": "a@b.c"}"#),
        (None, r#"{"username": "a", "email": "a@b.c"}"#),
    ];
    for (content_type, body) in cases {
        let (status, response) = app
            .send_raw(Method::POST, "/users", content_type, body)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(
            response,
            json!({ "status": "fail", "message": "Invalid json" })
        );
    }
    let users = UserRepo::new(&app.pool).list_all().await.expect("list");
    assert!(users.is_empty());
}

#[tokio::test]
async fn unknown_or_unparsable_id_is_not_found() {
    let app = TestApp::new().await;

    for uri in ["/user/abc", "/user/999999", "/user/1.5", "/user/99999999999999999999999"] {
        let (status, body) = app.get_json(uri).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "uri {uri}");
        assert_eq!(
            body,
            json!({ "status": "fail", "message": "User does not exists" })
        );
    }
}

#[tokio::test]
async fn list_returns_users_in_insertion_order() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "success", "data": [] }));

    let first = add_user(&app, "Dr. Strange", "drstrange@avenger.com").await;
    let second = add_user(&app, "Black Widow", "widow@avengers.com").await;

    let (status, body) = app.get_json("/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!([
            { "id": first, "username": "Dr. Strange", "email": "drstrange@avenger.com" },
            { "id": second, "username": "Black Widow", "email": "widow@avengers.com" }
        ])
    );
}

#[tokio::test]
async fn health_reports_store_status() {
    let app = TestApp::new().await;

    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    app.pool.close().await;
    let (status, body) = app.get_json("/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "db_error");
}
