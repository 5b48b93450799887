#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use tower::ServiceExt;
use tracing_subscriber::EnvFilter;

use roster_db::{connect_sqlite_with_max, migrate, SqlitePool};
use roster_server::app::{build_router, AppState};
use roster_server::config::ServerConfig;

pub fn init_tracing() {
    static INIT: std::sync::Once = std::sync::Once::new();
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new("roster_server=debug,roster_db=debug"))
            .with_test_writer()
            .try_init();
    });
}

/// A private in-memory store; a single connection keeps every query on the same database.
pub async fn setup_db() -> SqlitePool {
    let pool = connect_sqlite_with_max("sqlite::memory:", 1)
        .await
        .expect("connect in-memory store");
    migrate(&pool).await.expect("migrate");
    pool
}

pub struct TestApp {
    pub app: axum::Router,
    pub pool: SqlitePool,
}

impl TestApp {
    pub async fn new() -> Self {
        init_tracing();
        let pool = setup_db().await;
        let state = AppState::new(pool.clone(), ServerConfig::default());
        let app = build_router(state);
        Self { app, pool }
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = self.app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        (status, headers, bytes.to_vec())
    }

    pub async fn send_json(
        &self,
        method: Method,
        uri: &str,
        body: serde_json::Value,
    ) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).expect("encode json")))
            .expect("request");
        let (status, _, bytes) = self.send(request).await;
        (status, decode_json(&bytes))
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        content_type: Option<&str>,
        body: &'static str,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        let request = builder.body(Body::from(body)).expect("request");
        let (status, _, bytes) = self.send(request).await;
        (status, decode_json(&bytes))
    }

    pub async fn get_json(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let (status, _, bytes) = self.send(request).await;
        (status, decode_json(&bytes))
    }

    pub async fn get_html(&self, uri: &str) -> (StatusCode, String) {
        let request = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .expect("request");
        let (status, _, bytes) = self.send(request).await;
        (status, String::from_utf8(bytes).expect("utf8 body"))
    }

    pub async fn post_form(&self, uri: &str, body: &str) -> (StatusCode, axum::http::HeaderMap) {
        let request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .expect("request");
        let (status, headers, _) = self.send(request).await;
        (status, headers)
    }
}

fn decode_json(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(bytes).expect("json")
    }
}
