#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use crop_yield_api::app::{create_router, AppState};
use crop_yield_api::db;
use crop_yield_api::ml::{Dataset, ForestParams, YieldModel};
use sqlx::SqlitePool;
use tower::ServiceExt;

pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/harvest.csv")
}

/// Trained once per test binary
pub fn model() -> Arc<YieldModel> {
    static MODEL: OnceLock<Arc<YieldModel>> = OnceLock::new();
    MODEL
        .get_or_init(|| {
            let dataset = Dataset::from_csv(fixture_path()).unwrap();
            Arc::new(YieldModel::train(&dataset, &ForestParams::default()).unwrap())
        })
        .clone()
}

pub async fn test_state(require_login: bool) -> AppState {
    let pool = db::create_pool("sqlite::memory:", 1).await.unwrap();
    db::migrate(&pool).await.unwrap();
    AppState::new(pool, model(), require_login)
}

pub async fn test_app(require_login: bool) -> (Router, SqlitePool) {
    let state = test_state(require_login).await;
    let pool = state.db.clone();
    (create_router(state), pool)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub fn get_with_cookie(uri: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap()
}

pub fn post_form(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_form_with_cookie(uri: &str, body: &str, cookie: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header(header::COOKIE, cookie)
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// `name=value` part of the response's `Set-Cookie` header
pub fn cookie_pair(response: &Response<Body>) -> Option<String> {
    let value = response.headers().get(header::SET_COOKIE)?.to_str().ok()?;
    value.split(';').next().map(|pair| pair.trim().to_string())
}

pub fn location(response: &Response<Body>) -> Option<&str> {
    response.headers().get(header::LOCATION)?.to_str().ok()
}
