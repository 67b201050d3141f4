use std::sync::Arc;

use axum::{routing::get, Router};
use sqlx::SqlitePool;
use tower_http::trace::TraceLayer;

use crate::handler::{history, login, logout, predict, register, show_index, show_login, show_register};
use crate::ml::YieldModel;
use crate::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub model: Arc<YieldModel>,
    pub sessions: SessionStore,
    /// Redirect anonymous visitors of `/` and `/history` to the login page
    pub require_login: bool,
}

impl AppState {
    pub fn new(db: SqlitePool, model: Arc<YieldModel>, require_login: bool) -> Self {
        Self {
            db,
            model,
            sessions: SessionStore::new(),
            require_login,
        }
    }
}

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(show_index).post(predict))
        .route("/history", get(history))
        .route("/login", get(show_login).post(login))
        .route("/register", get(show_register).post(register))
        .route("/logout", get(logout))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}
