use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

use crate::ml::MlError;
use crate::views;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Model error: {0}")]
    Model(#[from] MlError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!(detail = %e, "Database error"),
            AppError::Model(e) => tracing::error!(detail = %e, "Prediction failed"),
        }

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Html(views::error_page("Terjadi kesalahan pada server. Silakan coba lagi.")),
        )
            .into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
