use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sea_orm::DbErr;
use thiserror::Error;

use crate::pages::ErrorPage;

/// Application-level error type.
///
/// Handlers decide status and messaging; the data layer below raises these
/// and performs no recovery of its own.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("not found")]
    NotFound,

    #[error("forbidden")]
    Forbidden,

    #[error("bad input: {0}")]
    BadInput(String),

    #[error("username is already taken")]
    UsernameTaken,

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    fn status_and_message(self) -> (StatusCode, String) {
        match self {
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "The page you are looking for does not exist".into(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission for this action".into(),
            ),
            AppError::BadInput(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::UsernameTaken => (
                StatusCode::CONFLICT,
                "Username is already taken".into(),
            ),
            AppError::Database(err) => {
                tracing::error!("Database error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred".into(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        let page = ErrorPage {
            code: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(err) => {
                tracing::error!("Failed to render error page: {}", err);
                (status, "An unexpected error occurred").into_response()
            }
        }
    }
}
