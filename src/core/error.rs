//! 核心错误处理模块
//!
//! 所有处理器都返回 `Result<_, AppError>`，错误到状态码的映射只在这里发生。

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{error, warn};

/// 核心错误类型
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error("malformed request body")]
    MalformedBody,

    #[error("request body too large")]
    PayloadTooLarge,

    #[error("user not found")]
    NotFound,

    #[error("duplicate entry: {0}")]
    Duplicate(String),

    #[error("storage error: {0}")]
    Storage(sqlx::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Duplicate(db.message().to_string())
            }
            other => AppError::Storage(other),
        }
    }
}

/// 开发模式下由中间件追加到 500 响应里的内部错误信息
#[derive(Debug, Clone)]
pub struct ErrorDetail(pub String);

#[derive(Serialize)]
pub struct ValidationErrorBody {
    pub errors: Vec<String>,
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
}

pub const SERVER_ERROR: &str = "Something went wrong!";

impl ErrorBody {
    fn new(error: &'static str) -> Self {
        Self {
            error,
            message: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                warn!(?errors, "Rejected invalid user payload");
                (StatusCode::BAD_REQUEST, Json(ValidationErrorBody { errors })).into_response()
            }
            AppError::MalformedBody => {
                warn!("Rejected malformed request body");
                (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorBody::new("Malformed request body")),
                )
                    .into_response()
            }
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                Json(ErrorBody::new("Request body too large")),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(MessageBody {
                    message: "User not found",
                }),
            )
                .into_response(),
            AppError::Duplicate(detail) => {
                warn!(%detail, "Duplicate entry");
                (StatusCode::BAD_REQUEST, Json(ErrorBody::new("Duplicate entry"))).into_response()
            }
            AppError::Storage(err) => server_error(err.to_string()),
            AppError::Internal(msg) => server_error(msg),
        }
    }
}

fn server_error(detail: String) -> Response {
    error!(error = %detail, "Request failed");
    let mut response = (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::new(SERVER_ERROR)),
    )
        .into_response();
    response.extensions_mut().insert(ErrorDetail(detail));
    response
}
