use axum::{
    Json,
    extract::rejection::{PathRejection, QueryRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::error;
use validator::ValidationErrors;

use crate::db::StoreError;

const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred. Please try again later.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// 没有被业务层单独处理的存储错误
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::UniqueViolation(_) => {
                AppError::Conflict("This record already exists.".to_string())
            }
            err if err.is_missing_owner() => AppError::Unauthorized(
                "Your account no longer exists. Please login again.".to_string(),
            ),
            StoreError::ForeignKeyViolation(_) => {
                AppError::BadRequest("A referenced record does not exist.".to_string())
            }
            StoreError::Backend(detail) => AppError::InternalServerError(detail),
        }
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let message = match self {
            Self::Validation(err) => format_validation_errors(&err),
            Self::InternalServerError(detail) => {
                // 细节只写日志，不返回给调用方
                error!(error = %detail, "unexpected failure");
                UNEXPECTED_MESSAGE.to_string()
            }
            Self::BadRequest(msg)
            | Self::Unauthorized(msg)
            | Self::NotFound(msg)
            | Self::Conflict(msg) => msg,
        };

        let body = Json(serde_json::json!({
            "code": status.as_u16(),
            "message": message,
            "data": null,
        }));
        (status, body).into_response()
    }
}

// 将验证错误转换为字符串
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));
    fields
        .iter()
        .map(|(field, errors)| {
            format!(
                "{}: {}",
                field,
                errors
                    .iter()
                    .map(|e| e.message.as_deref().unwrap_or("Invalid value").to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
        .collect::<Vec<_>>()
        .join("; ")
}
