use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Serialize;

/// 成功响应的统一结构 `{code: 0, message, data}`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub code: u16,
    pub message: String,
    pub data: Option<T>,
    #[serde(skip)]
    pub status: StatusCode,
}

impl<T> ApiResponse<T> {
    pub fn success(message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            code: 0,
            message: message.into(),
            data: None,
            status: StatusCode::OK,
        }
    }

    pub fn success_data(data: T) -> ApiResponse<T> {
        Self::with_data("success", data)
    }

    pub fn with_data(message: impl Into<String>, data: T) -> ApiResponse<T> {
        ApiResponse {
            code: 0,
            message: message.into(),
            data: Some(data),
            status: StatusCode::OK,
        }
    }

    /// 新建资源，返回 201
    pub fn created(message: impl Into<String>, data: T) -> ApiResponse<T> {
        ApiResponse {
            status: StatusCode::CREATED,
            ..Self::with_data(message, data)
        }
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> axum::response::Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}
