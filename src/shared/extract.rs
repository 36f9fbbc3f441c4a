use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Request},
};
use serde::de::DeserializeOwned;
use validator::Validate;

use super::error::AppError;

/// 反序列化并执行 `validator` 校验的 JSON 请求体
///
/// 请求体格式错误也按 400 处理，而不是 axum 默认的 415/422。
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// 路径参数，解析失败时走统一的错误响应
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct Path<T>(pub T);

/// 查询参数，解析失败时走统一的错误响应
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct Query<T>(pub T);
