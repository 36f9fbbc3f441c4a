use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use tracing::debug;

use super::{
    error::AppError,
    jwt::{TokenError, TokenService},
};

/// 校验 Bearer 令牌，把解析出的 `Principal` 注入请求扩展
///
/// 三种 401：没带令牌、令牌过期、令牌无效，提示文案各不相同。
pub async fn auth_middleware(
    State(tokens): State<TokenService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    // 从请求头中获取token
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|auth_header| auth_header.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| {
            AppError::Unauthorized("Login required. Please login to continue.".to_string())
        })?;

    let claims = tokens.validate_token(token).map_err(|err| {
        debug!(error = %err, "rejected bearer token");
        match err {
            TokenError::Expired => {
                AppError::Unauthorized("Your session has expired. Please login again.".to_string())
            }
            _ => AppError::Unauthorized("Invalid session. Please login again.".to_string()),
        }
    })?;
    let principal = claims
        .principal()
        .ok_or_else(|| AppError::Unauthorized("Invalid session. Please login again.".to_string()))?;

    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}
