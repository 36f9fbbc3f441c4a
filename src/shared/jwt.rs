use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::models::{Principal, User};
use crate::shared::setting::JwtConfig;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // 用户ID
    pub username: String,
    pub email: String,
    pub exp: usize, // 过期时间
    pub iat: usize, // 签发时间
}

impl Claims {
    pub fn principal(&self) -> Option<Principal> {
        self.sub.parse().ok().map(Principal)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// 令牌签发与校验
#[derive(Clone)]
pub struct TokenService {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    lifetime: Duration,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        TokenService {
            encoding: Arc::new(EncodingKey::from_secret(&config.jwt_secret)),
            decoding: Arc::new(DecodingKey::from_secret(&config.jwt_secret)),
            lifetime: Duration::hours(config.expiration_hours),
        }
    }

    pub fn generate_token(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let expires_at = now + self.lifetime;

        let claims = Claims {
            sub: user.user_id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, TokenError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid(e.to_string()),
            })
    }
}
