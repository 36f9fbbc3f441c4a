use std::sync::Arc;

use tracing::{info, warn};

use crate::db::{PayrollStore, StoreError};
use crate::dtos::request::{LoginRequest, SignupRequest};
use crate::models::{NewUser, Principal, User};
use crate::shared::error::AppError;
use crate::shared::jwt::TokenService;
use crate::vos::userdata::{LoginData, UserData};

const INVALID_CREDENTIALS: &str = "Invalid username or password. Please check and try again.";

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn PayrollStore>,
    tokens: TokenService,
}

impl AuthService {
    pub fn new(store: Arc<dyn PayrollStore>, tokens: TokenService) -> Self {
        AuthService { store, tokens }
    }

    pub async fn signup(&self, payload: SignupRequest) -> Result<UserData, AppError> {
        // 长度校验作用于去掉首尾空白后的用户名
        let username = payload.username.trim().to_string();
        if username.chars().count() < 3 {
            return Err(AppError::BadRequest(
                "Username must be at least 3 characters".to_string(),
            ));
        }

        let password = payload.password;
        // argon2 很耗 CPU，放到阻塞线程池
        let password_hash = tokio::task::spawn_blocking(move || User::hash_password(&password))
            .await
            .map_err(|e| AppError::InternalServerError(format!("hash task failed: {}", e)))?
            .map_err(|e| AppError::InternalServerError(format!("hash password failed: {}", e)))?;

        let new_user = NewUser::new(
            username,
            payload.email.trim().to_string(),
            password_hash,
            payload.full_name,
        );
        let user = self.store.insert_user(new_user).await.map_err(|e| match e {
            StoreError::UniqueViolation(_) => AppError::Conflict(
                "This username or email is already registered. Please use a different one or try logging in."
                    .to_string(),
            ),
            other => other.into(),
        })?;

        info!(user_id = user.user_id, username = %user.username, "account created");
        Ok(UserData::from(&user))
    }

    pub async fn login(&self, payload: LoginRequest) -> Result<LoginData, AppError> {
        // 验证用户名
        let username = match payload.username {
            Some(name) => {
                let trimmed = name.trim();
                if trimmed.is_empty() {
                    return Err(AppError::BadRequest("Username cannot be empty".into()));
                }
                trimmed.to_string()
            }
            None => return Err(AppError::BadRequest("Username is required".into())),
        };

        // 验证密码
        let password = match payload.password {
            Some(pwd) if !pwd.is_empty() => pwd,
            Some(_) => return Err(AppError::BadRequest("Password cannot be empty".into())),
            None => return Err(AppError::BadRequest("Password is required".into())),
        };

        let Some(user) = self.store.find_user_by_username(&username).await? else {
            warn!(%username, "login rejected: unknown user");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let candidate = user.clone();
        let valid = tokio::task::spawn_blocking(move || candidate.verify_password(&password))
            .await
            .map_err(|e| AppError::InternalServerError(format!("verify task failed: {}", e)))?
            .map_err(|e| AppError::InternalServerError(format!("stored hash unreadable: {}", e)))?;
        if !valid {
            warn!(%username, "login rejected: wrong password");
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = self
            .tokens
            .generate_token(&user)
            .map_err(|e| AppError::InternalServerError(e.to_string()))?;
        info!(user_id = user.user_id, "login succeeded");
        Ok(LoginData {
            token,
            user: UserData::from(&user),
        })
    }

    pub async fn get_user_data(&self, principal: Principal) -> Result<UserData, AppError> {
        self.store
            .find_user(principal.user_id())
            .await?
            .map(|user| UserData::from(&user))
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))
    }

    /// 删除账户，级联删除其拥有的全部数据
    pub async fn delete_account(&self, principal: Principal) -> Result<(), AppError> {
        let deleted = self
            .store
            .delete_user(principal.user_id())
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation(_) => AppError::Conflict(
                    "Your departments are still used by other accounts' employees.".to_string(),
                ),
                other => other.into(),
            })?;
        if deleted == 0 {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        info!(user_id = principal.user_id(), "account deleted");
        Ok(())
    }
}
