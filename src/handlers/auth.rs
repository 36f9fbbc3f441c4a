use axum::{Extension, extract::State};

use crate::AppState;
use crate::dtos::request::{LoginRequest, SignupRequest};
use crate::models::Principal;
use crate::services::AuthService;
use crate::shared::error::AppError;
use crate::shared::extract::ValidatedJson;
use crate::shared::response::ApiResponse;
use crate::vos::userdata::{LoginData, UserData};

#[axum::debug_handler(state = AppState)]
pub async fn signup(
    State(service): State<AuthService>,
    ValidatedJson(payload): ValidatedJson<SignupRequest>,
) -> Result<ApiResponse<UserData>, AppError> {
    let user = service.signup(payload).await?;

    Ok(ApiResponse::created(
        "Account created successfully. You can now login.",
        user,
    ))
}

#[axum::debug_handler(state = AppState)]
pub async fn login(
    State(service): State<AuthService>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> Result<ApiResponse<LoginData>, AppError> {
    let data = service.login(payload).await?;

    Ok(ApiResponse::with_data("Login successful. Welcome back!", data))
}

#[axum::debug_handler(state = AppState)]
pub async fn get_user_data(
    Extension(principal): Extension<Principal>,
    State(service): State<AuthService>,
) -> Result<ApiResponse<UserData>, AppError> {
    let user_data = service.get_user_data(principal).await?;

    Ok(ApiResponse::success_data(user_data))
}

pub async fn delete_account(
    Extension(principal): Extension<Principal>,
    State(service): State<AuthService>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete_account(principal).await?;

    Ok(ApiResponse::success("Account deleted successfully."))
}
