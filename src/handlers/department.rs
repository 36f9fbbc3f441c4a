use axum::{Extension, extract::State};

use crate::AppState;
use crate::dtos::request::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::models::{Department, Principal};
use crate::services::DepartmentService;
use crate::shared::error::AppError;
use crate::shared::extract::{Path, ValidatedJson};
use crate::shared::response::ApiResponse;

#[axum::debug_handler(state = AppState)]
pub async fn create_department(
    Extension(principal): Extension<Principal>,
    State(service): State<DepartmentService>,
    ValidatedJson(payload): ValidatedJson<CreateDepartmentRequest>,
) -> Result<ApiResponse<Department>, AppError> {
    let department = service.create(principal, payload).await?;

    Ok(ApiResponse::created("Department created successfully.", department))
}

pub async fn list_departments(
    Extension(principal): Extension<Principal>,
    State(service): State<DepartmentService>,
) -> Result<ApiResponse<Vec<Department>>, AppError> {
    let departments = service.list(principal).await?;

    Ok(ApiResponse::with_data(
        "Departments list retrieved successfully.",
        departments,
    ))
}

pub async fn update_department(
    Extension(principal): Extension<Principal>,
    State(service): State<DepartmentService>,
    Path(department_code): Path<String>,
    ValidatedJson(payload): ValidatedJson<UpdateDepartmentRequest>,
) -> Result<ApiResponse<()>, AppError> {
    service.update(principal, &department_code, payload).await?;

    Ok(ApiResponse::success("Department updated successfully."))
}

pub async fn delete_department(
    Extension(principal): Extension<Principal>,
    State(service): State<DepartmentService>,
    Path(department_code): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(principal, &department_code).await?;

    Ok(ApiResponse::success("Department deleted successfully."))
}
