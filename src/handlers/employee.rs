use axum::{Extension, extract::State};

use crate::AppState;
use crate::dtos::request::EmployeeRequest;
use crate::models::{Employee, Principal};
use crate::services::EmployeeService;
use crate::shared::error::AppError;
use crate::shared::extract::{Path, ValidatedJson};
use crate::shared::response::ApiResponse;

#[axum::debug_handler(state = AppState)]
pub async fn create_employee(
    Extension(principal): Extension<Principal>,
    State(service): State<EmployeeService>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> Result<ApiResponse<Employee>, AppError> {
    let employee = service.create(principal, payload).await?;

    Ok(ApiResponse::created("Employee created successfully.", employee))
}

pub async fn list_employees(
    Extension(principal): Extension<Principal>,
    State(service): State<EmployeeService>,
) -> Result<ApiResponse<Vec<Employee>>, AppError> {
    let employees = service.list(principal).await?;

    Ok(ApiResponse::with_data(
        "Employee list retrieved successfully.",
        employees,
    ))
}

pub async fn update_employee(
    Extension(principal): Extension<Principal>,
    State(service): State<EmployeeService>,
    Path(employee_number): Path<i32>,
    ValidatedJson(payload): ValidatedJson<EmployeeRequest>,
) -> Result<ApiResponse<()>, AppError> {
    service.update(principal, employee_number, payload).await?;

    Ok(ApiResponse::success("Employee updated successfully."))
}

pub async fn delete_employee(
    Extension(principal): Extension<Principal>,
    State(service): State<EmployeeService>,
    Path(employee_number): Path<i32>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(principal, employee_number).await?;

    Ok(ApiResponse::success("Employee deleted successfully."))
}
