use axum::{Extension, extract::State};

use crate::AppState;
use crate::dtos::request::{CreateSalaryRequest, SalaryQuery};
use crate::models::{Principal, Salary, SalaryRecord};
use crate::services::{PayrollService, ReportFilter, ReportService};
use crate::shared::error::AppError;
use crate::shared::extract::{Path, Query, ValidatedJson};
use crate::shared::response::ApiResponse;
use crate::vos::report::SalaryReport;

#[axum::debug_handler(state = AppState)]
pub async fn create_salary(
    Extension(principal): Extension<Principal>,
    State(service): State<PayrollService>,
    ValidatedJson(payload): ValidatedJson<CreateSalaryRequest>,
) -> Result<ApiResponse<Salary>, AppError> {
    let salary = service.create(principal, payload).await?;

    Ok(ApiResponse::created("Salary record created successfully.", salary))
}

#[axum::debug_handler(state = AppState)]
pub async fn list_salaries(
    Extension(principal): Extension<Principal>,
    State(service): State<ReportService>,
    Query(query): Query<SalaryQuery>,
) -> Result<ApiResponse<Vec<SalaryRecord>>, AppError> {
    let filter = ReportFilter::try_from(query)?;
    let records = service.list_salaries(principal, &filter).await?;

    Ok(ApiResponse::with_data(
        "Salary records retrieved successfully.",
        records,
    ))
}

/// `GET /salary/{id}`，这里的 id 是员工编号
pub async fn list_salaries_for_employee(
    Extension(principal): Extension<Principal>,
    State(service): State<ReportService>,
    Path(employee_number): Path<i32>,
) -> Result<ApiResponse<Vec<SalaryRecord>>, AppError> {
    let records = service
        .list_salaries(principal, &ReportFilter::for_employee(employee_number))
        .await?;

    let message = if records.is_empty() {
        "No salary records found for this employee."
    } else {
        "Salary records retrieved successfully."
    };
    Ok(ApiResponse::with_data(message, records))
}

/// `DELETE /salary/{id}`，这里的 id 是工资记录编号
pub async fn delete_salary(
    Extension(principal): Extension<Principal>,
    State(service): State<PayrollService>,
    Path(salary_id): Path<i32>,
) -> Result<ApiResponse<()>, AppError> {
    service.delete(principal, salary_id).await?;

    Ok(ApiResponse::success("Salary record deleted successfully."))
}

pub async fn salary_report(
    Extension(principal): Extension<Principal>,
    State(service): State<ReportService>,
    Query(query): Query<SalaryQuery>,
) -> Result<ApiResponse<SalaryReport>, AppError> {
    let filter = ReportFilter::try_from(query)?;
    let report = service.report(principal, &filter).await?;

    Ok(ApiResponse::with_data("Salary report generated successfully.", report))
}
