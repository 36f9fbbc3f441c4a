use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::db::{PayrollStore, StoreError};
use crate::dtos::request::{CreateDepartmentRequest, UpdateDepartmentRequest};
use crate::models::{Department, DepartmentChange, Principal};
use crate::shared::error::AppError;
use crate::shared::money::parse_amount;

fn gross_salary(raw: Option<&serde_json::Value>) -> Result<Decimal, AppError> {
    match parse_amount(raw) {
        Ok(Some(amount)) => Ok(amount),
        Ok(None) => Err(AppError::BadRequest(
            "Base Gross Salary is required.".to_string(),
        )),
        Err(e) => Err(AppError::BadRequest(format!("Base Gross Salary {}.", e))),
    }
}

fn not_found() -> AppError {
    AppError::NotFound(
        "Department not found or you don't have permission to change it.".to_string(),
    )
}

#[derive(Clone)]
pub struct DepartmentService {
    store: Arc<dyn PayrollStore>,
}

impl DepartmentService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        DepartmentService { store }
    }

    pub async fn create(
        &self,
        principal: Principal,
        payload: CreateDepartmentRequest,
    ) -> Result<Department, AppError> {
        let department = Department {
            department_code: payload.department_code.unwrap_or_default().trim().to_string(),
            department_name: payload.department_name.unwrap_or_default().trim().to_string(),
            gross_salary: gross_salary(payload.gross_salary.as_ref())?,
            owner: principal.into(),
        };

        self.store
            .insert_department(&department)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AppError::Conflict(
                    "A department with this code already exists. Please use a different code."
                        .to_string(),
                ),
                other => other.into(),
            })?;

        info!(
            user_id = principal.user_id(),
            department_code = %department.department_code,
            "department created"
        );
        Ok(department)
    }

    pub async fn list(&self, principal: Principal) -> Result<Vec<Department>, AppError> {
        Ok(self.store.list_departments(principal).await?)
    }

    /// 只改部门本身，已有工资记录保持快照值
    pub async fn update(
        &self,
        principal: Principal,
        department_code: &str,
        payload: UpdateDepartmentRequest,
    ) -> Result<(), AppError> {
        let change = DepartmentChange {
            department_name: payload.department_name.unwrap_or_default().trim().to_string(),
            gross_salary: gross_salary(payload.gross_salary.as_ref())?,
        };
        let updated = self
            .store
            .update_department(principal, department_code, &change)
            .await?;
        if updated == 0 {
            return Err(not_found());
        }
        info!(user_id = principal.user_id(), %department_code, "department updated");
        Ok(())
    }

    pub async fn delete(&self, principal: Principal, department_code: &str) -> Result<(), AppError> {
        let deleted = self
            .store
            .delete_department(principal, department_code)
            .await
            .map_err(|e| match e {
                StoreError::ForeignKeyViolation(_) => AppError::Conflict(
                    "This department still has employees. Move or remove them first.".to_string(),
                ),
                other => other.into(),
            })?;
        if deleted == 0 {
            return Err(not_found());
        }
        info!(user_id = principal.user_id(), %department_code, "department deleted");
        Ok(())
    }
}
