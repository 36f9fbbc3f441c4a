//! 工资计算
//!
//! 员工 -> 部门 -> 部门税前工资，两跳都按归属规则解析，任一跳不可见即 404。
//! 税前工资在创建时复制进工资记录，此后不再随部门变化。
//!
//! 三步之间没有包在同一个事务里：部门在第 2 步之后被并发修改时，
//! 记录里的是读到的那一刻的值；员工在插入前被删除时外键检查会拒绝插入。

use std::sync::Arc;

use rust_decimal::Decimal;
use tracing::info;

use crate::db::{PayrollStore, StoreError};
use crate::dtos::request::CreateSalaryRequest;
use crate::models::{NewSalary, PayFigures, Principal, Salary};
use crate::shared::error::AppError;
use crate::shared::money::parse_amount;

fn employee_not_found() -> AppError {
    AppError::NotFound(
        "Employee not found. Please check the employee number and try again.".to_string(),
    )
}

#[derive(Clone)]
pub struct PayrollService {
    store: Arc<dyn PayrollStore>,
}

impl PayrollService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        PayrollService { store }
    }

    pub async fn create(
        &self,
        principal: Principal,
        payload: CreateSalaryRequest,
    ) -> Result<Salary, AppError> {
        let (Some(employee_number), Some(month)) = (payload.employee_number, payload.month) else {
            return Err(AppError::BadRequest(
                "Please select an employee and a month to create a salary record.".to_string(),
            ));
        };
        let deductions = parse_amount(payload.deductions.as_ref())
            .map_err(|e| AppError::BadRequest(format!("Deductions {}.", e)))?;

        self.create_salary(principal, employee_number, month, deductions)
            .await
    }

    pub async fn create_salary(
        &self,
        principal: Principal,
        employee_number: i32,
        month: String,
        deductions: Option<Decimal>,
    ) -> Result<Salary, AppError> {
        let employee = self
            .store
            .find_employee(principal, employee_number)
            .await?
            .ok_or_else(employee_not_found)?;

        let department = self
            .store
            .find_department(principal, &employee.department_code)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(
                    "Department information not found. Please ensure the employee's department exists."
                        .to_string(),
                )
            })?;

        let figures = PayFigures::snapshot(department.gross_salary, deductions);
        let salary = self
            .store
            .insert_salary(NewSalary {
                employee_number,
                month,
                figures,
                owner: principal.into(),
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AppError::Conflict(
                    "A salary record for this employee and month already exists.".to_string(),
                ),
                e if e.is_missing_owner() => e.into(),
                StoreError::ForeignKeyViolation(_) => employee_not_found(),
                other => other.into(),
            })?;

        info!(
            user_id = principal.user_id(),
            salary_id = salary.salary_id,
            employee_number,
            month = %salary.month,
            "salary recorded"
        );
        Ok(salary)
    }

    pub async fn delete(&self, principal: Principal, salary_id: i32) -> Result<(), AppError> {
        let deleted = self.store.delete_salary(principal, salary_id).await?;
        if deleted == 0 {
            return Err(AppError::NotFound(
                "Salary record not found or you don't have permission to delete it.".to_string(),
            ));
        }
        info!(user_id = principal.user_id(), salary_id, "salary deleted");
        Ok(())
    }
}
