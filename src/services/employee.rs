use std::sync::Arc;

use tracing::info;

use crate::db::{PayrollStore, StoreError};
use crate::dtos::request::EmployeeRequest;
use crate::models::{Employee, EmployeeProfile, Gender, NewEmployee, Principal};
use crate::shared::error::AppError;

fn trimmed(value: Option<String>) -> String {
    value.unwrap_or_default().trim().to_string()
}

impl TryFrom<EmployeeRequest> for EmployeeProfile {
    type Error = AppError;

    fn try_from(payload: EmployeeRequest) -> Result<Self, Self::Error> {
        let gender = Gender::try_from(payload.gender.as_deref().unwrap_or_default()).map_err(
            |_| AppError::BadRequest("Gender must be one of: female, male, other.".to_string()),
        )?;
        Ok(EmployeeProfile {
            first_name: trimmed(payload.first_name),
            last_name: trimmed(payload.last_name),
            gender,
            address: payload
                .address
                .map(|address| address.trim().to_string())
                .filter(|address| !address.is_empty()),
            position: trimmed(payload.position),
            department_code: trimmed(payload.department_code),
        })
    }
}

/// 员工引用的部门只做存在性检查 (外键)，不校验归属
fn map_department_reference(err: StoreError) -> AppError {
    match err {
        err if err.is_missing_owner() => err.into(),
        StoreError::ForeignKeyViolation(_) => {
            AppError::BadRequest("Department does not exist.".to_string())
        }
        other => other.into(),
    }
}

fn not_found() -> AppError {
    AppError::NotFound("Employee not found or you don't have permission to change it.".to_string())
}

#[derive(Clone)]
pub struct EmployeeService {
    store: Arc<dyn PayrollStore>,
}

impl EmployeeService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        EmployeeService { store }
    }

    pub async fn create(
        &self,
        principal: Principal,
        payload: EmployeeRequest,
    ) -> Result<Employee, AppError> {
        let new_employee = NewEmployee {
            profile: EmployeeProfile::try_from(payload)?,
            owner: principal.into(),
        };
        let employee = self
            .store
            .insert_employee(new_employee)
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => AppError::Conflict(
                    "This employee already exists in the system.".to_string(),
                ),
                other => map_department_reference(other),
            })?;
        info!(
            user_id = principal.user_id(),
            employee_number = employee.employee_number,
            "employee created"
        );
        Ok(employee)
    }

    pub async fn list(&self, principal: Principal) -> Result<Vec<Employee>, AppError> {
        Ok(self.store.list_employees(principal).await?)
    }

    pub async fn update(
        &self,
        principal: Principal,
        employee_number: i32,
        payload: EmployeeRequest,
    ) -> Result<(), AppError> {
        let profile = EmployeeProfile::try_from(payload)?;
        let updated = self
            .store
            .update_employee(principal, employee_number, &profile)
            .await
            .map_err(map_department_reference)?;
        if updated == 0 {
            return Err(not_found());
        }
        info!(user_id = principal.user_id(), employee_number, "employee updated");
        Ok(())
    }

    /// 删除员工，其工资记录由存储层级联删除
    pub async fn delete(&self, principal: Principal, employee_number: i32) -> Result<(), AppError> {
        let deleted = self.store.delete_employee(principal, employee_number).await?;
        if deleted == 0 {
            return Err(not_found());
        }
        info!(user_id = principal.user_id(), employee_number, "employee deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::models::{Department, Owner};
    use rust_decimal::Decimal;

    fn request(department_code: &str, gender: &str) -> EmployeeRequest {
        EmployeeRequest {
            first_name: Some(" Jane ".into()),
            last_name: Some("Doe".into()),
            gender: Some(gender.into()),
            address: Some("   ".into()),
            position: Some("Engineer".into()),
            department_code: Some(department_code.into()),
        }
    }

    async fn service_with_department(code: &str, owner: Owner) -> EmployeeService {
        let store = Arc::new(MemoryStore::with_accounts(2).await);
        store
            .insert_department(&Department {
                department_code: code.into(),
                department_name: "Information Technology".into(),
                gross_salary: Decimal::new(5000, 0),
                owner,
            })
            .await
            .unwrap();
        EmployeeService::new(store)
    }

    #[tokio::test]
    async fn create_normalises_fields() {
        let service = service_with_department("IT", Owner::OwnedBy(1)).await;
        let employee = service.create(Principal(1), request("IT", "Female")).await.unwrap();
        assert_eq!(employee.first_name, "Jane");
        assert_eq!(employee.gender, Gender::Female);
        assert_eq!(employee.address, None);
        assert_eq!(employee.owner, Owner::OwnedBy(1));
    }

    #[tokio::test]
    async fn unknown_gender_is_rejected() {
        let service = service_with_department("IT", Owner::OwnedBy(1)).await;
        let err = service.create(Principal(1), request("IT", "robot")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn missing_department_is_a_bad_request() {
        let service = service_with_department("IT", Owner::OwnedBy(1)).await;
        let err = service.create(Principal(1), request("HR", "male")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[tokio::test]
    async fn department_of_another_principal_can_be_referenced() {
        let service = service_with_department("IT", Owner::OwnedBy(1)).await;
        let employee = service.create(Principal(2), request("IT", "other")).await.unwrap();
        assert_eq!(employee.owner, Owner::OwnedBy(2));
    }

    #[tokio::test]
    async fn update_and_delete_respect_ownership() {
        let service = service_with_department("IT", Owner::OwnedBy(1)).await;
        let employee = service.create(Principal(1), request("IT", "female")).await.unwrap();
        let number = employee.employee_number;

        let err = service
            .update(Principal(2), number, request("IT", "male"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
        let err = service.delete(Principal(2), number).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));

        service.update(Principal(1), number, request("IT", "male")).await.unwrap();
        let listed = service.list(Principal(1)).await.unwrap();
        assert_eq!(listed[0].gender, Gender::Male);

        service.delete(Principal(1), number).await.unwrap();
        assert!(service.list(Principal(1)).await.unwrap().is_empty());
    }
}
