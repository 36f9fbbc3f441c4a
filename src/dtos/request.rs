use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::models::salary::is_valid_month;

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some("must not be blank".into());
        return Err(error);
    }
    Ok(())
}

fn month_format(value: &str) -> Result<(), ValidationError> {
    if !is_valid_month(value) {
        let mut error = ValidationError::new("month");
        error.message = Some("Month must use the YYYY-MM format".into());
        return Err(error);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(length(min = 3, max = 100, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,

    #[validate(length(max = 200, message = "Full name is too long"))]
    pub full_name: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(required(message = "Username is required"))]
    pub username: Option<String>,
    #[validate(required(message = "Password is required"))]
    pub password: Option<String>,
}
/*
required 验证器专门用于 Option<T> 类型
length 验证器用于 String 类型
金额字段保留原始 JSON 值，由 shared::money 统一解析
*/

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateDepartmentRequest {
    #[validate(
        required(message = "Department code is required"),
        length(max = 10, message = "Department code must be at most 10 characters"),
        custom = "not_blank"
    )]
    pub department_code: Option<String>,

    #[validate(
        required(message = "Department name is required"),
        length(max = 100, message = "Department name must be at most 100 characters"),
        custom = "not_blank"
    )]
    pub department_name: Option<String>,

    pub gross_salary: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDepartmentRequest {
    #[validate(
        required(message = "Department name is required"),
        length(max = 100, message = "Department name must be at most 100 characters"),
        custom = "not_blank"
    )]
    pub department_name: Option<String>,

    pub gross_salary: Option<serde_json::Value>,
}

/// 新建和更新员工共用
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeRequest {
    #[validate(
        required(message = "First name is required"),
        length(max = 200, message = "First name is too long"),
        custom = "not_blank"
    )]
    pub first_name: Option<String>,

    #[validate(
        required(message = "Last name is required"),
        length(max = 200, message = "Last name is too long"),
        custom = "not_blank"
    )]
    pub last_name: Option<String>,

    #[validate(required(message = "Gender is required"))]
    pub gender: Option<String>,

    #[validate(length(max = 100, message = "Address is too long"))]
    pub address: Option<String>,

    #[validate(
        required(message = "Position is required"),
        length(max = 100, message = "Position is too long"),
        custom = "not_blank"
    )]
    pub position: Option<String>,

    #[validate(
        required(message = "Department is required"),
        length(max = 10, message = "Department code must be at most 10 characters"),
        custom = "not_blank"
    )]
    pub department_code: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalaryRequest {
    #[validate(required(message = "Employee is required"))]
    pub employee_number: Option<i32>,

    #[validate(required(message = "Month is required"), custom = "month_format")]
    pub month: Option<String>,

    pub deductions: Option<serde_json::Value>,
}

/// `GET /salary`、`GET /report` 的查询参数，空字符串视为未设置
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryQuery {
    pub employee_number: Option<String>,
    pub month: Option<String>,
    pub department_code: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn signup_rules() {
        let ok: SignupRequest = serde_json::from_value(json!({
            "username": "jane",
            "email": "jane@example.com",
            "password": "long enough",
        }))
        .unwrap();
        assert!(ok.validate().is_ok());

        let bad: SignupRequest = serde_json::from_value(json!({
            "username": "ja",
            "email": "not-an-email",
            "password": "short",
            "fullName": "Jane Doe",
        }))
        .unwrap();
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn department_requires_code_and_name() {
        let request: CreateDepartmentRequest =
            serde_json::from_value(json!({"departmentName": "  ", "grossSalary": 10})).unwrap();
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("department_code"));
        assert!(fields.contains_key("department_name"));
    }

    #[test]
    fn department_code_length_is_limited() {
        let request: CreateDepartmentRequest = serde_json::from_value(json!({
            "departmentCode": "WAY-TOO-LONG",
            "departmentName": "Ops",
        }))
        .unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn salary_month_must_be_year_and_month() {
        let request: CreateSalaryRequest =
            serde_json::from_value(json!({"employeeNumber": 1, "month": "06"})).unwrap();
        assert!(request.validate().unwrap_err().field_errors().contains_key("month"));

        let request: CreateSalaryRequest = serde_json::from_value(
            json!({"employeeNumber": 1, "month": "2024-06", "deductions": "500"}),
        )
        .unwrap();
        assert!(request.validate().is_ok());
    }

    #[test]
    fn employee_optional_address() {
        let request: EmployeeRequest = serde_json::from_value(json!({
            "firstName": "Jane",
            "lastName": "Doe",
            "gender": "female",
            "position": "Engineer",
            "departmentCode": "IT",
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.address, None);
    }
}
