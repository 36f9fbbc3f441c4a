use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ownership::{Owned, Owner};

/// 部门实体，`gross_salary` 是该部门员工的基础工资
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub department_code: String,
    pub department_name: String,
    pub gross_salary: Decimal,
    #[serde(rename = "ownerId")]
    #[sqlx(rename = "owner_id", try_from = "Option<i32>")]
    pub owner: Owner,
}

/// 部门可修改的字段
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentChange {
    pub department_name: String,
    pub gross_salary: Decimal,
}

impl Department {
    pub fn apply(&mut self, change: &DepartmentChange) {
        self.department_name = change.department_name.clone();
        self.gross_salary = change.gross_salary;
    }
}

impl Owned for Department {
    fn owner(&self) -> Owner {
        self.owner
    }
}
