//! 存储协作者
//!
//! 服务层只依赖 [`PayrollStore`]，生产环境用 [`pg::PgStore`]，测试或本地演示用
//! [`memory::MemoryStore`]。所有带主体参数的方法都必须按归属规则过滤：
//! 只能看到/修改 `owner_id = 主体` 或 `owner_id IS NULL` 的行。

use async_trait::async_trait;

use crate::models::{
    Department, DepartmentChange, Employee, EmployeeProfile, NewEmployee, NewSalary, NewUser,
    Principal, Salary, SalaryRecord, User, UserId,
};

pub mod memory;
pub mod pg;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique constraint violated: {0}")]
    UniqueViolation(String),
    #[error("foreign key constraint violated: {0}")]
    ForeignKeyViolation(String),
    #[error("storage backend failure: {0}")]
    Backend(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// 各业务表 `owner_id -> users` 外键约束名的公共后缀
pub const OWNER_FKEY_SUFFIX: &str = "_owner_id_fkey";

impl StoreError {
    /// 写入行的 `owner_id` 指向的账户已经不存在 (账户删除后仍拿着旧令牌写入)
    pub fn is_missing_owner(&self) -> bool {
        matches!(
            self,
            StoreError::ForeignKeyViolation(constraint) if constraint.ends_with(OWNER_FKEY_SUFFIX)
        )
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                StoreError::UniqueViolation(constraint_name(db_err.as_ref()))
            }
            sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
                StoreError::ForeignKeyViolation(constraint_name(db_err.as_ref()))
            }
            _ => StoreError::Backend(err.to_string()),
        }
    }
}

fn constraint_name(db_err: &dyn sqlx::error::DatabaseError) -> String {
    db_err
        .constraint()
        .map(str::to_string)
        .unwrap_or_else(|| db_err.message().to_string())
}

#[async_trait]
pub trait PayrollStore: Send + Sync {
    // ===== users =====
    async fn insert_user(&self, user: NewUser) -> StoreResult<User>;
    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>>;
    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>>;
    /// 删除账户并级联删除它拥有的部门、员工、工资记录，返回删除的账户数
    async fn delete_user(&self, user_id: UserId) -> StoreResult<u64>;

    // ===== departments =====
    async fn insert_department(&self, department: &Department) -> StoreResult<()>;
    async fn list_departments(&self, principal: Principal) -> StoreResult<Vec<Department>>;
    async fn find_department(
        &self,
        principal: Principal,
        department_code: &str,
    ) -> StoreResult<Option<Department>>;
    async fn update_department(
        &self,
        principal: Principal,
        department_code: &str,
        change: &DepartmentChange,
    ) -> StoreResult<u64>;
    async fn delete_department(&self, principal: Principal, department_code: &str)
    -> StoreResult<u64>;

    // ===== employees =====
    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee>;
    async fn list_employees(&self, principal: Principal) -> StoreResult<Vec<Employee>>;
    async fn find_employee(
        &self,
        principal: Principal,
        employee_number: i32,
    ) -> StoreResult<Option<Employee>>;
    async fn update_employee(
        &self,
        principal: Principal,
        employee_number: i32,
        profile: &EmployeeProfile,
    ) -> StoreResult<u64>;
    /// 删除员工，同时级联删除其工资记录
    async fn delete_employee(&self, principal: Principal, employee_number: i32) -> StoreResult<u64>;

    // ===== salaries =====
    async fn insert_salary(&self, salary: NewSalary) -> StoreResult<Salary>;
    /// 可见的工资记录左连接员工，按月份倒序
    async fn list_salaries(&self, principal: Principal) -> StoreResult<Vec<SalaryRecord>>;
    async fn delete_salary(&self, principal: Principal, salary_id: i32) -> StoreResult<u64>;

    async fn close(&self) {}
}
