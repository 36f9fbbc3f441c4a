use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;

use super::{PayrollStore, StoreResult};
use crate::models::{
    Department, DepartmentChange, Employee, EmployeeProfile, NewEmployee, NewSalary, NewUser,
    Principal, Salary, SalaryRecord, User, UserId,
};

const USER_COLUMNS: &str =
    "user_id, username, email, password_hash, full_name, created_at, updated_at";
const EMPLOYEE_COLUMNS: &str = "employee_number, first_name, last_name, gender, address, \
     position, department_code, owner_id";
const SALARY_COLUMNS: &str =
    "salary_id, employee_number, month, gross_salary, deductions, net_salary, owner_id";

#[derive(Clone)]
pub struct PgStore {
    pub pool: sqlx::PgPool,
}

impl PgStore {
    pub async fn new(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(PgStore { pool })
    }

    /// 执行 migrations/ 下的建表脚本
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

#[async_trait]
impl PayrollStore for PgStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let sql = format!(
            "INSERT INTO users (username, email, password_hash, full_name) \
             VALUES ($1, $2, $3, $4) RETURNING {USER_COLUMNS}"
        );
        let created = sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = $1");
        let user = sqlx::query_as::<_, User>(&sql)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    async fn delete_user(&self, user_id: UserId) -> StoreResult<u64> {
        // 部门/员工/工资表的 owner_id 都是 ON DELETE CASCADE
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn insert_department(&self, department: &Department) -> StoreResult<()> {
        sqlx::query(
            "INSERT INTO department (department_code, department_name, gross_salary, owner_id) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(&department.department_code)
        .bind(&department.department_name)
        .bind(department.gross_salary)
        .bind(department.owner.owner_id())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_departments(&self, principal: Principal) -> StoreResult<Vec<Department>> {
        let departments = sqlx::query_as::<_, Department>(
            "SELECT department_code, department_name, gross_salary, owner_id FROM department \
             WHERE owner_id = $1 OR owner_id IS NULL ORDER BY department_code",
        )
        .bind(principal.user_id())
        .fetch_all(&self.pool)
        .await?;
        Ok(departments)
    }

    async fn find_department(
        &self,
        principal: Principal,
        department_code: &str,
    ) -> StoreResult<Option<Department>> {
        let department = sqlx::query_as::<_, Department>(
            "SELECT department_code, department_name, gross_salary, owner_id FROM department \
             WHERE department_code = $1 AND (owner_id = $2 OR owner_id IS NULL)",
        )
        .bind(department_code)
        .bind(principal.user_id())
        .fetch_optional(&self.pool)
        .await?;
        Ok(department)
    }

    async fn update_department(
        &self,
        principal: Principal,
        department_code: &str,
        change: &DepartmentChange,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE department SET department_name = $1, gross_salary = $2 \
             WHERE department_code = $3 AND (owner_id = $4 OR owner_id IS NULL)",
        )
        .bind(&change.department_name)
        .bind(change.gross_salary)
        .bind(department_code)
        .bind(principal.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_department(
        &self,
        principal: Principal,
        department_code: &str,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM department \
             WHERE department_code = $1 AND (owner_id = $2 OR owner_id IS NULL)",
        )
        .bind(department_code)
        .bind(principal.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let sql = format!(
            "INSERT INTO employee \
             (first_name, last_name, gender, address, position, department_code, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {EMPLOYEE_COLUMNS}"
        );
        let profile = &employee.profile;
        let created = sqlx::query_as::<_, Employee>(&sql)
            .bind(&profile.first_name)
            .bind(&profile.last_name)
            .bind(profile.gender)
            .bind(&profile.address)
            .bind(&profile.position)
            .bind(&profile.department_code)
            .bind(employee.owner.owner_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_employees(&self, principal: Principal) -> StoreResult<Vec<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee \
             WHERE owner_id = $1 OR owner_id IS NULL ORDER BY employee_number"
        );
        let employees = sqlx::query_as::<_, Employee>(&sql)
            .bind(principal.user_id())
            .fetch_all(&self.pool)
            .await?;
        Ok(employees)
    }

    async fn find_employee(
        &self,
        principal: Principal,
        employee_number: i32,
    ) -> StoreResult<Option<Employee>> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employee \
             WHERE employee_number = $1 AND (owner_id = $2 OR owner_id IS NULL)"
        );
        let employee = sqlx::query_as::<_, Employee>(&sql)
            .bind(employee_number)
            .bind(principal.user_id())
            .fetch_optional(&self.pool)
            .await?;
        Ok(employee)
    }

    async fn update_employee(
        &self,
        principal: Principal,
        employee_number: i32,
        profile: &EmployeeProfile,
    ) -> StoreResult<u64> {
        let result = sqlx::query(
            "UPDATE employee SET first_name = $1, last_name = $2, gender = $3, address = $4, \
             position = $5, department_code = $6 \
             WHERE employee_number = $7 AND (owner_id = $8 OR owner_id IS NULL)",
        )
        .bind(&profile.first_name)
        .bind(&profile.last_name)
        .bind(profile.gender)
        .bind(&profile.address)
        .bind(&profile.position)
        .bind(&profile.department_code)
        .bind(employee_number)
        .bind(principal.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_employee(&self, principal: Principal, employee_number: i32) -> StoreResult<u64> {
        // salary.employee_number 是 ON DELETE CASCADE
        let result = sqlx::query(
            "DELETE FROM employee \
             WHERE employee_number = $1 AND (owner_id = $2 OR owner_id IS NULL)",
        )
        .bind(employee_number)
        .bind(principal.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn insert_salary(&self, salary: NewSalary) -> StoreResult<Salary> {
        let sql = format!(
            "INSERT INTO salary \
             (employee_number, month, gross_salary, deductions, net_salary, owner_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {SALARY_COLUMNS}"
        );
        let created = sqlx::query_as::<_, Salary>(&sql)
            .bind(salary.employee_number)
            .bind(&salary.month)
            .bind(salary.figures.gross_salary)
            .bind(salary.figures.deductions)
            .bind(salary.figures.net_salary)
            .bind(salary.owner.owner_id())
            .fetch_one(&self.pool)
            .await?;
        Ok(created)
    }

    async fn list_salaries(&self, principal: Principal) -> StoreResult<Vec<SalaryRecord>> {
        let records = sqlx::query_as::<_, SalaryRecord>(
            "SELECT s.salary_id, s.employee_number, s.month, s.gross_salary, s.deductions, \
                    s.net_salary, s.owner_id, e.first_name, e.last_name, e.position \
             FROM salary s \
             LEFT JOIN employee e ON s.employee_number = e.employee_number \
             WHERE s.owner_id = $1 OR s.owner_id IS NULL \
             ORDER BY s.month DESC, s.salary_id DESC",
        )
        .bind(principal.user_id())
        .fetch_all(&self.pool)
        .await?;
        Ok(records)
    }

    async fn delete_salary(&self, principal: Principal, salary_id: i32) -> StoreResult<u64> {
        let result = sqlx::query(
            "DELETE FROM salary WHERE salary_id = $1 AND (owner_id = $2 OR owner_id IS NULL)",
        )
        .bind(salary_id)
        .bind(principal.user_id())
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
