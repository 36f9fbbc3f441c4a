//! 内存存储
//!
//! 与 `migrations/0001_init.sql` 的约束保持一致：主键/唯一键冲突、外键检查
//! (包括 `owner_id -> users`)、删除账户和删除员工时的级联。

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{OWNER_FKEY_SUFFIX, PayrollStore, StoreError, StoreResult};
use crate::models::{
    Department, DepartmentChange, Employee, EmployeeProfile, NewEmployee, NewSalary, NewUser,
    Owned, Owner, Principal, Salary, SalaryRecord, User, UserId, ownership::visible_to,
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<UserId, User>,
    departments: BTreeMap<String, Department>,
    employees: BTreeMap<i32, Employee>,
    salaries: BTreeMap<i32, Salary>,
    next_user_id: i32,
    next_employee_number: i32,
    next_salary_id: i32,
}

impl Tables {
    fn next_id(counter: &mut i32) -> i32 {
        *counter += 1;
        *counter
    }

    fn ensure_department_exists(&self, department_code: &str) -> StoreResult<()> {
        if self.departments.contains_key(department_code) {
            Ok(())
        } else {
            Err(StoreError::ForeignKeyViolation(
                "employee_department_code_fkey".to_string(),
            ))
        }
    }

    /// `owner_id -> users` 外键，共享行不检查
    fn ensure_owner_exists(&self, owner: Owner, table: &str) -> StoreResult<()> {
        match owner.owner_id() {
            Some(user_id) if !self.users.contains_key(&user_id) => Err(
                StoreError::ForeignKeyViolation(format!("{table}{OWNER_FKEY_SUFFIX}")),
            ),
            _ => Ok(()),
        }
    }

    fn visible_employee_mut(
        &mut self,
        principal: Principal,
        employee_number: i32,
    ) -> Option<&mut Employee> {
        self.employees
            .get_mut(&employee_number)
            .filter(|employee| employee.is_visible_to(principal))
    }

    fn remove_employee(&mut self, employee_number: i32) {
        self.employees.remove(&employee_number);
        self.salaries
            .retain(|_, salary| salary.employee_number != employee_number);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条共享(无归属)部门，模拟预置数据
    pub async fn seed_shared_department(&self, department: Department) {
        let mut tables = self.tables.write().await;
        tables
            .departments
            .insert(department.department_code.clone(), department);
    }

    /// 预先注册 `user1..=userN`，编号从 1 开始
    #[cfg(test)]
    pub(crate) async fn with_accounts(count: usize) -> Self {
        let store = Self::new();
        for n in 1..=count {
            store
                .insert_user(NewUser::new(
                    format!("user{n}"),
                    format!("user{n}@example.com"),
                    "hash".into(),
                    None,
                ))
                .await
                .expect("seed account");
        }
        store
    }
}

#[async_trait]
impl PayrollStore for MemoryStore {
    async fn insert_user(&self, user: NewUser) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.username == user.username) {
            return Err(StoreError::UniqueViolation("users_username_key".to_string()));
        }
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(StoreError::UniqueViolation("users_email_key".to_string()));
        }

        let user_id = Tables::next_id(&mut tables.next_user_id);
        let now = Utc::now();
        let created = User {
            user_id,
            username: user.username,
            email: user.email,
            password_hash: user.password_hash,
            full_name: user.full_name,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user_id, created.clone());
        Ok(created)
    }

    async fn find_user_by_username(&self, username: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .values()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_user(&self, user_id: UserId) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.get(&user_id).cloned())
    }

    async fn delete_user(&self, user_id: UserId) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if !tables.users.contains_key(&user_id) {
            return Ok(0);
        }

        // 其他人的员工仍引用本账户的部门时整个删除失败，和外键 RESTRICT 一致
        let referenced = tables.employees.values().any(|employee| {
            !employee.owner.is_owned_by(user_id)
                && tables
                    .departments
                    .get(&employee.department_code)
                    .is_some_and(|department| department.owner.is_owned_by(user_id))
        });
        if referenced {
            return Err(StoreError::ForeignKeyViolation(
                "employee_department_code_fkey".to_string(),
            ));
        }

        tables.salaries.retain(|_, salary| !salary.owner.is_owned_by(user_id));
        let owned_employees: Vec<i32> = tables
            .employees
            .values()
            .filter(|employee| employee.owner.is_owned_by(user_id))
            .map(|employee| employee.employee_number)
            .collect();
        for employee_number in owned_employees {
            tables.remove_employee(employee_number);
        }
        tables
            .departments
            .retain(|_, department| !department.owner.is_owned_by(user_id));
        tables.users.remove(&user_id);
        Ok(1)
    }

    async fn insert_department(&self, department: &Department) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        tables.ensure_owner_exists(department.owner, "department")?;
        if tables.departments.contains_key(&department.department_code) {
            return Err(StoreError::UniqueViolation("department_pkey".to_string()));
        }
        tables
            .departments
            .insert(department.department_code.clone(), department.clone());
        Ok(())
    }

    async fn list_departments(&self, principal: Principal) -> StoreResult<Vec<Department>> {
        let tables = self.tables.read().await;
        Ok(visible_to(tables.departments.values(), principal)
            .cloned()
            .collect())
    }

    async fn find_department(
        &self,
        principal: Principal,
        department_code: &str,
    ) -> StoreResult<Option<Department>> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .get(department_code)
            .filter(|department| department.is_visible_to(principal))
            .cloned())
    }

    async fn update_department(
        &self,
        principal: Principal,
        department_code: &str,
        change: &DepartmentChange,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        match tables
            .departments
            .get_mut(department_code)
            .filter(|department| department.is_visible_to(principal))
        {
            Some(department) => {
                department.apply(change);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_department(
        &self,
        principal: Principal,
        department_code: &str,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let visible = tables
            .departments
            .get(department_code)
            .is_some_and(|department| department.is_visible_to(principal));
        if !visible {
            return Ok(0);
        }
        if tables
            .employees
            .values()
            .any(|employee| employee.department_code == department_code)
        {
            return Err(StoreError::ForeignKeyViolation(
                "employee_department_code_fkey".to_string(),
            ));
        }
        tables.departments.remove(department_code);
        Ok(1)
    }

    async fn insert_employee(&self, employee: NewEmployee) -> StoreResult<Employee> {
        let mut tables = self.tables.write().await;
        tables.ensure_owner_exists(employee.owner, "employee")?;
        tables.ensure_department_exists(&employee.profile.department_code)?;
        let employee_number = Tables::next_id(&mut tables.next_employee_number);
        let created = Employee::from_new(employee_number, employee);
        tables.employees.insert(employee_number, created.clone());
        Ok(created)
    }

    async fn list_employees(&self, principal: Principal) -> StoreResult<Vec<Employee>> {
        let tables = self.tables.read().await;
        Ok(visible_to(tables.employees.values(), principal)
            .cloned()
            .collect())
    }

    async fn find_employee(
        &self,
        principal: Principal,
        employee_number: i32,
    ) -> StoreResult<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables
            .employees
            .get(&employee_number)
            .filter(|employee| employee.is_visible_to(principal))
            .cloned())
    }

    async fn update_employee(
        &self,
        principal: Principal,
        employee_number: i32,
        profile: &EmployeeProfile,
    ) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.visible_employee_mut(principal, employee_number).is_none() {
            return Ok(0);
        }
        tables.ensure_department_exists(&profile.department_code)?;
        if let Some(employee) = tables.visible_employee_mut(principal, employee_number) {
            employee.apply(profile);
        }
        Ok(1)
    }

    async fn delete_employee(&self, principal: Principal, employee_number: i32) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        if tables.visible_employee_mut(principal, employee_number).is_none() {
            return Ok(0);
        }
        tables.remove_employee(employee_number);
        Ok(1)
    }

    async fn insert_salary(&self, salary: NewSalary) -> StoreResult<Salary> {
        let mut tables = self.tables.write().await;
        tables.ensure_owner_exists(salary.owner, "salary")?;
        if !tables.employees.contains_key(&salary.employee_number) {
            return Err(StoreError::ForeignKeyViolation(
                "salary_employee_number_fkey".to_string(),
            ));
        }
        if tables.salaries.values().any(|existing| {
            existing.employee_number == salary.employee_number && existing.month == salary.month
        }) {
            return Err(StoreError::UniqueViolation(
                "salary_employee_month_key".to_string(),
            ));
        }
        let salary_id = Tables::next_id(&mut tables.next_salary_id);
        let created = Salary::from_new(salary_id, salary);
        tables.salaries.insert(salary_id, created.clone());
        Ok(created)
    }

    async fn list_salaries(&self, principal: Principal) -> StoreResult<Vec<SalaryRecord>> {
        let tables = self.tables.read().await;
        let mut records: Vec<SalaryRecord> = visible_to(tables.salaries.values(), principal)
            .map(|salary| {
                let employee = tables.employees.get(&salary.employee_number).map(|e| {
                    (
                        e.first_name.as_str(),
                        e.last_name.as_str(),
                        e.position.as_str(),
                    )
                });
                SalaryRecord::joined(salary, employee)
            })
            .collect();
        records.sort_by(|a, b| {
            b.month
                .cmp(&a.month)
                .then_with(|| b.salary_id.cmp(&a.salary_id))
        });
        Ok(records)
    }

    async fn delete_salary(&self, principal: Principal, salary_id: i32) -> StoreResult<u64> {
        let mut tables = self.tables.write().await;
        let visible = tables
            .salaries
            .get(&salary_id)
            .is_some_and(|salary| salary.is_visible_to(principal));
        if !visible {
            return Ok(0);
        }
        tables.salaries.remove(&salary_id);
        Ok(1)
    }
}
