use std::collections::HashSet;
use std::sync::Arc;

use crate::db::PayrollStore;
use crate::dtos::request::SalaryQuery;
use crate::models::{Principal, SalaryRecord};
use crate::shared::error::AppError;
use crate::vos::report::SalaryReport;

/// 工资列表过滤条件，全部可选，之间是 AND 关系
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub employee_number: Option<i32>,
    pub month: Option<String>,
    pub department_code: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl TryFrom<SalaryQuery> for ReportFilter {
    type Error = AppError;

    fn try_from(query: SalaryQuery) -> Result<Self, Self::Error> {
        let employee_number = non_blank(query.employee_number)
            .map(|raw| {
                raw.parse::<i32>().map_err(|_| {
                    AppError::BadRequest("Employee number must be an integer.".to_string())
                })
            })
            .transpose()?;
        Ok(ReportFilter {
            employee_number,
            month: non_blank(query.month),
            department_code: non_blank(query.department_code),
        })
    }
}

impl ReportFilter {
    pub fn for_employee(employee_number: i32) -> Self {
        ReportFilter {
            employee_number: Some(employee_number),
            ..Default::default()
        }
    }

    /// 按条件过滤，保持原有顺序
    ///
    /// 部门条件是间接的：`department_employees` 是"当前"属于该部门的员工编号，
    /// 与工资记录创建时员工在哪个部门无关。
    pub fn apply(
        &self,
        records: Vec<SalaryRecord>,
        department_employees: Option<&HashSet<i32>>,
    ) -> Vec<SalaryRecord> {
        records
            .into_iter()
            .filter(|r| self.employee_number.is_none_or(|n| r.employee_number == n))
            .filter(|r| self.month.as_deref().is_none_or(|m| r.month == m))
            .filter(|r| department_employees.is_none_or(|set| set.contains(&r.employee_number)))
            .collect()
    }
}

#[derive(Clone)]
pub struct ReportService {
    store: Arc<dyn PayrollStore>,
}

impl ReportService {
    pub fn new(store: Arc<dyn PayrollStore>) -> Self {
        ReportService { store }
    }

    /// 可见的工资记录 (左连接员工)，按月份倒序，再按过滤条件筛选
    pub async fn list_salaries(
        &self,
        principal: Principal,
        filter: &ReportFilter,
    ) -> Result<Vec<SalaryRecord>, AppError> {
        let records = self.store.list_salaries(principal).await?;

        let department_employees = match &filter.department_code {
            Some(code) => Some(
                self.store
                    .list_employees(principal)
                    .await?
                    .into_iter()
                    .filter(|employee| &employee.department_code == code)
                    .map(|employee| employee.employee_number)
                    .collect::<HashSet<_>>(),
            ),
            None => None,
        };

        Ok(filter.apply(records, department_employees.as_ref()))
    }

    pub async fn report(
        &self,
        principal: Principal,
        filter: &ReportFilter,
    ) -> Result<SalaryReport, AppError> {
        Ok(self.list_salaries(principal, filter).await?.into())
    }
}
