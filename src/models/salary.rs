use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::ownership::{Owned, Owner};

/// 工资单月份是否是 `YYYY-MM` 格式
pub fn is_valid_month(month: &str) -> bool {
    let bytes = month.as_bytes();
    bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit)
        && NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").is_ok()
}

/// 一次工资计算的快照
///
/// 税前工资从部门复制过来，之后部门工资再怎么改也不会回写。
/// 实发可以是负数，不做下限截断。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayFigures {
    pub gross_salary: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
}

impl PayFigures {
    pub fn snapshot(gross_salary: Decimal, deductions: Option<Decimal>) -> Self {
        let deductions = deductions.unwrap_or(Decimal::ZERO);
        PayFigures {
            gross_salary,
            deductions,
            net_salary: gross_salary - deductions,
        }
    }
}

/// 工资记录实体，`(employee_number, month)` 唯一
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub salary_id: i32,
    pub employee_number: i32,
    pub month: String,
    pub gross_salary: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    #[serde(rename = "ownerId")]
    #[sqlx(rename = "owner_id", try_from = "Option<i32>")]
    pub owner: Owner,
}

#[derive(Debug, Clone)]
pub struct NewSalary {
    pub employee_number: i32,
    pub month: String,
    pub figures: PayFigures,
    pub owner: Owner,
}

impl Salary {
    pub fn from_new(salary_id: i32, new: NewSalary) -> Self {
        Salary {
            salary_id,
            employee_number: new.employee_number,
            month: new.month,
            gross_salary: new.figures.gross_salary,
            deductions: new.figures.deductions,
            net_salary: new.figures.net_salary,
            owner: new.owner,
        }
    }
}

impl Owned for Salary {
    fn owner(&self) -> Owner {
        self.owner
    }
}

/// 工资记录 + 员工信息 (左连接，员工不存在时姓名职位为空)
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct SalaryRecord {
    pub salary_id: i32,
    pub employee_number: i32,
    pub month: String,
    pub gross_salary: Decimal,
    pub deductions: Decimal,
    pub net_salary: Decimal,
    #[serde(rename = "ownerId")]
    #[sqlx(rename = "owner_id", try_from = "Option<i32>")]
    pub owner: Owner,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub position: Option<String>,
}

impl SalaryRecord {
    pub fn joined(salary: &Salary, employee: Option<(&str, &str, &str)>) -> Self {
        let (first_name, last_name, position) = match employee {
            Some((first, last, position)) => (
                Some(first.to_string()),
                Some(last.to_string()),
                Some(position.to_string()),
            ),
            None => (None, None, None),
        };
        SalaryRecord {
            salary_id: salary.salary_id,
            employee_number: salary.employee_number,
            month: salary.month.clone(),
            gross_salary: salary.gross_salary,
            deductions: salary.deductions,
            net_salary: salary.net_salary,
            owner: salary.owner,
            first_name,
            last_name,
            position,
        }
    }
}

impl Owned for SalaryRecord {
    fn owner(&self) -> Owner {
        self.owner
    }
}
