use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::SalaryRecord;
use crate::shared::money;

/// 工资记录的汇总
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SalaryTotals {
    pub total_gross: Decimal,
    pub total_deductions: Decimal,
    pub total_net: Decimal,
    pub count: usize,
}

impl SalaryTotals {
    pub fn from_records(records: &[SalaryRecord]) -> Self {
        SalaryTotals {
            total_gross: money::sum(records.iter().map(|r| r.gross_salary)),
            total_deductions: money::sum(records.iter().map(|r| r.deductions)),
            total_net: money::sum(records.iter().map(|r| r.net_salary)),
            count: records.len(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct SalaryReport {
    pub records: Vec<SalaryRecord>,
    pub totals: SalaryTotals,
}

impl From<Vec<SalaryRecord>> for SalaryReport {
    fn from(records: Vec<SalaryRecord>) -> Self {
        let totals = SalaryTotals::from_records(&records);
        SalaryReport { records, totals }
    }
}
