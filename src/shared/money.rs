//! 金额解析
//!
//! 请求里的金额既可以是 JSON 数字，也可以是数字字符串；缺失、`null`、空串都视为"未提供"。
//! 解析后统一四舍五入到两位小数，与数据库 `NUMERIC(12,2)` 的精度一致。

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde_json::Value;

/// 存储列能容纳的最大金额 (9999999999.99)
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(3_567_587_327, 232, 0, false, 2);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("must be a valid number")]
    NotANumber,
    #[error("must not be negative")]
    Negative,
    #[error("must not exceed 9999999999.99")]
    TooLarge,
}

/// 把请求中的原始值转换成金额
pub fn parse_amount(value: Option<&Value>) -> Result<Option<Decimal>, AmountError> {
    let raw = match value {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Number(number)) => number.to_string(),
        Some(Value::String(text)) if text.trim().is_empty() => return Ok(None),
        Some(Value::String(text)) => text.trim().to_string(),
        Some(_) => return Err(AmountError::NotANumber),
    };

    let amount = match Decimal::from_str(&raw).or_else(|_| Decimal::from_scientific(&raw)) {
        Ok(amount) => amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero),
        Err(_) => return beyond_decimal(&raw),
    };

    if amount.is_zero() {
        return Ok(Some(Decimal::ZERO));
    }
    if amount.is_sign_negative() {
        return Err(AmountError::Negative);
    }
    if amount > MAX_AMOUNT {
        return Err(AmountError::TooLarge);
    }
    Ok(Some(amount))
}

/// `Decimal` 装不下但仍是合法数字的值：太大算超限，太小四舍五入后是 0
fn beyond_decimal(raw: &str) -> Result<Option<Decimal>, AmountError> {
    match raw.parse::<f64>() {
        Ok(value) if value.is_finite() => {
            if value.abs() < 0.005 {
                Ok(Some(Decimal::ZERO))
            } else if value < 0.0 {
                Err(AmountError::Negative)
            } else {
                Err(AmountError::TooLarge)
            }
        }
        _ => Err(AmountError::NotANumber),
    }
}

/// 求和，空序列为 0
pub fn sum<I>(amounts: I) -> Decimal
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().fold(Decimal::ZERO, |acc, amount| acc + amount)
}
