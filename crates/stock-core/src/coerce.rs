//! 數值容錯轉換
//!
//! 報表必須在任何輸入下都能產生，因此錯誤的數值一律轉為安全預設值，不回傳錯誤。

use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// 目標生產數量：非有限值或負數視為 0
pub fn target_quantity(value: f64) -> Decimal {
    non_negative(value)
}

/// 單位用量：非有限值或負數視為 0
pub fn quantity_per_assembly(value: f64) -> Decimal {
    non_negative(value)
}

/// 採購批量：非有限值或小於 1 視為 1
pub fn purchase_lot(value: f64) -> u32 {
    if !value.is_finite() || value < 1.0 {
        return 1;
    }
    value.floor().min(u32::MAX as f64) as u32
}

/// 最小訂購量：非有限值或負數視為 0
pub fn minimum_order_qty(value: f64) -> u32 {
    if !value.is_finite() || value < 0.0 {
        return 0;
    }
    value.floor().min(u32::MAX as f64) as u32
}

/// 庫存數量：負數歸零，小數部分捨去
pub fn stock_quantity(value: Decimal) -> Decimal {
    if value.is_sign_negative() {
        Decimal::ZERO
    } else {
        value.trunc()
    }
}

/// 從 JSON 值讀取數量（數字或數字字串），其他一律為 0
pub fn decimal_from_json(value: &Value) -> Decimal {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Decimal::from(i)
            } else if let Some(u) = n.as_u64() {
                Decimal::from(u)
            } else {
                n.as_f64().and_then(finite_decimal).unwrap_or(Decimal::ZERO)
            }
        }
        Value::String(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(text: &str) -> Decimal {
    let trimmed = text.trim();
    trimmed
        .parse::<Decimal>()
        .ok()
        .or_else(|| trimmed.parse::<f64>().ok().and_then(finite_decimal))
        .unwrap_or(Decimal::ZERO)
}

/// 有限值轉 Decimal；超出範圍時取 `Decimal::MAX` / `Decimal::MIN`
fn finite_decimal(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value).or(Some(if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    }))
}

fn non_negative(value: f64) -> Decimal {
    match finite_decimal(value) {
        Some(d) if d > Decimal::ZERO => d,
        _ => Decimal::ZERO,
    }
}

fn to_f64(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    }
}

// serde 容錯反序列化輔助函式

pub(crate) fn de_quantity_per_assembly<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    let quantity = decimal_from_json(&value);
    Ok(if quantity.is_sign_negative() {
        Decimal::ZERO
    } else {
        quantity
    })
}

pub(crate) fn de_stock_quantity<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(stock_quantity(decimal_from_json(&value)))
}

pub(crate) fn de_purchase_lot<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Null => 1,
        other => purchase_lot(to_f64(&other)),
    })
}

pub(crate) fn de_minimum_order_qty<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(minimum_order_qty(to_f64(&value)))
}
