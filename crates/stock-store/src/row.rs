//! 資料列與庫存品項的雙向轉換

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use stock_core::{coerce, StockItem};

use crate::columns::{ColumnMapping, LogicalField};
use crate::{Row, ID_COLUMN};

/// 寫入用的部分欄位（None 的欄位不寫入）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockPatch {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<String>,
    pub quantity: Option<Decimal>,
    pub location: Option<String>,
}

impl StockPatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由完整品項建立（名稱與數量必寫，其餘有值才寫）
    pub fn from_item(item: &StockItem) -> Self {
        Self {
            code: item.code.clone(),
            name: Some(item.name.clone()),
            description: item.description.clone(),
            category_id: item.category_id.clone(),
            quantity: Some(item.quantity),
            location: item.location.clone(),
        }
    }

    /// 只更新數量
    pub fn quantity_only(quantity: Decimal) -> Self {
        Self::new().with_quantity(quantity)
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    pub fn with_quantity(mut self, quantity: Decimal) -> Self {
        self.quantity = Some(coerce::stock_quantity(quantity));
        self
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// 是否沒有任何欄位
    pub fn is_empty(&self) -> bool {
        self.field_values().is_empty()
    }

    fn field_values(&self) -> Vec<(LogicalField, Value)> {
        let text = |field: LogicalField, value: &Option<String>| {
            value.as_ref().map(|v| (field, Value::String(v.clone())))
        };

        [
            text(LogicalField::Code, &self.code),
            text(LogicalField::Name, &self.name),
            text(LogicalField::Description, &self.description),
            text(LogicalField::CategoryId, &self.category_id),
            self.quantity
                .map(|q| (LogicalField::Quantity, quantity_to_json(q))),
            text(LogicalField::Location, &self.location),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}

/// 品項欄位 → 資料列（依目前對應；未對應或未設定的欄位不寫入）
pub fn to_db_entity(patch: &StockPatch, mapping: &ColumnMapping) -> Row {
    let mut row = Row::new();
    for (field, value) in patch.field_values() {
        if let Some(column) = mapping.column(field) {
            row.insert(column.to_string(), value);
        }
    }
    row
}

/// 資料列 → 品項（依目前對應；缺少的欄位取預設值）
pub fn to_app_entity(row: &Row, mapping: &ColumnMapping) -> StockItem {
    let get = |field: LogicalField| mapping.column(field).and_then(|column| row.get(column));
    let text = |field: LogicalField| get(field).and_then(value_to_text);

    StockItem {
        id: row.get(ID_COLUMN).and_then(value_to_text).unwrap_or_default(),
        code: text(LogicalField::Code),
        name: text(LogicalField::Name).unwrap_or_default(),
        description: text(LogicalField::Description),
        category_id: text(LogicalField::CategoryId),
        quantity: get(LogicalField::Quantity)
            .map(|v| coerce::stock_quantity(coerce::decimal_from_json(v)))
            .unwrap_or(Decimal::ZERO),
        location: text(LogicalField::Location),
    }
}

fn value_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn quantity_to_json(quantity: Decimal) -> Value {
    match quantity.to_i64() {
        Some(n) if quantity.fract().is_zero() => Value::from(n),
        _ => Value::String(quantity.to_string()),
    }
}
