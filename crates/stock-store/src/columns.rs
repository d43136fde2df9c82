//! 欄位命名對應
//!
//! 每個邏輯欄位只有固定的候選實體欄位名稱，偵測時逐一列舉比對。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use stock_core::ColumnConvention;

use crate::Row;

/// 庫存表的邏輯欄位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogicalField {
    Code,
    Name,
    Description,
    CategoryId,
    Quantity,
    Location,
}

impl LogicalField {
    pub const ALL: [LogicalField; 6] = [
        LogicalField::Code,
        LogicalField::Name,
        LogicalField::Description,
        LogicalField::CategoryId,
        LogicalField::Quantity,
        LogicalField::Location,
    ];

    /// 候選實體欄位名稱：[葡文, 英文]
    pub fn candidates(self) -> &'static [&'static str] {
        match self {
            LogicalField::Code => &["codigo", "code"],
            LogicalField::Name => &["nome", "name"],
            LogicalField::Description => &["descricao", "description"],
            LogicalField::CategoryId => &["categoria_id", "category_id"],
            LogicalField::Quantity => &["quantidade", "quantity"],
            LogicalField::Location => &["localizacao", "location"],
        }
    }

    /// 某命名慣例下的欄位名稱
    pub fn column_for(self, convention: ColumnConvention) -> &'static str {
        let candidates = self.candidates();
        match convention {
            ColumnConvention::Portuguese => candidates[0],
            ColumnConvention::English => candidates[1],
        }
    }

    /// 由實體欄位名稱反查邏輯欄位
    pub fn from_column(column: &str) -> Option<LogicalField> {
        Self::ALL
            .into_iter()
            .find(|field| field.candidates().iter().any(|c| *c == column))
    }

    /// 與指定欄位名稱不同的另一個候選名稱
    pub fn alternate(self, column: &str) -> Option<&'static str> {
        self.candidates().iter().copied().find(|c| *c != column)
    }
}

/// 邏輯欄位 → 實體欄位名稱
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnMapping {
    columns: BTreeMap<LogicalField, String>,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::for_convention(ColumnConvention::default())
    }
}

impl ColumnMapping {
    /// 以某命名慣例建立完整對應
    pub fn for_convention(convention: ColumnConvention) -> Self {
        let columns = LogicalField::ALL
            .into_iter()
            .map(|field| (field, field.column_for(convention).to_string()))
            .collect();
        Self { columns }
    }

    /// 建立空的對應（所有欄位都不寫入）
    pub fn empty() -> Self {
        Self {
            columns: BTreeMap::new(),
        }
    }

    /// 邏輯欄位目前對應的實體欄位
    pub fn column(&self, field: LogicalField) -> Option<&str> {
        self.columns.get(&field).map(String::as_str)
    }

    /// 建構器模式：設置欄位
    pub fn with_column(mut self, field: LogicalField, column: impl Into<String>) -> Self {
        self.set_column(field, column);
        self
    }

    /// 建構器模式：移除欄位（之後不會寫入該欄位）
    pub fn without(mut self, field: LogicalField) -> Self {
        self.columns.remove(&field);
        self
    }

    pub fn set_column(&mut self, field: LogicalField, column: impl Into<String>) {
        self.columns.insert(field, column.into());
    }

    /// 實體欄位名稱屬於哪個邏輯欄位（先查目前對應，再查候選名稱）
    pub fn field_for(&self, column: &str) -> Option<LogicalField> {
        self.columns
            .iter()
            .find(|(_, name)| name.as_str() == column)
            .map(|(field, _)| *field)
            .or_else(|| LogicalField::from_column(column))
    }

    /// 依回傳資料列的欄位偵測命名
    ///
    /// 對每個邏輯欄位，若目前名稱出現在任一列中則保留；
    /// 否則採用第一個出現的候選名稱；都沒出現則維持原狀。
    pub fn detect(&self, rows: &[Row]) -> ColumnMapping {
        let mut detected = self.clone();

        for field in LogicalField::ALL {
            let present = |column: &str| rows.iter().any(|row| row.contains_key(column));

            if self.column(field).map_or(false, present) {
                continue;
            }

            if let Some(found) = field.candidates().iter().copied().find(|c| present(*c)) {
                detected.set_column(field, found);
            }
        }

        detected
    }

    pub fn iter(&self) -> impl Iterator<Item = (LogicalField, &str)> {
        self.columns.iter().map(|(field, name)| (*field, name.as_str()))
    }
}
