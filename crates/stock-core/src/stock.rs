//! 庫存模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{coerce, StockError};

/// 庫存品項（即時庫存表的一列）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// 識別碼
    pub id: String,

    /// 短代碼（存在時唯一）
    #[serde(default)]
    pub code: Option<String>,

    /// 顯示名稱，比對時作為備援鍵
    pub name: String,

    /// 描述
    #[serde(default)]
    pub description: Option<String>,

    /// 分類
    #[serde(default)]
    pub category_id: Option<String>,

    /// 現有庫存（非負整數）
    #[serde(default, deserialize_with = "coerce::de_stock_quantity")]
    pub quantity: Decimal,

    /// 儲位
    #[serde(default)]
    pub location: Option<String>,
}

impl StockItem {
    /// 創建新的庫存品項
    pub fn new(id: impl Into<String>, name: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            id: id.into(),
            code: None,
            name: name.into(),
            description: None,
            category_id: None,
            quantity: coerce::stock_quantity(quantity),
            location: None,
        }
    }

    /// 建構器模式：設置代碼
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// 建構器模式：設置分類
    pub fn with_category_id(mut self, category_id: impl Into<String>) -> Self {
        self.category_id = Some(category_id.into());
        self
    }

    /// 建構器模式：設置儲位
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// 是否缺貨
    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= Decimal::ZERO
    }

    /// 入庫
    pub fn receive(&mut self, quantity: Decimal) {
        let total = self
            .quantity
            .checked_add(quantity.max(Decimal::ZERO))
            .unwrap_or(Decimal::MAX);
        self.quantity = coerce::stock_quantity(total);
    }

    /// 出庫
    pub fn issue(&mut self, quantity: Decimal) -> crate::Result<()> {
        if quantity > self.quantity {
            return Err(StockError::InsufficientStock {
                id: self.id.clone(),
                requested: quantity,
                on_hand: self.quantity,
            });
        }
        self.quantity -= quantity.max(Decimal::ZERO);
        Ok(())
    }

    /// 套用庫存異動（正數入庫，負數出庫）
    pub fn apply_movement(&mut self, delta: Decimal) -> crate::Result<()> {
        if delta.is_sign_negative() {
            self.issue(-delta)
        } else {
            self.receive(delta);
            Ok(())
        }
    }
}
