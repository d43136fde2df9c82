//! 計算與資料表配置

use serde::{Deserialize, Serialize};

use crate::StockError;

/// 同一比對鍵對應多個庫存品項時的取捨規則
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DuplicatePolicy {
    /// 保留最先出現的品項（預設）
    #[default]
    FirstWins,

    /// 保留最後出現的品項（舊版行為）
    LastWins,
}

/// 遠端庫存表的欄位命名慣例
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ColumnConvention {
    /// codigo / nome / quantidade ...
    #[default]
    Portuguese,

    /// code / name / quantity ...
    English,
}

/// 採購計算與庫存表配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlannerConfig {
    /// 比對鍵重複時的規則
    pub duplicate_policy: DuplicatePolicy,

    /// 遠端庫存表名稱
    pub inventory_table: String,

    /// 欄位偵測前使用的命名慣例
    pub column_convention: ColumnConvention,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::FirstWins,
            inventory_table: "itens".to_string(),
            column_convention: ColumnConvention::Portuguese,
        }
    }
}

impl PlannerConfig {
    /// 創建預設配置
    pub fn new() -> Self {
        Self::default()
    }

    /// 從 JSON 文件載入配置，缺少的欄位使用預設值
    pub fn from_json_str(json: &str) -> crate::Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| StockError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 建構器模式：設置重複鍵規則
    pub fn with_duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// 建構器模式：設置庫存表名稱
    pub fn with_inventory_table(mut self, table: impl Into<String>) -> Self {
        self.inventory_table = table.into();
        self
    }

    /// 建構器模式：設置欄位命名慣例
    pub fn with_column_convention(mut self, convention: ColumnConvention) -> Self {
        self.column_convention = convention;
        self
    }

    /// 檢查配置
    pub fn validate(&self) -> crate::Result<()> {
        if self.inventory_table.trim().is_empty() {
            return Err(StockError::InvalidConfig(
                "inventory_table 不可為空".to_string(),
            ));
        }
        Ok(())
    }
}
