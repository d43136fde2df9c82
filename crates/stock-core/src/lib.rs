//! # Stock Core
//!
//! 核心資料模型與類型定義

pub mod coerce;
pub mod component;
pub mod config;
pub mod stock;

// Re-export 主要類型
pub use component::{Catalog, ComponentLine};
pub use config::{ColumnConvention, DuplicatePolicy, PlannerConfig};
pub use stock::StockItem;

/// 庫存錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum StockError {
    #[error("庫存不足：物料 {id} 需要 {requested}, 現有 {on_hand}")]
    InsufficientStock {
        id: String,
        requested: rust_decimal::Decimal,
        on_hand: rust_decimal::Decimal,
    },

    #[error("無效的配置: {0}")]
    InvalidConfig(String),

    #[error("找不到物料: {0}")]
    NotFound(String),

    #[error("其他錯誤: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, StockError>;

/// 比對用的正規化：去除前後空白並轉小寫
pub fn normalize_key(value: &str) -> String {
    value.trim().to_lowercase()
}
