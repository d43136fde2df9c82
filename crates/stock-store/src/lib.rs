//! # Stock Store
//!
//! 遠端庫存表存取：欄位命名自動偵測與欄位錯誤重試

pub mod adapter;
pub mod columns;
pub mod memory;
pub mod recovery;
pub mod row;
pub mod store;

// Re-export 主要類型
pub use adapter::InventoryAdapter;
pub use columns::{ColumnMapping, LogicalField};
pub use memory::MemoryStore;
pub use recovery::{resolve_column_error, ColumnSwap};
pub use row::{to_app_entity, to_db_entity, StockPatch};
pub use store::{Filter, RowStore};

/// 資料表的一列（欄位名稱 → 值）
pub type Row = serde_json::Map<String, serde_json::Value>;

/// 主鍵欄位（兩種命名慣例相同）
pub const ID_COLUMN: &str = "id";

/// 遠端服務回傳的錯誤
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RemoteError {
    /// 錯誤訊息
    pub message: String,

    /// 錯誤代碼（如果有）
    pub code: Option<String>,
}

impl RemoteError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    /// 建構器模式：設置錯誤代碼
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// 庫存表存取錯誤
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    #[error("遠端操作失敗: {0}")]
    Remote(#[source] RemoteError),

    #[error("欄位 '{column}' 改用 '{alternate}' 重試後仍失敗: {source}")]
    RetryFailed {
        column: String,
        alternate: String,
        #[source]
        source: RemoteError,
    },

    #[error("找不到庫存品項: {0}")]
    NotFound(String),

    #[error(transparent)]
    Stock(#[from] stock_core::StockError),
}

impl AdapterError {
    /// 最終的遠端錯誤（如果是遠端失敗）
    pub fn remote(&self) -> Option<&RemoteError> {
        match self {
            Self::Remote(err) => Some(err),
            Self::RetryFailed { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<RemoteError> for AdapterError {
    fn from(err: RemoteError) -> Self {
        Self::Remote(err)
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
