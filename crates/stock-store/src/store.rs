//! 遠端資料表存取介面

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use crate::{RemoteError, Row};

/// 資料列篩選條件
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// 欄位等於某值
    Eq { column: String, value: Value },
}

impl Filter {
    pub fn eq(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.into(),
            value: value.into(),
        }
    }

    /// 資料列是否符合條件（數字與字串以文字形式比較）
    pub fn matches(&self, row: &Row) -> bool {
        match self {
            Filter::Eq { column, value } => match row.get(column) {
                Some(actual) => actual == value || as_text(actual) == as_text(value),
                None => false,
            },
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 遠端資料表的 select/insert/update/delete 能力
///
/// 傳輸協定由實作決定；每次呼叫都是一次完整的操作，失敗時不留下部分寫入。
#[async_trait]
pub trait RowStore: Send + Sync {
    /// 查詢資料列
    async fn select(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<Row>, RemoteError>;

    /// 新增一列，回傳寫入後的資料列
    async fn insert(&self, table: &str, row: Row) -> Result<Row, RemoteError>;

    /// 更新符合條件的資料列，回傳更新後的資料列
    async fn update(&self, table: &str, filter: &Filter, row: Row) -> Result<Vec<Row>, RemoteError>;

    /// 刪除符合條件的資料列
    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: RowStore + ?Sized> RowStore for Arc<T> {
    async fn select(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<Row>, RemoteError> {
        (**self).select(table, filter).await
    }

    async fn insert(&self, table: &str, row: Row) -> Result<Row, RemoteError> {
        (**self).insert(table, row).await
    }

    async fn update(&self, table: &str, filter: &Filter, row: Row) -> Result<Vec<Row>, RemoteError> {
        (**self).update(table, filter, row).await
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError> {
        (**self).delete(table, filter).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_filter_matches() {
        let row = json!({ "id": 7, "nome": "LED" }).as_object().cloned().unwrap();

        assert!(Filter::eq("id", 7).matches(&row));
        assert!(Filter::eq("id", "7").matches(&row));
        assert!(!Filter::eq("id", "8").matches(&row));
        assert!(!Filter::eq("codigo", "7").matches(&row));
    }
}
