//! 庫存表存取器
//!
//! 持有一份欄位對應，生命週期與後端連線相同。讀取時依回傳資料偵測欄位命名；
//! 寫入失敗且錯誤指出欄位不存在時，以替代欄位名稱重試一次。

use rust_decimal::Decimal;
use stock_core::{PlannerConfig, StockItem};

use crate::columns::ColumnMapping;
use crate::recovery::resolve_column_swap;
use crate::row::{to_app_entity, to_db_entity, StockPatch};
use crate::store::{Filter, RowStore};
use crate::{AdapterError, RemoteError, Row, ID_COLUMN};

/// 寫入操作
#[derive(Debug, Clone, Copy)]
enum WriteOp<'a> {
    Insert(&'a StockPatch),
    Update { id: &'a str, patch: &'a StockPatch },
}

impl WriteOp<'_> {
    fn target_id(&self) -> Option<&str> {
        match self {
            WriteOp::Insert(_) => None,
            WriteOp::Update { id, .. } => Some(*id),
        }
    }
}

/// 庫存表存取器（單一寫入者）
pub struct InventoryAdapter<S> {
    store: S,
    table: String,
    mapping: ColumnMapping,
}

impl<S: RowStore> InventoryAdapter<S> {
    /// 依配置創建存取器
    pub fn new(store: S, config: &PlannerConfig) -> Self {
        Self::with_mapping(
            store,
            config.inventory_table.clone(),
            ColumnMapping::for_convention(config.column_convention),
        )
    }

    /// 以指定的欄位對應創建存取器
    pub fn with_mapping(store: S, table: impl Into<String>, mapping: ColumnMapping) -> Self {
        Self {
            store,
            table: table.into(),
            mapping,
        }
    }

    /// 目前的欄位對應
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// 讀取所有庫存品項
    pub async fn list(&mut self) -> crate::Result<Vec<StockItem>> {
        let rows = self.store.select(&self.table, None).await?;
        self.observe(&rows);

        tracing::info!("讀取庫存表 {}：{} 筆", self.table, rows.len());

        Ok(rows
            .iter()
            .map(|row| to_app_entity(row, &self.mapping))
            .collect())
    }

    /// 讀取單一庫存品項
    pub async fn get(&mut self, id: &str) -> crate::Result<StockItem> {
        let filter = Filter::eq(ID_COLUMN, id);
        let rows = self.store.select(&self.table, Some(&filter)).await?;
        self.observe(&rows);

        rows.first()
            .map(|row| to_app_entity(row, &self.mapping))
            .ok_or_else(|| AdapterError::NotFound(id.to_string()))
    }

    /// 新增庫存品項
    pub async fn insert(&mut self, patch: &StockPatch) -> crate::Result<StockItem> {
        let row = self.write_with_retry(WriteOp::Insert(patch)).await?;
        Ok(to_app_entity(&row, &self.mapping))
    }

    /// 更新庫存品項（只寫入 patch 中有值的欄位）
    pub async fn update(&mut self, id: &str, patch: &StockPatch) -> crate::Result<StockItem> {
        let row = self.write_with_retry(WriteOp::Update { id, patch }).await?;
        Ok(to_app_entity(&row, &self.mapping))
    }

    /// 刪除庫存品項
    pub async fn delete(&self, id: &str) -> crate::Result<()> {
        self.store
            .delete(&self.table, &Filter::eq(ID_COLUMN, id))
            .await?;
        tracing::info!("刪除庫存品項 {}", id);
        Ok(())
    }

    /// 庫存異動：正數入庫，負數出庫
    ///
    /// 讀取目前數量後寫回新數量，不做併發控制（後寫者為準）。
    pub async fn adjust_quantity(&mut self, id: &str, delta: Decimal) -> crate::Result<StockItem> {
        let mut item = self.get(id).await?;
        item.apply_movement(delta)?;

        tracing::debug!("庫存異動 {}: {} → {}", id, delta, item.quantity);

        self.update(id, &StockPatch::quantity_only(item.quantity))
            .await
    }

    /// 寫入，欄位不存在時最多以替代欄位重試一次
    async fn write_with_retry(&mut self, op: WriteOp<'_>) -> crate::Result<Row> {
        let first = self.execute(op, &self.mapping).await;
        let first_error = match first {
            Ok(Some(row)) => {
                self.observe(std::slice::from_ref(&row));
                return Ok(row);
            }
            Ok(None) => return Err(not_found(op)),
            Err(err) => err,
        };

        let Some(swap) = resolve_column_swap(&first_error, &self.mapping) else {
            tracing::warn!("寫入庫存表 {} 失敗: {}", self.table, first_error);
            return Err(AdapterError::Remote(first_error));
        };

        tracing::warn!(
            "庫存表 {} 沒有欄位 '{}'，改用 '{}' 重試",
            self.table,
            swap.missing,
            swap.alternate
        );

        let retried = self.execute(op, &swap.mapping).await;
        match retried {
            Ok(Some(row)) => {
                self.mapping = swap.mapping;
                self.observe(std::slice::from_ref(&row));
                Ok(row)
            }
            Ok(None) => {
                self.mapping = swap.mapping;
                Err(not_found(op))
            }
            Err(retry_error) => {
                tracing::warn!("重試仍失敗: {}", retry_error);
                Err(AdapterError::RetryFailed {
                    column: swap.missing,
                    alternate: swap.alternate,
                    source: retry_error,
                })
            }
        }
    }

    /// 以指定對應執行一次寫入
    async fn execute(
        &self,
        op: WriteOp<'_>,
        mapping: &ColumnMapping,
    ) -> Result<Option<Row>, RemoteError> {
        match op {
            WriteOp::Insert(patch) => {
                let row = to_db_entity(patch, mapping);
                self.store.insert(&self.table, row).await.map(Some)
            }
            WriteOp::Update { id, patch } => {
                let row = to_db_entity(patch, mapping);
                let filter = Filter::eq(ID_COLUMN, id);
                let updated = self.store.update(&self.table, &filter, row).await?;
                Ok(updated.into_iter().next())
            }
        }
    }

    /// 依回傳資料列更新欄位對應
    fn observe(&mut self, rows: &[Row]) {
        if rows.is_empty() {
            return;
        }
        let detected = self.mapping.detect(rows);
        if detected != self.mapping {
            tracing::debug!("欄位對應更新: {:?}", detected);
            self.mapping = detected;
        }
    }
}

fn not_found(op: WriteOp<'_>) -> AdapterError {
    AdapterError::NotFound(op.target_id().unwrap_or_default().to_string())
}
