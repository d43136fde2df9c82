//! 記憶體內的資料表實作
//!
//! 每個資料表有固定的欄位集合；寫入未知欄位時回傳與遠端服務相同格式的錯誤。

use async_trait::async_trait;
use serde_json::Value;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

use crate::store::{Filter, RowStore};
use crate::{RemoteError, Row, ID_COLUMN};

#[derive(Debug, Default)]
struct MemoryTable {
    columns: BTreeSet<String>,
    rows: Vec<Row>,
}

/// 記憶體資料表
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<HashMap<String, MemoryTable>>,
    write_attempts: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：定義資料表與欄位（id 欄位自動加入）
    pub fn with_table(self, table: &str, columns: &[&str]) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            let entry = tables.entry(table.to_string()).or_default();
            entry.columns.insert(ID_COLUMN.to_string());
            entry
                .columns
                .extend(columns.iter().map(|c| c.to_string()));
        }
        self
    }

    /// 建構器模式：直接放入資料列（不檢查欄位）
    pub fn with_rows(self, table: &str, rows: Vec<Row>) -> Self {
        if let Ok(mut tables) = self.tables.lock() {
            tables
                .entry(table.to_string())
                .or_default()
                .rows
                .extend(rows);
        }
        self
    }

    /// 目前資料列快照
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.lock()
            .ok()
            .and_then(|tables| tables.get(table).map(|t| t.rows.clone()))
            .unwrap_or_default()
    }

    /// insert/update 呼叫次數
    pub fn write_attempts(&self) -> usize {
        self.write_attempts.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<String, MemoryTable>>, RemoteError> {
        self.tables
            .lock()
            .map_err(|_| RemoteError::new("memory store lock poisoned"))
    }
}

fn table_mut<'a>(
    tables: &'a mut HashMap<String, MemoryTable>,
    table: &str,
) -> Result<&'a mut MemoryTable, RemoteError> {
    tables.get_mut(table).ok_or_else(|| {
        RemoteError::new(format!("relation \"{}\" does not exist", table)).with_code("42P01")
    })
}

fn check_columns(table: &str, columns: &BTreeSet<String>, row: &Row) -> Result<(), RemoteError> {
    match row.keys().find(|key| !columns.contains(*key)) {
        Some(unknown) => Err(RemoteError::new(format!(
            "Could not find the '{}' column of '{}' in the schema cache",
            unknown, table
        ))
        .with_code("PGRST204")),
        None => Ok(()),
    }
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, table: &str, filter: Option<&Filter>) -> Result<Vec<Row>, RemoteError> {
        let mut tables = self.lock()?;
        let table = table_mut(&mut tables, table)?;
        Ok(table
            .rows
            .iter()
            .filter(|row| filter.map_or(true, |f| f.matches(row)))
            .cloned()
            .collect())
    }

    async fn insert(&self, table: &str, mut row: Row) -> Result<Row, RemoteError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.lock()?;
        let name = table;
        let table = table_mut(&mut tables, name)?;
        check_columns(name, &table.columns, &row)?;

        if !row.contains_key(ID_COLUMN) {
            row.insert(ID_COLUMN.to_string(), Value::String(Uuid::new_v4().to_string()));
        }
        table.rows.push(row.clone());
        Ok(row)
    }

    async fn update(&self, table: &str, filter: &Filter, row: Row) -> Result<Vec<Row>, RemoteError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let mut tables = self.lock()?;
        let name = table;
        let table = table_mut(&mut tables, name)?;
        check_columns(name, &table.columns, &row)?;

        let mut updated = Vec::new();
        for existing in table.rows.iter_mut().filter(|r| filter.matches(r)) {
            for (key, value) in &row {
                existing.insert(key.clone(), value.clone());
            }
            updated.push(existing.clone());
        }
        Ok(updated)
    }

    async fn delete(&self, table: &str, filter: &Filter) -> Result<(), RemoteError> {
        let mut tables = self.lock()?;
        let table = table_mut(&mut tables, table)?;
        table.rows.retain(|row| !filter.matches(row));
        Ok(())
    }
}
