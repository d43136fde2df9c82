//! 庫存可用量比對
//!
//! 為每個 BOM 物料行找出對應的庫存品項。比對鍵依優先順序嘗試，
//! 第一個命中的鍵決定結果；找不到時可用量為 0，不視為錯誤。

use rust_decimal::Decimal;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use stock_core::{normalize_key, ComponentLine, DuplicatePolicy, StockItem};

use crate::ReportWarning;

/// 正規化函式
pub type Normalizer = fn(&str) -> String;

/// 庫存查找表（名稱與代碼都會登錄）
pub struct StockLookup<'a> {
    index: HashMap<String, &'a StockItem>,

    /// 被多個品項共用的鍵 → 所有品項ID（依出現順序）
    collisions: HashMap<String, Vec<String>>,

    normalize: Normalizer,
}

/// 單一比對結果
#[derive(Debug, Clone, Copy)]
pub struct StockMatch<'a> {
    pub item: &'a StockItem,

    /// 命中的正規化鍵
    pub key: &'a str,
}

impl<'a> StockLookup<'a> {
    /// 以預設正規化（trim + 小寫）建立查找表
    pub fn build(items: &'a [StockItem], policy: DuplicatePolicy) -> Self {
        Self::build_with(items, policy, normalize_key)
    }

    /// 以指定的正規化函式建立查找表
    pub fn build_with(items: &'a [StockItem], policy: DuplicatePolicy, normalize: Normalizer) -> Self {
        let mut index: HashMap<String, &'a StockItem> = HashMap::new();
        let mut collisions: HashMap<String, Vec<String>> = HashMap::new();

        for item in items {
            let mut keys = vec![normalize(&item.name)];
            if let Some(code) = &item.code {
                let code_key = normalize(code);
                if !keys.contains(&code_key) {
                    keys.push(code_key);
                }
            }

            for key in keys.into_iter().filter(|k| !k.is_empty()) {
                match index.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(item);
                    }
                    Entry::Occupied(mut slot) => {
                        let existing = *slot.get();
                        if existing.id != item.id {
                            let ids = collisions
                                .entry(slot.key().clone())
                                .or_insert_with(|| vec![existing.id.clone()]);
                            if !ids.contains(&item.id) {
                                ids.push(item.id.clone());
                            }
                        }
                        if policy == DuplicatePolicy::LastWins {
                            slot.insert(item);
                        }
                    }
                }
            }
        }

        Self {
            index,
            collisions,
            normalize,
        }
    }

    /// 依優先順序查找物料行對應的庫存品項
    pub fn find(&self, line: &ComponentLine) -> Option<StockMatch<'_>> {
        line.candidate_keys().into_iter().find_map(|candidate| {
            let normalized = (self.normalize)(candidate);
            self.index
                .get_key_value(normalized.as_str())
                .map(|(key, item)| StockMatch {
                    item: *item,
                    key: key.as_str(),
                })
        })
    }

    /// 某個鍵是否被多個品項共用，回傳所有品項ID
    pub fn claimants(&self, key: &str) -> Option<&[String]> {
        self.collisions.get(key).map(Vec::as_slice)
    }

    /// 查找表中的鍵數量
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

/// 附帶可用量的物料行
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLine {
    pub line: ComponentLine,

    /// 可用庫存（找不到時為 0）
    pub available: Decimal,

    /// 庫存名稱（找不到時為物料顯示值）
    pub inventory_name: String,

    pub matched_stock_id: Option<String>,
    pub matched_key: Option<String>,
}

impl ResolvedLine {
    /// 不經比對、直接指定可用量
    pub fn with_available(line: ComponentLine, available: Decimal) -> Self {
        let inventory_name = line.value.clone();
        Self {
            line,
            available: available.max(Decimal::ZERO),
            inventory_name,
            matched_stock_id: None,
            matched_key: None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_stock_id.is_some()
    }
}

/// 比對結果
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub lines: Vec<ResolvedLine>,
    pub warnings: Vec<ReportWarning>,
}

/// 庫存可用量比對器
pub struct AvailabilityResolver;

impl AvailabilityResolver {
    /// 比對整份 BOM
    pub fn resolve(
        catalog: &[ComponentLine],
        stock: &[StockItem],
        policy: DuplicatePolicy,
    ) -> Resolution {
        let lookup = StockLookup::build(stock, policy);
        Self::resolve_with(catalog, &lookup)
    }

    /// 使用已建立的查找表比對
    pub fn resolve_with(catalog: &[ComponentLine], lookup: &StockLookup<'_>) -> Resolution {
        let mut resolution = Resolution::default();

        for line in catalog {
            let resolved = match lookup.find(line) {
                Some(found) => {
                    if let Some(ids) = lookup.claimants(found.key) {
                        tracing::warn!(
                            "物料 {} 的比對鍵 '{}' 對應多個庫存品項: {:?}，採用 {}",
                            line.value,
                            found.key,
                            ids,
                            found.item.id
                        );
                        resolution.warnings.push(ReportWarning::warning(
                            line.value.clone(),
                            format!(
                                "比對鍵 '{}' 對應多個庫存品項 [{}]，採用 {}",
                                found.key,
                                ids.join(", "),
                                found.item.id
                            ),
                        ));
                    }

                    ResolvedLine {
                        line: line.clone(),
                        available: found.item.quantity,
                        inventory_name: found.item.name.clone(),
                        matched_stock_id: Some(found.item.id.clone()),
                        matched_key: Some(found.key.to_string()),
                    }
                }
                None => {
                    tracing::debug!("物料 {} 找不到對應庫存", line.value);
                    ResolvedLine::with_available(line.clone(), Decimal::ZERO)
                }
            };
            resolution.lines.push(resolved);
        }

        resolution
    }
}
