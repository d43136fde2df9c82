//! 重複庫存品項偵測
//!
//! 只回報共用比對鍵的品項群組，不合併也不刪除。

use std::collections::{BTreeMap, BTreeSet};
use stock_core::{normalize_key, StockItem};

/// 共用比對鍵的庫存品項群組
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// 群組內共用的正規化鍵
    pub keys: Vec<String>,

    /// 品項ID（依輸入順序）
    pub stock_ids: Vec<String>,
}

/// 找出名稱或代碼（正規化後）相同的品項群組
///
/// 名稱與代碼交叉相同也算：A 的代碼等於 B 的名稱時，A 與 B 同組。
/// 透過共用鍵連結的品項會合併成同一組。
pub fn find_duplicate_stock(items: &[StockItem]) -> Vec<DuplicateGroup> {
    // 鍵 → 擁有該鍵的品項索引
    let mut owners: BTreeMap<String, BTreeSet<usize>> = BTreeMap::new();
    for (idx, item) in items.iter().enumerate() {
        let name_key = normalize_key(&item.name);
        let code_key = item.code.as_deref().map(normalize_key);
        for key in std::iter::once(name_key).chain(code_key) {
            if !key.is_empty() {
                owners.entry(key).or_default().insert(idx);
            }
        }
    }

    // 以並查集合併共用鍵的品項
    let mut parent: Vec<usize> = (0..items.len()).collect();
    for indices in owners.values().filter(|set| set.len() > 1) {
        let mut iter = indices.iter();
        if let Some(&first) = iter.next() {
            for &other in iter {
                union(&mut parent, first, other);
            }
        }
    }

    let mut groups: BTreeMap<usize, (BTreeSet<String>, Vec<usize>)> = BTreeMap::new();
    for (key, indices) in owners.iter().filter(|(_, set)| set.len() > 1) {
        if let Some(&first) = indices.iter().next() {
            let root = find(&mut parent, first);
            groups.entry(root).or_default().0.insert(key.clone());
        }
    }
    for idx in 0..items.len() {
        let root = find(&mut parent, idx);
        if let Some(group) = groups.get_mut(&root) {
            group.1.push(idx);
        }
    }

    let mut result: Vec<DuplicateGroup> = groups
        .into_values()
        .map(|(keys, indices)| DuplicateGroup {
            keys: keys.into_iter().collect(),
            stock_ids: indices.into_iter().map(|i| items[i].id.clone()).collect(),
        })
        .collect();
    result.sort_by(|a, b| a.stock_ids.cmp(&b.stock_ids));

    if !result.is_empty() {
        tracing::warn!("庫存中有 {} 組重複品項", result.len());
    }

    result
}

fn find(parent: &mut [usize], idx: usize) -> usize {
    let mut root = idx;
    while parent[root] != root {
        root = parent[root];
    }
    let mut current = idx;
    while parent[current] != root {
        let next = parent[current];
        parent[current] = root;
        current = next;
    }
    root
}

fn union(parent: &mut [usize], a: usize, b: usize) {
    let root_a = find(parent, a);
    let root_b = find(parent, b);
    if root_a != root_b {
        parent[root_b.max(root_a)] = root_a.min(root_b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_no_duplicates() {
        let items = vec![
            StockItem::new("a", "R 10k", Decimal::ONE).with_code("001"),
            StockItem::new("b", "R 1k", Decimal::ONE).with_code("002"),
        ];
        assert!(find_duplicate_stock(&items).is_empty());
    }

    #[test]
    fn test_legacy_and_coded_entries_grouped() {
        // 舊版名稱的品項與有代碼的新品項
        let items = vec![
            StockItem::new("old", "PIC12F1571-I/SN", Decimal::from(2)),
            StockItem::new("new", "pic12f1571-i/sn ", Decimal::from(10)).with_code("003"),
            StockItem::new("other", "LM358", Decimal::from(4)),
        ];

        let groups = find_duplicate_stock(&items);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].stock_ids, vec!["old".to_string(), "new".to_string()]);
        assert_eq!(groups[0].keys, vec!["pic12f1571-i/sn".to_string()]);
    }

    #[test]
    fn test_transitive_grouping_through_code() {
        let items = vec![
            StockItem::new("a", "Fuse", Decimal::ONE).with_code("F1"),
            StockItem::new("b", "f1", Decimal::ONE).with_code("X9"),
            StockItem::new("c", "Something", Decimal::ONE).with_code("x9"),
        ];

        let groups = find_duplicate_stock(&items);

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].stock_ids.len(), 3);
        assert_eq!(groups[0].keys, vec!["f1".to_string(), "x9".to_string()]);
    }

    #[test]
    fn test_name_equal_to_own_code_is_not_duplicate() {
        let items = vec![StockItem::new("a", "BAT54", Decimal::ONE).with_code("bat54")];
        assert!(find_duplicate_stock(&items).is_empty());
    }
}
