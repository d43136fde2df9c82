//! 欄位不存在錯誤的對應修正

use once_cell::sync::Lazy;
use regex::Regex;

use crate::columns::{ColumnMapping, LogicalField};
use crate::RemoteError;

static MISSING_COLUMN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"'([^']+)' column of '([^']+)'").unwrap());

/// 一次欄位名稱替換
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSwap {
    pub field: LogicalField,

    /// 錯誤訊息中不存在的欄位
    pub missing: String,

    /// 改用的欄位
    pub alternate: String,

    /// 替換後的完整對應
    pub mapping: ColumnMapping,
}

/// 從錯誤訊息取出 (欄位, 資料表)
pub fn parse_missing_column(message: &str) -> Option<(String, String)> {
    MISSING_COLUMN_RE
        .captures(message)
        .map(|caps| (caps[1].to_string(), caps[2].to_string()))
}

/// 由欄位錯誤推導替換方案；無法推導時回傳 None
pub fn resolve_column_swap(error: &RemoteError, mapping: &ColumnMapping) -> Option<ColumnSwap> {
    let (missing, _table) = parse_missing_column(&error.message)?;
    let field = mapping.field_for(&missing)?;
    let alternate = field.alternate(&missing)?;

    let next = mapping.clone().with_column(field, alternate);
    if &next == mapping {
        return None;
    }

    Some(ColumnSwap {
        field,
        missing,
        alternate: alternate.to_string(),
        mapping: next,
    })
}

/// 由欄位錯誤推導新的對應；無法推導時回傳 None
pub fn resolve_column_error(error: &RemoteError, mapping: &ColumnMapping) -> Option<ColumnMapping> {
    resolve_column_swap(error, mapping).map(|swap| swap.mapping)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use stock_core::ColumnConvention;

    #[rstest]
    #[case::does_not_exist("'quantidade' column of 'itens' does not exist", Some(("quantidade", "itens")))]
    #[case::schema_cache(
        "Could not find the 'code' column of 'itens' in the schema cache",
        Some(("code", "itens"))
    )]
    #[case::unrelated("permission denied for table itens", None)]
    fn test_parse_missing_column(#[case] message: &str, #[case] expected: Option<(&str, &str)>) {
        assert_eq!(
            parse_missing_column(message),
            expected.map(|(column, table)| (column.to_string(), table.to_string()))
        );
    }

    #[test]
    fn test_resolve_quantity_column() {
        let error = RemoteError::new("'quantidade' column of 'itens' does not exist");
        let mapping = ColumnMapping::default();

        let next = resolve_column_error(&error, &mapping).unwrap();

        assert_eq!(next.column(LogicalField::Quantity), Some("quantity"));
        // 其他欄位不變
        assert_eq!(next.column(LogicalField::Code), Some("codigo"));
    }

    #[test]
    fn test_resolve_english_to_portuguese() {
        let error = RemoteError::new("Could not find the 'location' column of 'itens' in the schema cache");
        let mapping = ColumnMapping::for_convention(ColumnConvention::English);

        let swap = resolve_column_swap(&error, &mapping).unwrap();

        assert_eq!(swap.field, LogicalField::Location);
        assert_eq!(swap.missing, "location");
        assert_eq!(swap.alternate, "localizacao");
    }

    #[rstest]
    #[case::unknown_column("'preco' column of 'itens' does not exist", ColumnConvention::Portuguese)]
    #[case::unrelated_error(
        "duplicate key value violates unique constraint",
        ColumnConvention::Portuguese
    )]
    // 對應已經使用替代名稱時，重試沒有意義
    #[case::already_alternate("'quantidade' column of 'itens' does not exist", ColumnConvention::English)]
    fn test_unresolvable_errors(#[case] message: &str, #[case] convention: ColumnConvention) {
        let error = RemoteError::new(message);
        let mapping = ColumnMapping::for_convention(convention);

        assert!(resolve_column_error(&error, &mapping).is_none());
    }
}
