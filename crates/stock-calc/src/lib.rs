//! # Stock Purchase Calculation
//!
//! 庫存比對與採購需求計算

pub mod calculator;
pub mod duplicates;
pub mod lot_sizing;
pub mod requirement;
pub mod resolver;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

// Re-export 主要類型
pub use calculator::PurchaseCalculator;
pub use duplicates::{find_duplicate_stock, DuplicateGroup};
pub use lot_sizing::LotSizingCalculator;
pub use requirement::{Requirement, RequirementCalculator};
pub use resolver::{AvailabilityResolver, Resolution, ResolvedLine, StockLookup};

/// 採購報表（每次產生都是新的，不做增量更新）
#[derive(Debug, Clone, Serialize)]
pub struct PurchaseReport {
    /// 報表ID
    pub id: Uuid,

    /// 產生時間
    pub generated_at: DateTime<Utc>,

    /// 目標生產數量
    pub target_quantity: Decimal,

    /// 各物料行的計算結果
    pub entries: Vec<PurchaseReportEntry>,

    /// 警告信息
    pub warnings: Vec<ReportWarning>,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}

impl PurchaseReport {
    /// 創建空的報表
    pub fn empty(target_quantity: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            target_quantity,
            entries: Vec::new(),
            warnings: Vec::new(),
            calculation_time_ms: None,
        }
    }

    /// 添加警告
    pub fn add_warning(&mut self, warning: ReportWarning) {
        self.warnings.push(warning);
    }

    /// 需要採購的物料行
    pub fn purchase_lines(&self) -> impl Iterator<Item = &PurchaseReportEntry> {
        self.entries.iter().filter(|e| e.to_buy > Decimal::ZERO)
    }

    /// 缺料物料行數
    pub fn shortage_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.shortage > Decimal::ZERO)
            .count()
    }

    /// 採購總數量
    pub fn total_to_buy(&self) -> Decimal {
        self.entries.iter().fold(Decimal::ZERO, |total, e| {
            total.checked_add(e.to_buy).unwrap_or(Decimal::MAX)
        })
    }

    /// 庫存是否足以完成目標數量
    pub fn is_fully_stocked(&self) -> bool {
        self.shortage_count() == 0
    }
}

/// 報表中的單一物料行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseReportEntry {
    /// 物料顯示值
    pub value: String,

    /// 比對到的庫存名稱（未比對到時為顯示值）
    pub inventory_name: String,

    /// 比對到的庫存ID
    pub stock_id: Option<String>,

    pub description: String,
    pub nomenclature: String,

    /// 每個成品的用量
    pub per_board: Decimal,

    /// 可用庫存
    pub available: Decimal,

    /// 總需求（用量 × 目標數量，不取整）
    pub required: Decimal,

    /// 缺料數量
    pub shortage: Decimal,

    /// 建議採購數量
    pub to_buy: Decimal,

    pub purchase_lot: u32,
    pub minimum_order_qty: u32,
}

impl PurchaseReportEntry {
    /// 顯示用的總需求（只影響呈現，不影響採購量計算）
    pub fn required_rounded(&self, decimal_places: u32) -> Decimal {
        self.required.round_dp(decimal_places)
    }

    /// 是否需要採購
    pub fn needs_purchase(&self) -> bool {
        self.to_buy > Decimal::ZERO
    }
}

/// 報表警告
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportWarning {
    /// 相關物料（顯示值）
    pub component: String,
    pub message: String,
    pub severity: WarningSeverity,
}

impl ReportWarning {
    pub fn new(component: String, message: String, severity: WarningSeverity) -> Self {
        Self {
            component,
            message,
            severity,
        }
    }

    pub fn info(component: String, message: String) -> Self {
        Self::new(component, message, WarningSeverity::Info)
    }

    pub fn warning(component: String, message: String) -> Self {
        Self::new(component, message, WarningSeverity::Warning)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum WarningSeverity {
    Info,
    Warning,
}
