//! # Stockplan
//!
//! BOM 採購需求計算與庫存表存取

pub use stock_calc as calc;
pub use stock_core as model;
pub use stock_store as store;

/// 常用類型
pub mod prelude {
    pub use stock_calc::{
        find_duplicate_stock, AvailabilityResolver, PurchaseCalculator, PurchaseReport,
        PurchaseReportEntry, ReportWarning, ResolvedLine,
    };
    pub use stock_core::{
        coerce, Catalog, ColumnConvention, ComponentLine, DuplicatePolicy, PlannerConfig,
        StockError, StockItem,
    };
    pub use stock_store::{
        AdapterError, ColumnMapping, InventoryAdapter, LogicalField, MemoryStore, RemoteError,
        RowStore, StockPatch,
    };
}
