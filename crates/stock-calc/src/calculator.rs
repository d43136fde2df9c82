//! 採購需求主計算器

use rust_decimal::Decimal;
use stock_core::{coerce, ComponentLine, PlannerConfig, StockItem};

use crate::lot_sizing::LotSizingCalculator;
use crate::requirement::RequirementCalculator;
use crate::resolver::{AvailabilityResolver, Resolution, ResolvedLine};
use crate::{PurchaseReport, PurchaseReportEntry};

/// 採購需求計算器
#[derive(Debug, Clone, Default)]
pub struct PurchaseCalculator {
    config: PlannerConfig,
}

impl PurchaseCalculator {
    /// 創建新的計算器
    pub fn new(config: PlannerConfig) -> stock_core::Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// 比對 BOM 與庫存
    pub fn resolve(&self, catalog: &[ComponentLine], stock: &[StockItem]) -> Resolution {
        AvailabilityResolver::resolve(catalog, stock, self.config.duplicate_policy)
    }

    /// 對已比對的物料行計算採購量
    ///
    /// 純函式：相同輸入必得相同輸出。負數目標數量視為 0。
    pub fn calculate(
        &self,
        resolved: &[ResolvedLine],
        target_quantity: Decimal,
    ) -> Vec<PurchaseReportEntry> {
        let target = target_quantity.max(Decimal::ZERO);

        resolved
            .iter()
            .map(|r| {
                let line = &r.line;
                let requirement =
                    RequirementCalculator::calculate(line.quantity_per_assembly, target, r.available);
                let to_buy = LotSizingCalculator::apply(
                    requirement.shortage,
                    line.effective_lot(),
                    line.minimum_order_qty,
                );

                tracing::debug!(
                    "物料 {}: 需求 {}, 可用 {}, 缺料 {}, 採購 {}",
                    line.value,
                    requirement.required,
                    requirement.available,
                    requirement.shortage,
                    to_buy
                );

                PurchaseReportEntry {
                    value: line.value.clone(),
                    inventory_name: r.inventory_name.clone(),
                    stock_id: r.matched_stock_id.clone(),
                    description: line.description.clone(),
                    nomenclature: line.nomenclature.clone(),
                    per_board: line.quantity_per_assembly,
                    available: requirement.available,
                    required: requirement.required,
                    shortage: requirement.shortage,
                    to_buy,
                    purchase_lot: line.effective_lot(),
                    minimum_order_qty: line.minimum_order_qty,
                }
            })
            .collect()
    }

    /// 產生完整採購報表：比對 → 計算
    pub fn generate(
        &self,
        catalog: &[ComponentLine],
        stock: &[StockItem],
        target_quantity: Decimal,
    ) -> PurchaseReport {
        tracing::info!(
            "開始產生採購報表：物料 {} 筆，庫存 {} 筆，目標數量 {}",
            catalog.len(),
            stock.len(),
            target_quantity
        );

        let start_time = std::time::Instant::now();
        let target = target_quantity.max(Decimal::ZERO);

        let resolution = self.resolve(catalog, stock);

        let mut report = PurchaseReport::empty(target);
        report.entries = self.calculate(&resolution.lines, target);
        for warning in resolution.warnings {
            report.add_warning(warning);
        }
        report.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!(
            "採購報表完成：缺料 {} 筆，採購總量 {}，警告 {} 筆",
            report.shortage_count(),
            report.total_to_buy(),
            report.warnings.len()
        );

        report
    }

    /// 以表單原始數值產生報表（非有限值或負數視為 0）
    pub fn generate_from_raw(
        &self,
        catalog: &[ComponentLine],
        stock: &[StockItem],
        raw_target: f64,
    ) -> PurchaseReport {
        self.generate(catalog, stock, coerce::target_quantity(raw_target))
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use stock_core::DuplicatePolicy;

    fn line(per_board: i64, lot: u32, moq: u32) -> ComponentLine {
        ComponentLine::new("PART", Decimal::from(per_board))
            .with_purchase_lot(lot)
            .with_minimum_order_qty(moq)
    }

    fn single_entry(line: ComponentLine, available: i64, target: i64) -> PurchaseReportEntry {
        let calculator = PurchaseCalculator::default();
        let resolved = vec![ResolvedLine::with_available(line, Decimal::from(available))];
        calculator
            .calculate(&resolved, Decimal::from(target))
            .remove(0)
    }

    #[test]
    fn test_shortage_lot_for_lot() {
        let entry = single_entry(line(3, 1, 0), 10, 5);

        assert_eq!(entry.required, Decimal::from(15));
        assert_eq!(entry.shortage, Decimal::from(5));
        assert_eq!(entry.to_buy, Decimal::from(5));
    }

    #[test]
    fn test_shortage_rounded_to_lot() {
        let entry = single_entry(line(3, 1000, 0), 10, 5);
        assert_eq!(entry.to_buy, Decimal::from(1000));
    }

    #[test]
    fn test_no_purchase_without_shortage_even_with_moq() {
        let entry = single_entry(line(3, 1, 500), 50, 5);

        assert_eq!(entry.required, Decimal::from(15));
        assert_eq!(entry.shortage, Decimal::ZERO);
        assert_eq!(entry.to_buy, Decimal::ZERO);
    }

    #[test]
    fn test_negative_target_is_zero() {
        let entry = single_entry(line(3, 1, 10), 0, -5);

        assert_eq!(entry.required, Decimal::ZERO);
        assert_eq!(entry.to_buy, Decimal::ZERO);
    }

    #[test]
    fn test_generate_from_raw_non_finite_target() {
        let calculator = PurchaseCalculator::default();
        let catalog = vec![line(2, 1, 0)];

        let report = calculator.generate_from_raw(&catalog, &[], f64::NAN);
        assert_eq!(report.target_quantity, Decimal::ZERO);
        assert!(report.is_fully_stocked());
        assert_eq!(report.total_to_buy(), Decimal::ZERO);
    }

    #[test]
    fn test_huge_finite_inputs_saturate_instead_of_panicking() {
        let calculator = PurchaseCalculator::default();
        let mut big = ComponentLine::new("Bulk resin", Decimal::ONE);
        big.set_quantity_per_assembly(1e15);
        let catalog = vec![big.clone(), big.with_purchase_lot(1000)];

        let report = calculator.generate_from_raw(&catalog, &[], 1e15);

        for entry in &report.entries {
            assert_eq!(entry.required, Decimal::MAX);
            assert_eq!(entry.to_buy, Decimal::MAX);
        }
        assert_eq!(report.total_to_buy(), Decimal::MAX);

        // 超出 Decimal 範圍的目標數量不應變成 0
        let report = calculator.generate_from_raw(&[line(2, 1, 0)], &[], 1e30);
        assert_eq!(report.target_quantity, Decimal::MAX);
        assert_eq!(report.entries[0].to_buy, Decimal::MAX);
    }

    #[test]
    fn test_generate_report() {
        let calculator = PurchaseCalculator::new(PlannerConfig::default()).unwrap();
        let catalog = vec![
            ComponentLine::new("MCU", Decimal::ONE).with_code("003"),
            ComponentLine::new("Cap 100nF", Decimal::from(6)).with_purchase_lot(4000),
            ComponentLine::new("Screw", Decimal::new(2, 1)).with_minimum_order_qty(100),
        ];
        let stock = vec![
            StockItem::new("s1", "PIC12F1571-I/SN", Decimal::from(12)).with_code("003"),
            StockItem::new("s2", "cap 100nf", Decimal::from(1000)),
        ];

        let report = calculator.generate(&catalog, &stock, Decimal::from(20));

        assert_eq!(report.entries.len(), 3);
        // MCU: 需求 20，庫存 12，缺 8
        assert_eq!(report.entries[0].to_buy, Decimal::from(8));
        assert_eq!(report.entries[0].inventory_name, "PIC12F1571-I/SN");
        // Cap: 需求 120，庫存 1000，不缺
        assert_eq!(report.entries[1].to_buy, Decimal::ZERO);
        // Screw: 需求 4，無庫存，提高到最小訂購量 100
        assert_eq!(report.entries[2].required, Decimal::from(4));
        assert_eq!(report.entries[2].to_buy, Decimal::from(100));

        assert_eq!(report.shortage_count(), 2);
        assert_eq!(report.purchase_lines().count(), 2);
        assert_eq!(report.total_to_buy(), Decimal::from(108));
        assert!(!report.is_fully_stocked());
        assert!(report.calculation_time_ms.is_some());
    }

    #[test]
    fn test_generate_carries_resolver_warnings() {
        let calculator = PurchaseCalculator::new(
            PlannerConfig::default().with_duplicate_policy(DuplicatePolicy::LastWins),
        )
        .unwrap();
        let catalog = vec![ComponentLine::new("LED", Decimal::ONE)];
        let stock = vec![
            StockItem::new("a", "LED", Decimal::from(1)),
            StockItem::new("b", "led", Decimal::from(2)),
        ];

        let report = calculator.generate(&catalog, &stock, Decimal::ONE);

        assert_eq!(report.entries[0].stock_id.as_deref(), Some("b"));
        assert_eq!(report.warnings.len(), 1);
    }

    #[test]
    fn test_required_rounded_for_display_only() {
        let entry = single_entry(
            ComponentLine::new("Glue", Decimal::new(333, 3)),
            0,
            1,
        );

        assert_eq!(entry.required, Decimal::new(333, 3));
        assert_eq!(entry.required_rounded(1), Decimal::new(3, 1));
        assert_eq!(entry.to_buy, Decimal::ONE);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig::default().with_inventory_table("");
        assert!(PurchaseCalculator::new(config).is_err());
    }

    fn arb_line() -> impl Strategy<Value = ComponentLine> {
        (0i64..10_000, 1u32..5_000, 0u32..10_000).prop_map(|(per_board_hundredths, lot, moq)| {
            ComponentLine::new("P", Decimal::new(per_board_hundredths, 2))
                .with_purchase_lot(lot)
                .with_minimum_order_qty(moq)
        })
    }

    proptest! {
        #[test]
        fn prop_purchase_policy_holds(
            line in arb_line(),
            available in 0i64..100_000,
            target in 0i64..1_000,
        ) {
            let entry = single_entry(line.clone(), available, target);

            if entry.shortage <= Decimal::ZERO {
                prop_assert_eq!(entry.to_buy, Decimal::ZERO);
            } else {
                prop_assert!(entry.to_buy >= entry.shortage);
                prop_assert!(entry.to_buy >= Decimal::from(line.minimum_order_qty));
                let lot_rounded = LotSizingCalculator::round_up_to_lot(entry.shortage, line.purchase_lot);
                if lot_rounded >= Decimal::from(line.minimum_order_qty) {
                    prop_assert_eq!(entry.to_buy % Decimal::from(line.purchase_lot), Decimal::ZERO);
                } else {
                    prop_assert_eq!(entry.to_buy, Decimal::from(line.minimum_order_qty));
                }
            }
        }

        #[test]
        fn prop_required_scales_linearly(line in arb_line(), target in 0i64..1_000) {
            let calculator = PurchaseCalculator::default();
            let resolved = vec![ResolvedLine::with_available(line, Decimal::ZERO)];

            let single = calculator.calculate(&resolved, Decimal::from(target));
            let double = calculator.calculate(&resolved, Decimal::from(target * 2));

            prop_assert_eq!(double[0].required, single[0].required * Decimal::from(2));
        }

        #[test]
        fn prop_calculation_is_idempotent(
            lines in proptest::collection::vec(arb_line(), 0..20),
            available in 0i64..1_000,
            target in 0i64..500,
        ) {
            let calculator = PurchaseCalculator::default();
            let resolved: Vec<_> = lines
                .into_iter()
                .map(|l| ResolvedLine::with_available(l, Decimal::from(available)))
                .collect();

            let first = calculator.calculate(&resolved, Decimal::from(target));
            let second = calculator.calculate(&resolved, Decimal::from(target));

            prop_assert_eq!(first, second);
        }
    }
}
