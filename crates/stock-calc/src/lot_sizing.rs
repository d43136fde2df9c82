//! 採購批量規則

use rust_decimal::Decimal;

/// 批量規則計算器
pub struct LotSizingCalculator;

impl LotSizingCalculator {
    /// 由缺料數量計算採購數量
    ///
    /// 1. 缺料 <= 0 時不採購（即使設定了最小訂購量）
    /// 2. 缺料向上取整到批量倍數
    /// 3. 若結果低於最小訂購量，提高到最小訂購量，不再重新取整
    pub fn apply(shortage: Decimal, purchase_lot: u32, minimum_order_qty: u32) -> Decimal {
        if shortage <= Decimal::ZERO {
            return Decimal::ZERO;
        }

        let lot_rounded = Self::round_up_to_lot(shortage, purchase_lot);

        let moq = Decimal::from(minimum_order_qty);
        if minimum_order_qty > 0 && lot_rounded < moq {
            moq
        } else {
            lot_rounded
        }
    }

    /// 向上取整到批量倍數（批量小於 1 時以 1 計）
    ///
    /// 超出 Decimal 範圍時取 `Decimal::MAX`
    pub fn round_up_to_lot(quantity: Decimal, purchase_lot: u32) -> Decimal {
        let lot = Decimal::from(purchase_lot.max(1));
        (quantity / lot)
            .ceil()
            .checked_mul(lot)
            .unwrap_or(Decimal::MAX)
    }
}
