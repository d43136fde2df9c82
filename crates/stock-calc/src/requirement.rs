//! 總需求與缺料計算

use rust_decimal::Decimal;

/// 需求計算結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    /// 總需求
    pub required: Decimal,
    /// 可用庫存
    pub available: Decimal,
    /// 缺料
    pub shortage: Decimal,
}

impl Requirement {
    /// 是否缺料
    pub fn has_shortage(&self) -> bool {
        self.shortage > Decimal::ZERO
    }
}

/// 需求計算器
pub struct RequirementCalculator;

impl RequirementCalculator {
    /// 計算總需求與缺料
    ///
    /// 總需求 = 單位用量 × 目標數量，保留小數；
    /// 缺料 = max(0, 總需求 - 可用庫存)。負數輸入一律視為 0。
    /// 乘積超出 Decimal 範圍時取 `Decimal::MAX`。
    pub fn calculate(
        quantity_per_assembly: Decimal,
        target_quantity: Decimal,
        available: Decimal,
    ) -> Requirement {
        let per_assembly = quantity_per_assembly.max(Decimal::ZERO);
        let target = target_quantity.max(Decimal::ZERO);
        let available = available.max(Decimal::ZERO);

        let required = per_assembly
            .checked_mul(target)
            .unwrap_or(Decimal::MAX);
        let shortage = if required > available {
            required - available
        } else {
            Decimal::ZERO
        };

        Requirement {
            required,
            available,
            shortage,
        }
    }
}
