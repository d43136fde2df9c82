//! BOM 物料行模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::coerce;

/// BOM 物料行（一個成品需要的某個零件）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentLine {
    /// 顯示值（優先比對鍵）
    pub value: String,

    /// 庫存名稱
    #[serde(default)]
    pub inventory_name: Option<String>,

    /// 庫存代碼
    #[serde(default)]
    pub code: Option<String>,

    /// 舊版代碼
    #[serde(default)]
    pub legacy_code: Option<String>,

    /// 舊版名稱別名
    #[serde(default)]
    pub legacy_names: Vec<String>,

    /// 每個成品的用量（可為小數，例如共用五金 0.2）
    #[serde(default, deserialize_with = "coerce::de_quantity_per_assembly")]
    pub quantity_per_assembly: Decimal,

    /// 描述
    #[serde(default)]
    pub description: String,

    /// 料號/規格名稱
    #[serde(default)]
    pub nomenclature: String,

    /// 採購批量（必須是此倍數）
    #[serde(
        default = "default_purchase_lot",
        deserialize_with = "coerce::de_purchase_lot"
    )]
    pub purchase_lot: u32,

    /// 最小訂購量
    #[serde(default, deserialize_with = "coerce::de_minimum_order_qty")]
    pub minimum_order_qty: u32,
}

fn default_purchase_lot() -> u32 {
    1
}

impl ComponentLine {
    /// 創建新的物料行
    pub fn new(value: impl Into<String>, quantity_per_assembly: Decimal) -> Self {
        Self {
            value: value.into(),
            inventory_name: None,
            code: None,
            legacy_code: None,
            legacy_names: Vec::new(),
            quantity_per_assembly: quantity_per_assembly.max(Decimal::ZERO),
            description: String::new(),
            nomenclature: String::new(),
            purchase_lot: 1,
            minimum_order_qty: 0,
        }
    }

    /// 建構器模式：設置庫存名稱
    pub fn with_inventory_name(mut self, name: impl Into<String>) -> Self {
        self.inventory_name = Some(name.into());
        self
    }

    /// 建構器模式：設置庫存代碼
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// 建構器模式：設置舊版代碼
    pub fn with_legacy_code(mut self, code: impl Into<String>) -> Self {
        self.legacy_code = Some(code.into());
        self
    }

    /// 建構器模式：添加舊版名稱
    pub fn with_legacy_name(mut self, name: impl Into<String>) -> Self {
        self.legacy_names.push(name.into());
        self
    }

    /// 建構器模式：設置描述
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// 建構器模式：設置料號
    pub fn with_nomenclature(mut self, nomenclature: impl Into<String>) -> Self {
        self.nomenclature = nomenclature.into();
        self
    }

    /// 建構器模式：設置採購批量（0 視為 1）
    pub fn with_purchase_lot(mut self, lot: u32) -> Self {
        self.purchase_lot = lot.max(1);
        self
    }

    /// 建構器模式：設置最小訂購量
    pub fn with_minimum_order_qty(mut self, qty: u32) -> Self {
        self.minimum_order_qty = qty;
        self
    }

    /// 依優先順序列出比對鍵：顯示值、庫存名稱、代碼、舊版代碼、舊版名稱
    ///
    /// 空白鍵會被略過，順序即為比對優先順序。
    pub fn candidate_keys(&self) -> Vec<&str> {
        let ordered = [
            Some(self.value.as_str()),
            self.inventory_name.as_deref(),
            self.code.as_deref(),
            self.legacy_code.as_deref(),
        ];

        ordered
            .into_iter()
            .flatten()
            .chain(self.legacy_names.iter().map(String::as_str))
            .filter(|key| !key.trim().is_empty())
            .collect()
    }

    /// 實際使用的採購批量（小於 1 時以 1 計）
    pub fn effective_lot(&self) -> u32 {
        self.purchase_lot.max(1)
    }

    /// 修改顯示值
    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    /// 修改單位用量（來自表單的原始數值，經容錯轉換）
    pub fn set_quantity_per_assembly(&mut self, raw: f64) {
        self.quantity_per_assembly = coerce::quantity_per_assembly(raw);
    }

    /// 修改料號
    pub fn set_nomenclature(&mut self, nomenclature: impl Into<String>) {
        self.nomenclature = nomenclature.into();
    }

    /// 以原始表單數值設置批量與最小訂購量
    pub fn set_purchase_policy(&mut self, raw_lot: f64, raw_moq: f64) {
        self.purchase_lot = coerce::purchase_lot(raw_lot);
        self.minimum_order_qty = coerce::minimum_order_qty(raw_moq);
    }
}

/// 工作中的 BOM 清單
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    /// 專案/範本名稱
    pub name: String,

    /// 物料行
    pub lines: Vec<ComponentLine>,
}

impl Catalog {
    /// 創建空的清單
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            lines: Vec::new(),
        }
    }

    /// 建構器模式：添加物料行
    pub fn with_line(mut self, line: ComponentLine) -> Self {
        self.lines.push(line);
        self
    }

    /// 添加物料行
    pub fn push(&mut self, line: ComponentLine) {
        self.lines.push(line);
    }

    /// 從工作清單移除物料行（不影響已產生的報表）
    pub fn remove_line(&mut self, index: usize) -> Option<ComponentLine> {
        if index < self.lines.len() {
            Some(self.lines.remove(index))
        } else {
            None
        }
    }

    /// 取得可修改的物料行
    pub fn line_mut(&mut self, index: usize) -> Option<&mut ComponentLine> {
        self.lines.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_create_component_line() {
        let line = ComponentLine::new("10k 0603", Decimal::from(3));

        assert_eq!(line.value, "10k 0603");
        assert_eq!(line.quantity_per_assembly, Decimal::from(3));
        assert_eq!(line.purchase_lot, 1);
        assert_eq!(line.minimum_order_qty, 0);
    }

    #[test]
    fn test_candidate_keys_order() {
        let line = ComponentLine::new("Old Name", Decimal::ONE)
            .with_inventory_name("PIC12F1571-I/SN")
            .with_code("003")
            .with_legacy_code("  ")
            .with_legacy_name("PIC12F1571")
            .with_legacy_name("");

        assert_eq!(
            line.candidate_keys(),
            vec!["Old Name", "PIC12F1571-I/SN", "003", "PIC12F1571"]
        );
    }

    #[test]
    fn test_purchase_lot_zero_becomes_one() {
        let line = ComponentLine::new("C1", Decimal::ONE).with_purchase_lot(0);
        assert_eq!(line.purchase_lot, 1);
        assert_eq!(line.effective_lot(), 1);
    }

    #[test]
    fn test_edit_in_place() {
        let mut line = ComponentLine::new("R1", Decimal::ONE);
        line.set_value("R1 1k");
        line.set_quantity_per_assembly(f64::NAN);
        line.set_nomenclature("RES-1K-0603");
        line.set_purchase_policy(-5.0, 250.9);

        assert_eq!(line.value, "R1 1k");
        assert_eq!(line.quantity_per_assembly, Decimal::ZERO);
        assert_eq!(line.nomenclature, "RES-1K-0603");
        assert_eq!(line.purchase_lot, 1);
        assert_eq!(line.minimum_order_qty, 250);
    }

    #[test]
    fn test_lenient_deserialize() {
        let line: ComponentLine = serde_json::from_value(json!({
            "value": "Screw M3",
            "quantity_per_assembly": "0.2",
            "purchase_lot": "abc",
            "minimum_order_qty": -7
        }))
        .unwrap();

        assert_eq!(line.quantity_per_assembly, Decimal::new(2, 1));
        assert_eq!(line.purchase_lot, 1);
        assert_eq!(line.minimum_order_qty, 0);

        let defaults: ComponentLine = serde_json::from_value(json!({ "value": "LED" })).unwrap();
        assert_eq!(defaults.purchase_lot, 1);
        assert_eq!(defaults.quantity_per_assembly, Decimal::ZERO);
    }

    #[test]
    fn test_catalog_remove_line() {
        let mut catalog = Catalog::new("Controller v2")
            .with_line(ComponentLine::new("U1", Decimal::ONE))
            .with_line(ComponentLine::new("U2", Decimal::ONE));

        let removed = catalog.remove_line(0).unwrap();
        assert_eq!(removed.value, "U1");
        assert_eq!(catalog.len(), 1);
        assert!(catalog.remove_line(5).is_none());
    }
}
