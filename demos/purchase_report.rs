//! 採購報表示範
//!
//! 執行：`RUST_LOG=debug cargo run --example purchase_report`

use rust_decimal::Decimal;
use serde_json::json;
use std::sync::Arc;
use stockplan::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 欄位混用：quantidade 已改名為 quantity
    let seed = json!([
        { "id": "1", "codigo": "003", "nome": "PIC12F1571-I/SN", "quantity": 12 },
        { "id": "2", "codigo": "010", "nome": "Resistor 10k 0603", "quantity": 4000 },
        { "id": "3", "codigo": "021", "nome": "Capacitor 100nF 0603", "quantity": 150 }
    ]);
    let rows = seed
        .as_array()
        .map(|rows| rows.iter().filter_map(|r| r.as_object().cloned()).collect())
        .unwrap_or_default();
    let store = Arc::new(
        MemoryStore::new()
            .with_table("itens", &["codigo", "nome", "descricao", "quantity"])
            .with_rows("itens", rows),
    );

    let config = PlannerConfig::default();
    let mut adapter = InventoryAdapter::new(Arc::clone(&store), &config);

    // 寫入時自動改用 quantity 欄位
    adapter
        .insert(
            &StockPatch::new()
                .with_code("030")
                .with_name("LED Red 0805")
                .with_quantity(Decimal::from(25)),
        )
        .await?;

    let stock = adapter.list().await?;
    println!("庫存品項：{}（欄位對照：{:?}）", stock.len(), adapter.mapping());

    let catalog = Catalog::new("Sensor board rev B")
        .with_line(ComponentLine::new("MCU", Decimal::ONE).with_code("003"))
        .with_line(
            ComponentLine::new("R1-R8", Decimal::from(8))
                .with_inventory_name("Resistor 10k 0603")
                .with_purchase_lot(5000),
        )
        .with_line(
            ComponentLine::new("C1-C4", Decimal::from(4))
                .with_inventory_name("Capacitor 100nF 0603")
                .with_purchase_lot(4000),
        )
        .with_line(ComponentLine::new("LED Red 0805", Decimal::from(2)).with_minimum_order_qty(100))
        .with_line(ComponentLine::new("Header 1x6", Decimal::ONE).with_minimum_order_qty(50));

    let calculator = PurchaseCalculator::new(config)?;
    let report = calculator.generate(&catalog.lines, &stock, Decimal::from(40));

    println!(
        "\n{:<22} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "物料", "用量", "庫存", "需求", "缺料", "採購"
    );
    for entry in &report.entries {
        println!(
            "{:<22} {:>8} {:>8} {:>8} {:>8} {:>8}",
            entry.inventory_name,
            entry.per_board,
            entry.available,
            entry.required_rounded(2),
            entry.shortage,
            entry.to_buy
        );
    }
    println!(
        "\n缺料 {} 項，採購總數 {}",
        report.shortage_count(),
        report.total_to_buy()
    );

    for group in find_duplicate_stock(&stock) {
        println!("重複品項：{:?}", group.stock_ids);
    }

    println!("\n{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
