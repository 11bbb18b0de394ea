//! 腳踏車銷售訂單完整範例
//!
//! 展示從銷售訂單確認到 BOM 展開產生製令的流程

use chrono::{TimeZone, Utc};
use mfg::calc::SaleOrderWorkflow;
use mfg::model::*;
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    mfg::init_tracing();

    println!("===== Bike Sale Order Example =====\n");

    // 步驟 1: 工廠日曆（週一到週五）
    println!("[1] Create Factory Calendar");
    let calendar = WorkCalendar::new("FACTORY-A");
    println!("    Calendar: Mon-Fri\n");

    // 步驟 2: 主檔
    println!("[2] Load Master Data");
    let master = create_bike_master();
    println!("    Products: {}", master.product_count());
    println!("    BOMs: {}\n", master.bom_count());

    // 步驟 3: 生產配置
    println!("[3] Configure Production");
    let config = ProductionConfig::new()
        .with_one_production_order_per_sale_order(true)
        .with_auto_plan(true);
    config.validate()?;
    println!("    One production order per sale order, auto plan\n");

    // 步驟 4: 銷售訂單
    println!("[4] Create Sale Order");
    let mut order = SaleOrder::new("SO-001", "City Cycles", "EUR")
        .with_line(
            SaleOrderLine::new("BIKE-001", Decimal::from(25), "pc", Decimal::from(420))
                .with_tax_rate("0.2".parse()?)
                .produced(),
        )
        .with_line(SaleOrderLine::new("HELMET-001", Decimal::from(25), "pc", Decimal::from(30)));
    println!("    SO-001: 25 bikes (produce), 25 helmets (from stock)\n");

    // 步驟 5: 確認訂單
    println!("[5] Confirm Sale Order");
    let workflow = SaleOrderWorkflow::new(&master, &calendar, &config);
    let confirmed_at = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
    let outcome = workflow.confirm(&mut order, confirmed_at)?;

    println!("    Status: {:?}", order.status);
    println!("    Ex-tax total: {} {}", order.ex_tax_total, order.currency);
    println!("    In-tax total: {} {}", order.in_tax_total, order.currency);
    println!("    Margin: {} ({}%)\n", order.margin, order.margin_rate);

    // 步驟 6: 結果
    println!("[6] Manufacturing Orders");
    for production_order in &outcome.production_orders {
        println!("    Production order {}", production_order.id);
        for mo in &production_order.manuf_orders {
            println!(
                "      - L{} {} | BOM: {} | Qty: {} {} | {} → {}",
                mo.depth,
                mo.product_id,
                mo.bom_id,
                mo.qty,
                mo.unit,
                mo.planned_start.date(),
                mo.planned_end.date()
            );
        }
    }

    println!("\n===== Complete =====\n");

    Ok(())
}

/// 建立腳踏車主檔
fn create_bike_master() -> MasterData {
    MasterData::new()
        .with_products([
            Product::new("BIKE-001", "City bike", "pc")
                .with_default_bom("BOM-BIKE")
                .with_prices(Decimal::from(180), Decimal::from(420)),
            Product::new("HELMET-001", "Helmet", "pc")
                .with_prices(Decimal::from(12), Decimal::from(30)),
        ])
        .with_boms([
            // BIKE = 1 FRAME + 2 WHEEL
            BillOfMaterial::new("BOM-BIKE", "BIKE-001", "pc")
                .with_name("City bike assembly")
                .with_process(ProdProcess::new("PROC-ASSY", "Final assembly", 2))
                .with_children(["BOM-FRAME", "BOM-WHEEL"]),
            BillOfMaterial::new("BOM-FRAME", "FRAME-001", "pc")
                .with_process(ProdProcess::new("PROC-WELD", "Welding", 3))
                .as_sub_bom(),
            BillOfMaterial::new("BOM-WHEEL", "WHEEL-001", "pc")
                .with_qty(Decimal::from(2))
                .with_process(ProdProcess::new("PROC-LACE", "Wheel lacing", 1))
                .as_sub_bom(),
        ])
}
