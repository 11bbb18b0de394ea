//! 分頁批次範例：多幣別銷售彙總與批次產生生產訂單

use chrono::{NaiveDate, TimeZone, Utc};
use mfg::calc::{ProductionOrderGenerator, SaleOrderWorkflow};
use mfg::model::*;
use mfg::{CurrencyRates, InMemorySaleOrders, ProductionBatch, SalesAggregator};
use rust_decimal::Decimal;

fn main() -> anyhow::Result<()> {
    mfg::init_tracing();

    let config = ProductionConfig::from_json_str(r#"{ "batch_page_size": 2 }"#)?;
    let calendar = WorkCalendar::fallback_calendar();
    let master = MasterData::new()
        .with_products([Product::new("TABLE", "Oak table", "pc")
            .with_default_bom("BOM-TABLE")
            .with_prices(Decimal::from(90), Decimal::from(250))])
        .with_boms([
            BillOfMaterial::new("BOM-TABLE", "TABLE", "pc")
                .with_process(ProdProcess::new("PROC-JOIN", "Joinery", 2))
                .with_children(["BOM-LEG"]),
            BillOfMaterial::new("BOM-LEG", "LEG", "pc")
                .with_qty(Decimal::from(4))
                .with_process(ProdProcess::new("PROC-TURN", "Turning", 1))
                .as_sub_bom(),
        ]);

    // 建立並確認多張不同幣別的訂單
    let workflow = SaleOrderWorkflow::new(&master, &calendar, &config);
    let confirmed_at = Utc.with_ymd_and_hms(2025, 11, 3, 8, 0, 0).unwrap();
    let mut source = InMemorySaleOrders::default();
    for (i, currency) in ["EUR", "USD", "GBP", "EUR", "USD"].iter().enumerate() {
        let mut order = SaleOrder::new(format!("SO-{:03}", i + 1), "Furniture Co", *currency)
            .with_company_currency("EUR")
            .with_line(
                SaleOrderLine::new("TABLE", Decimal::from(i as i64 + 1), "pc", Decimal::from(250))
                    .produced(),
            );
        workflow.confirm(&mut order, confirmed_at)?;
        source.push(order);
    }

    let rates = CurrencyRates::new()
        .with_rate("USD", "EUR", "0.92".parse()?)
        .with_rate("GBP", "EUR", "1.17".parse()?);

    let total = SalesAggregator::converted_total(&source, &rates, "EUR", &config)?;
    println!("Total confirmed sales: {} EUR", total.round_dp(2));
    if let Some((currency, total)) = SalesAggregator::company_total(&source, &rates, &config)? {
        println!("Total in company currency: {} {}", total.round_dp(2), currency);
    }

    let generator = ProductionOrderGenerator::new(&master, &calendar, &config);
    let start = NaiveDate::from_ymd_opt(2025, 11, 10)
        .unwrap()
        .and_hms_opt(7, 0, 0)
        .unwrap();
    let outcome = ProductionBatch::new(&generator).run(&source, start)?;

    println!(
        "Batch: {} done, {} anomalies, {} production orders",
        outcome.done,
        outcome.anomalies,
        outcome.production_orders.len()
    );
    for production_order in &outcome.production_orders {
        println!(
            "  {} → {} tables, {} legs",
            production_order.sale_order_ref,
            production_order.total_qty_for("TABLE"),
            production_order.total_qty_for("LEG")
        );
    }

    Ok(())
}
