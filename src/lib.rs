//! # MFG
//!
//! 銷售訂單轉生產：BOM 展開產生製令、生產訂單彙總、分頁批次處理

pub use mfg_batch as batch;
pub use mfg_calc as calc;
pub use mfg_core as model;

pub use mfg_batch::{BatchOutcome, CurrencyRates, InMemorySaleOrders, ProductionBatch, SalesAggregator};
pub use mfg_calc::{BomExplosion, ExplosionOutcome, ProductionOrderGenerator, SaleOrderWorkflow};
pub use mfg_core::{MfgError, ProductionConfig, Result};

use tracing_subscriber::EnvFilter;

/// 初始化日誌（可透過 RUST_LOG 調整等級，預設 info）
///
/// 可重複呼叫，之後的呼叫不會有作用。
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
