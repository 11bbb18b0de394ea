//! # MFG Batch
//!
//! 分頁批次處理：逐頁讀取訂單、處理後釋放，再讀下一頁

pub mod currency;
pub mod production;
pub mod sales;
pub mod source;

// Re-export 主要類型
pub use currency::CurrencyRates;
pub use production::{BatchOutcome, ProductionBatch};
pub use sales::SalesAggregator;
pub use source::{InMemorySaleOrders, SaleOrderSource};
