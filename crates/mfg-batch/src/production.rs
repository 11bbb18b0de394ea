//! 批次產生生產訂單

use chrono::NaiveDateTime;
use mfg_calc::ProductionOrderGenerator;
use mfg_core::{MfgError, ProductionOrder, SaleOrderStatus};
use uuid::Uuid;

use crate::SaleOrderSource;

/// 批次結果
#[derive(Debug, Clone, Default)]
pub struct BatchOutcome {
    /// 成功處理的訂單數
    pub done: usize,

    /// 失敗的訂單數
    pub anomalies: usize,

    /// 失敗訂單與錯誤
    pub errors: Vec<(Uuid, MfgError)>,

    /// 產生的生產訂單
    pub production_orders: Vec<ProductionOrder>,
}

impl BatchOutcome {
    pub fn is_clean(&self) -> bool {
        self.anomalies == 0
    }
}

/// 生產訂單批次
///
/// 一次處理一張訂單；單張失敗只記為異常，不中斷整批。
/// 每頁筆數取自產生器配置的 `batch_page_size`。
pub struct ProductionBatch<'a> {
    generator: &'a ProductionOrderGenerator<'a>,
}

impl<'a> ProductionBatch<'a> {
    pub fn new(generator: &'a ProductionOrderGenerator<'a>) -> Self {
        Self { generator }
    }

    /// 為來源中所有已確認訂單產生生產訂單
    pub fn run<S: SaleOrderSource + ?Sized>(
        &self,
        source: &S,
        start: NaiveDateTime,
    ) -> mfg_core::Result<BatchOutcome> {
        let config = self.generator.config();
        config.validate()?;
        let page_size = config.batch_page_size as usize;

        tracing::info!(
            "開始生產批次：訂單 {} 筆，每頁 {} 筆",
            source.count()?,
            page_size
        );

        let mut outcome = BatchOutcome::default();
        let mut offset = 0;

        loop {
            let page = source.fetch_page(offset, page_size)?;
            if page.is_empty() {
                break;
            }
            let fetched = page.len();

            for order in page {
                if order.status != SaleOrderStatus::Confirmed {
                    continue;
                }

                match self.generator.generate(&order, start) {
                    Ok(production_orders) => {
                        outcome.production_orders.extend(production_orders);
                        outcome.done += 1;
                    }
                    Err(e) => {
                        tracing::warn!("訂單 {} 產生生產訂單失敗: {}", order.reference, e);
                        outcome.errors.push((order.id, e));
                        outcome.anomalies += 1;
                    }
                }
            }

            offset += fetched;
            if fetched < page_size {
                break;
            }
        }

        tracing::info!(
            "生產批次完成：成功 {}，異常 {}",
            outcome.done,
            outcome.anomalies
        );

        Ok(outcome)
    }
}
