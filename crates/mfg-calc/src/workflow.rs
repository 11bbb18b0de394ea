//! 銷售訂單流程：儲存、確認並產生生產訂單

use chrono::{DateTime, Utc};
use mfg_core::{MasterData, MfgError, ProductionConfig, ProductionOrder, SaleOrder, WorkCalendar};
use serde::Serialize;
use uuid::Uuid;

use crate::ProductionOrderGenerator;

/// 確認結果
#[derive(Debug, Clone, Serialize)]
pub struct ConfirmationOutcome {
    pub sale_order_id: Uuid,
    pub production_orders: Vec<ProductionOrder>,
}

impl ConfirmationOutcome {
    pub fn manuf_order_count(&self) -> usize {
        self.production_orders
            .iter()
            .map(ProductionOrder::manuf_order_count)
            .sum()
    }
}

/// 銷售訂單流程
pub struct SaleOrderWorkflow<'a> {
    master: &'a MasterData,
    calendar: &'a WorkCalendar,
    config: &'a ProductionConfig,
}

impl<'a> SaleOrderWorkflow<'a> {
    pub fn new(
        master: &'a MasterData,
        calendar: &'a WorkCalendar,
        config: &'a ProductionConfig,
    ) -> Self {
        Self {
            master,
            calendar,
            config,
        }
    }

    /// 儲存前重新計算金額與毛利
    pub fn save(&self, order: &mut SaleOrder) -> mfg_core::Result<()> {
        if !order.is_modifiable() {
            return Err(MfgError::Validation(format!(
                "訂單 {} 已非草稿，不可修改",
                order.reference
            )));
        }
        order.compute_totals(self.master)
    }

    /// 確認訂單並產生生產訂單
    ///
    /// 在副本上完成計算、狀態轉換與生產訂單產生，全部成功後才寫回；
    /// 失敗時原訂單保持不變。
    pub fn confirm(
        &self,
        order: &mut SaleOrder,
        at: DateTime<Utc>,
    ) -> mfg_core::Result<ConfirmationOutcome> {
        let mut staged = order.clone();
        staged.compute_totals(self.master)?;
        staged.confirm(at)?;

        let production_orders = ProductionOrderGenerator::new(self.master, self.calendar, self.config)
            .generate(&staged, at.naive_utc())?;

        *order = staged;

        tracing::info!(
            "訂單 {} 已確認，金額 {}，毛利率 {}%",
            order.reference,
            order.ex_tax_total,
            order.margin_rate
        );

        Ok(ConfirmationOutcome {
            sale_order_id: order.id,
            production_orders,
        })
    }
}
