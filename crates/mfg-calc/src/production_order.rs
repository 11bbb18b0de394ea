//! 銷售訂單產生生產訂單

use chrono::NaiveDateTime;
use mfg_core::{
    ManufOrderOrigin, ManufacturingOrder, MasterData, ProductionConfig, ProductionOrder, SaleOrder,
    SaleOrderLine, WorkCalendar,
};

use crate::{BomExplosion, BomResolver, UnitConverter};

/// 生產訂單產生器
pub struct ProductionOrderGenerator<'a> {
    master: &'a MasterData,
    calendar: &'a WorkCalendar,
    config: &'a ProductionConfig,
}

impl<'a> ProductionOrderGenerator<'a> {
    /// 創建新的產生器
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

    /// 使用中的生產配置
    pub fn config(&self) -> &'a ProductionConfig {
        self.config
    }

    /// 為銷售訂單中需要生產的訂單行產生生產訂單
    ///
    /// 任一訂單行失敗即回傳錯誤，不會回傳部分結果。
    pub fn generate(
        &self,
        order: &SaleOrder,
        start: NaiveDateTime,
    ) -> mfg_core::Result<Vec<ProductionOrder>> {
        self.config.validate()?;

        tracing::info!(
            "開始產生生產訂單：{}，訂單行 {} 筆",
            order.reference,
            order.lines.len()
        );

        let mut production_orders = Vec::new();
        let mut shared: Option<ProductionOrder> = None;

        for line in order.produced_lines() {
            let manuf_orders = self.generate_for_line(order, line, start)?;
            if manuf_orders.is_empty() {
                tracing::debug!("訂單行 {} 沒有產生製令", line.sequence);
                continue;
            }

            if self.config.one_production_order_per_sale_order {
                shared
                    .get_or_insert_with(|| ProductionOrder::new(order.id, order.reference.clone()))
                    .push_all(manuf_orders);
            } else {
                let mut production_order = ProductionOrder::new(order.id, order.reference.clone());
                production_order.push_all(manuf_orders);
                production_orders.push(production_order);
            }
        }

        production_orders.extend(shared);

        tracing::info!(
            "訂單 {} 產生生產訂單 {} 張",
            order.reference,
            production_orders.len()
        );

        Ok(production_orders)
    }

    /// 為單一訂單行產生製令
    ///
    /// 非庫存產品不生產，回傳空集合。根製令以產品庫存單位記錄數量。
    pub fn generate_for_line(
        &self,
        order: &SaleOrder,
        line: &SaleOrderLine,
        start: NaiveDateTime,
    ) -> mfg_core::Result<Vec<ManufacturingOrder>> {
        self.config.validate()?;

        let product = self.master.product(&line.product_id)?;
        if !product.is_storable() {
            tracing::debug!("產品 {} 不是庫存產品，不生產", product.id);
            return Ok(Vec::new());
        }

        let bom = BomResolver::resolve(self.master, line, product)?;

        let qty = UnitConverter::convert(
            self.master,
            &line.unit,
            &product.unit,
            line.qty,
            self.config.qty_scale,
        )?;

        let origin = ManufOrderOrigin::new(order.id, order.reference.clone()).with_line(line.id);

        let mut outcome = BomExplosion::new(self.master, self.calendar, self.config)
            .explode(bom, qty, start, &origin)?;

        for manuf_order in outcome.manuf_orders.iter_mut().filter(|mo| mo.is_root()) {
            manuf_order.unit = product.unit.clone();
        }

        Ok(outcome.manuf_orders)
    }
}
