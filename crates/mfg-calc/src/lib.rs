//! # MFG Calculation
//!
//! BOM 展開、單位換算與銷售訂單轉生產訂單

pub mod bom_resolver;
pub mod explosion;
pub mod production_order;
pub mod unit_conversion;
pub mod workflow;

// Re-export 主要類型
pub use bom_resolver::BomResolver;
pub use explosion::BomExplosion;
pub use production_order::ProductionOrderGenerator;
pub use unit_conversion::UnitConverter;
pub use workflow::{ConfirmationOutcome, SaleOrderWorkflow};

use serde::Serialize;

/// BOM 展開結果
#[derive(Debug, Clone, Serialize)]
pub struct ExplosionOutcome {
    /// 產生的製令（依層級順序）
    pub manuf_orders: Vec<mfg_core::ManufacturingOrder>,

    /// 實際展開的層數
    pub depth_reached: u32,

    /// 沒有製程而略過的 BOM
    pub skipped_boms: Vec<String>,
}

impl ExplosionOutcome {
    /// 創建空的展開結果
    pub fn empty() -> Self {
        Self {
            manuf_orders: Vec::new(),
            depth_reached: 0,
            skipped_boms: Vec::new(),
        }
    }

    pub fn manuf_order_count(&self) -> usize {
        self.manuf_orders.len()
    }

    /// 某 BOM 對應的製令
    pub fn orders_for_bom<'a>(
        &'a self,
        bom_id: &'a str,
    ) -> impl Iterator<Item = &'a mfg_core::ManufacturingOrder> + 'a {
        self.manuf_orders.iter().filter(move |mo| mo.bom_id == bom_id)
    }
}
