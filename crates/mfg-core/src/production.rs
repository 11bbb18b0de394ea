//! 製令與生產訂單模型

use chrono::{DateTime, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 製令狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ManufOrderStatus {
    /// 草稿
    Draft,
    /// 已排程
    Planned,
}

/// 製令來源追溯（銷售訂單 / 訂單行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManufOrderOrigin {
    pub sale_order_id: Uuid,
    pub sale_order_ref: String,
    pub sale_order_line_id: Option<Uuid>,
}

impl ManufOrderOrigin {
    pub fn new(sale_order_id: Uuid, sale_order_ref: impl Into<String>) -> Self {
        Self {
            sale_order_id,
            sale_order_ref: sale_order_ref.into(),
            sale_order_line_id: None,
        }
    }

    /// 建構器模式：設置來源訂單行
    pub fn with_line(mut self, line_id: Uuid) -> Self {
        self.sale_order_line_id = Some(line_id);
        self
    }
}

/// 製令（BOM 展開的結果）
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManufacturingOrder {
    /// 製令ID
    pub id: Uuid,

    /// 生產產品
    pub product_id: String,

    /// 使用的 BOM
    pub bom_id: String,

    /// 生產製程
    pub prod_process_id: String,

    /// 生產數量
    pub qty: Decimal,

    /// 單位
    pub unit: String,

    /// 展開層級（根 = 0）
    pub depth: u32,

    /// 計劃開工時間
    pub planned_start: NaiveDateTime,

    /// 計劃完工時間
    pub planned_end: NaiveDateTime,

    /// 來源追溯
    pub origin: ManufOrderOrigin,

    /// 狀態
    pub status: ManufOrderStatus,
}

impl ManufacturingOrder {
    /// 創建新的草稿製令
    pub fn new(
        product_id: String,
        bom_id: String,
        prod_process_id: String,
        qty: Decimal,
        unit: String,
        planned_start: NaiveDateTime,
        origin: ManufOrderOrigin,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id,
            bom_id,
            prod_process_id,
            qty,
            unit,
            depth: 0,
            planned_start,
            planned_end: planned_start,
            origin,
            status: ManufOrderStatus::Draft,
        }
    }

    /// 建構器模式：設置展開層級
    pub fn with_depth(mut self, depth: u32) -> Self {
        self.depth = depth;
        self
    }

    /// 建構器模式：設置計劃完工時間
    pub fn with_planned_end(mut self, planned_end: NaiveDateTime) -> Self {
        self.planned_end = planned_end;
        self
    }

    /// 排程
    pub fn plan(&mut self) {
        self.status = ManufOrderStatus::Planned;
    }

    /// 計劃工期（天數）
    pub fn duration_days(&self) -> i64 {
        (self.planned_end - self.planned_start).num_days()
    }

    pub fn is_root(&self) -> bool {
        self.depth == 0
    }
}

/// 生產訂單：彙總同一銷售訂單（或訂單行）產生的製令
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionOrder {
    pub id: Uuid,
    pub sale_order_id: Uuid,
    pub sale_order_ref: String,
    pub manuf_orders: Vec<ManufacturingOrder>,
    pub created_at: DateTime<Utc>,
}

impl ProductionOrder {
    pub fn new(sale_order_id: Uuid, sale_order_ref: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            sale_order_id,
            sale_order_ref: sale_order_ref.into(),
            manuf_orders: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// 加入一批製令
    pub fn push_all(&mut self, manuf_orders: impl IntoIterator<Item = ManufacturingOrder>) {
        self.manuf_orders.extend(manuf_orders);
    }

    pub fn manuf_order_count(&self) -> usize {
        self.manuf_orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.manuf_orders.is_empty()
    }

    /// 某產品的製令總數量
    pub fn total_qty_for(&self, product_id: &str) -> Decimal {
        self.manuf_orders
            .iter()
            .filter(|mo| mo.product_id == product_id)
            .map(|mo| mo.qty)
            .sum()
    }
}
