//! 銷售訂單來源

use mfg_core::{MfgError, SaleOrder};

/// 可分頁讀取的銷售訂單來源
pub trait SaleOrderSource {
    /// 訂單總數
    fn count(&self) -> mfg_core::Result<usize>;

    /// 讀取一頁（`offset` 起最多 `limit` 筆），回傳的訂單由呼叫端擁有
    fn fetch_page(&self, offset: usize, limit: usize) -> mfg_core::Result<Vec<SaleOrder>>;
}

/// 記憶體中的訂單來源
#[derive(Debug, Clone, Default)]
pub struct InMemorySaleOrders {
    orders: Vec<SaleOrder>,
}

impl InMemorySaleOrders {
    pub fn new(orders: Vec<SaleOrder>) -> Self {
        Self { orders }
    }

    pub fn push(&mut self, order: SaleOrder) {
        self.orders.push(order);
    }
}

impl SaleOrderSource for InMemorySaleOrders {
    fn count(&self) -> mfg_core::Result<usize> {
        Ok(self.orders.len())
    }

    fn fetch_page(&self, offset: usize, limit: usize) -> mfg_core::Result<Vec<SaleOrder>> {
        if limit == 0 {
            return Err(MfgError::Validation("每頁筆數必須大於 0".to_string()));
        }
        Ok(self
            .orders
            .iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
