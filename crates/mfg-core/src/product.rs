//! 產品與單位模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 產品類型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductType {
    /// 可庫存
    Storable,
    /// 服務（不生產、不入庫）
    Service,
}

/// 產品
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// 產品ID
    pub id: String,

    /// 產品名稱
    pub name: String,

    /// 庫存單位
    pub unit: String,

    /// 產品類型
    pub product_type: ProductType,

    /// 預設 BOM
    pub default_bom: Option<String>,

    /// 父產品（變體的模板產品）
    pub parent_product: Option<String>,

    /// 成本價
    pub cost_price: Decimal,

    /// 銷售價
    pub sale_price: Decimal,
}

impl Product {
    /// 創建新的可庫存產品
    pub fn new(id: impl Into<String>, name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            unit: unit.into(),
            product_type: ProductType::Storable,
            default_bom: None,
            parent_product: None,
            cost_price: Decimal::ZERO,
            sale_price: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置產品類型
    pub fn with_product_type(mut self, product_type: ProductType) -> Self {
        self.product_type = product_type;
        self
    }

    /// 建構器模式：設置預設 BOM
    pub fn with_default_bom(mut self, bom_id: impl Into<String>) -> Self {
        self.default_bom = Some(bom_id.into());
        self
    }

    /// 建構器模式：設置父產品
    pub fn with_parent_product(mut self, product_id: impl Into<String>) -> Self {
        self.parent_product = Some(product_id.into());
        self
    }

    /// 建構器模式：設置成本價與銷售價
    pub fn with_prices(mut self, cost_price: Decimal, sale_price: Decimal) -> Self {
        self.cost_price = cost_price;
        self.sale_price = sale_price;
        self
    }

    pub fn is_storable(&self) -> bool {
        self.product_type == ProductType::Storable
    }
}

/// 單位換算：1 個 `from_unit` = `coefficient` 個 `to_unit`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitConversion {
    pub from_unit: String,
    pub to_unit: String,
    pub coefficient: Decimal,
}

impl UnitConversion {
    pub fn new(from_unit: impl Into<String>, to_unit: impl Into<String>, coefficient: Decimal) -> Self {
        Self {
            from_unit: from_unit.into(),
            to_unit: to_unit.into(),
            coefficient,
        }
    }
}
