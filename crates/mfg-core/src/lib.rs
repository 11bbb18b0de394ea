//! # MFG Core
//!
//! 銷售訂單轉生產的核心資料模型與類型定義

pub mod bom;
pub mod calendar;
pub mod config;
pub mod master_data;
pub mod product;
pub mod production;
pub mod sale_order;

// Re-export 主要類型
pub use bom::{BillOfMaterial, ProdProcess};
pub use calendar::WorkCalendar;
pub use config::ProductionConfig;
pub use master_data::MasterData;
pub use product::{Product, ProductType, UnitConversion};
pub use production::{ManufOrderOrigin, ManufOrderStatus, ManufacturingOrder, ProductionOrder};
pub use sale_order::{SaleOrder, SaleOrderLine, SaleOrderStatus, SaleSupply};

/// 錯誤分類
///
/// 配置錯誤預期中止整個生成呼叫（及其所在的交易），
/// 與一般的查無資料、輸入驗證錯誤區分開來。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Conversion,
    NotFound,
    Validation,
}

/// 生產模組錯誤類型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MfgError {
    #[error("產品 {product_id} 找不到可用的 BOM")]
    MissingBom { product_id: String },

    #[error("BOM {bom_id} 展開超過 {max_depth} 層，可能存在循環")]
    BomDepthExceeded { bom_id: String, max_depth: u32 },

    #[error("配置無效: {0}")]
    ConfigInvalid(String),

    #[error("單位轉換失敗: {from} -> {to}")]
    Conversion { from: String, to: String },

    #[error("找不到{kind}: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("驗證失敗: {0}")]
    Validation(String),
}

impl MfgError {
    /// 建立查無資料錯誤
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// 取得錯誤分類
    pub fn category(&self) -> ErrorCategory {
        match self {
            MfgError::MissingBom { .. }
            | MfgError::BomDepthExceeded { .. }
            | MfgError::ConfigInvalid(_) => ErrorCategory::Configuration,
            MfgError::Conversion { .. } => ErrorCategory::Conversion,
            MfgError::NotFound { .. } => ErrorCategory::NotFound,
            MfgError::Validation(_) => ErrorCategory::Validation,
        }
    }

    pub fn is_configuration(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }
}

pub type Result<T> = std::result::Result<T, MfgError>;
