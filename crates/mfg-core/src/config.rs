//! 生產配置模型

use serde::{Deserialize, Serialize};

use crate::{MfgError, Result};

/// 生產模組配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionConfig {
    /// BOM 展開層數上限（防禦 BOM 循環）
    pub max_bom_depth: u32,

    /// 是否一張銷售訂單只產生一張生產訂單
    /// - true: 所有訂單行共用一張生產訂單
    /// - false: 每個訂單行各自一張生產訂單（預設）
    pub one_production_order_per_sale_order: bool,

    /// 產生的製令是否直接排程
    pub auto_plan_manuf_orders: bool,

    /// 換算後數量的小數位數
    pub qty_scale: u32,

    /// 批次處理每頁筆數
    pub batch_page_size: u32,
}

impl ProductionConfig {
    /// BOM 展開層數上限預設值
    pub const DEFAULT_MAX_BOM_DEPTH: u32 = 100;

    /// 創建預設配置
    pub fn new() -> Self {
        Self {
            max_bom_depth: Self::DEFAULT_MAX_BOM_DEPTH,
            one_production_order_per_sale_order: false,
            auto_plan_manuf_orders: false,
            qty_scale: 3,
            batch_page_size: 10,
        }
    }

    /// 建構器模式：設置 BOM 展開層數上限
    pub fn with_max_bom_depth(mut self, depth: u32) -> Self {
        self.max_bom_depth = depth;
        self
    }

    /// 建構器模式：設置生產訂單合併方式
    pub fn with_one_production_order_per_sale_order(mut self, enabled: bool) -> Self {
        self.one_production_order_per_sale_order = enabled;
        self
    }

    /// 建構器模式：設置製令自動排程
    pub fn with_auto_plan(mut self, enabled: bool) -> Self {
        self.auto_plan_manuf_orders = enabled;
        self
    }

    /// 建構器模式：設置數量小數位數
    pub fn with_qty_scale(mut self, scale: u32) -> Self {
        self.qty_scale = scale;
        self
    }

    /// 建構器模式：設置批次每頁筆數
    pub fn with_batch_page_size(mut self, size: u32) -> Self {
        self.batch_page_size = size;
        self
    }

    /// 從 JSON 載入配置（缺少的欄位使用預設值）
    ///
    /// # 範例
    /// ```
    /// # use mfg_core::ProductionConfig;
    /// let config = ProductionConfig::from_json_str(
    ///     r#"{ "one_production_order_per_sale_order": true }"#,
    /// )
    /// .unwrap();
    /// assert!(config.one_production_order_per_sale_order);
    /// assert_eq!(config.max_bom_depth, 100);
    /// ```
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| MfgError::ConfigInvalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// 檢查配置是否有效
    pub fn validate(&self) -> Result<()> {
        if self.max_bom_depth == 0 {
            return Err(MfgError::ConfigInvalid(
                "BOM 展開層數上限必須大於 0".to_string(),
            ));
        }
        if self.batch_page_size == 0 {
            return Err(MfgError::ConfigInvalid(
                "批次每頁筆數必須大於 0".to_string(),
            ));
        }
        if self.qty_scale > 28 {
            return Err(MfgError::ConfigInvalid(format!(
                "數量小數位數 {} 超過上限 28",
                self.qty_scale
            )));
        }
        Ok(())
    }
}

impl Default for ProductionConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ProductionConfig::default();

        assert_eq!(config.max_bom_depth, 100);
        assert!(!config.one_production_order_per_sale_order);
        assert!(!config.auto_plan_manuf_orders);
        assert_eq!(config.qty_scale, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = ProductionConfig::new()
            .with_max_bom_depth(10)
            .with_one_production_order_per_sale_order(true)
            .with_auto_plan(true)
            .with_qty_scale(2)
            .with_batch_page_size(50);

        assert_eq!(config.max_bom_depth, 10);
        assert!(config.one_production_order_per_sale_order);
        assert!(config.auto_plan_manuf_orders);
        assert_eq!(config.qty_scale, 2);
        assert_eq!(config.batch_page_size, 50);
    }

    #[test]
    fn test_from_json() {
        let config = ProductionConfig::from_json_str(
            r#"{ "max_bom_depth": 20, "auto_plan_manuf_orders": true }"#,
        )
        .unwrap();

        assert_eq!(config.max_bom_depth, 20);
        assert!(config.auto_plan_manuf_orders);
        assert_eq!(config.batch_page_size, 10);
    }

    #[test]
    fn test_invalid_config() {
        let err = ProductionConfig::from_json_str(r#"{ "max_bom_depth": 0 }"#).unwrap_err();
        assert!(err.is_configuration());

        assert!(ProductionConfig::from_json_str("not json").is_err());
        assert!(ProductionConfig::new().with_batch_page_size(0).validate().is_err());
        assert!(ProductionConfig::new().with_qty_scale(29).validate().is_err());
    }
}
