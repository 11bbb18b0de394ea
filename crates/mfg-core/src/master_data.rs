//! 主檔資料（產品、BOM、單位換算）

use std::collections::HashMap;

use crate::{BillOfMaterial, MfgError, Product, Result, UnitConversion};

/// 主檔資料的記憶體存放
#[derive(Debug, Clone, Default)]
pub struct MasterData {
    products: HashMap<String, Product>,
    boms: HashMap<String, BillOfMaterial>,
    conversions: HashMap<(String, String), UnitConversion>,
}

impl MasterData {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新增或覆蓋產品
    pub fn add_product(&mut self, product: Product) {
        self.products.insert(product.id.clone(), product);
    }

    /// 新增或覆蓋 BOM
    pub fn add_bom(&mut self, bom: BillOfMaterial) {
        self.boms.insert(bom.id.clone(), bom);
    }

    /// 新增或覆蓋單位換算
    pub fn add_conversion(&mut self, conversion: UnitConversion) {
        self.conversions.insert(
            (conversion.from_unit.clone(), conversion.to_unit.clone()),
            conversion,
        );
    }

    /// 建構器模式：批次載入產品
    pub fn with_products(mut self, products: impl IntoIterator<Item = Product>) -> Self {
        for product in products {
            self.add_product(product);
        }
        self
    }

    /// 建構器模式：批次載入 BOM
    pub fn with_boms(mut self, boms: impl IntoIterator<Item = BillOfMaterial>) -> Self {
        for bom in boms {
            self.add_bom(bom);
        }
        self
    }

    pub fn product(&self, id: &str) -> Result<&Product> {
        self.products
            .get(id)
            .ok_or_else(|| MfgError::not_found("產品", id))
    }

    pub fn bom(&self, id: &str) -> Result<&BillOfMaterial> {
        self.boms.get(id).ok_or_else(|| MfgError::not_found("BOM", id))
    }

    pub fn conversion(&self, from_unit: &str, to_unit: &str) -> Option<&UnitConversion> {
        self.conversions
            .get(&(from_unit.to_string(), to_unit.to_string()))
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    pub fn bom_count(&self) -> usize {
        self.boms.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorCategory;
    use rust_decimal::Decimal;

    #[test]
    fn test_lookup() {
        let mut master = MasterData::new()
            .with_products([Product::new("BIKE-001", "Bike", "pc")])
            .with_boms([BillOfMaterial::new("BOM-BIKE", "BIKE-001", "pc")]);
        master.add_conversion(UnitConversion::new("kg", "g", Decimal::from(1000)));

        assert_eq!(master.product_count(), 1);
        assert_eq!(master.bom_count(), 1);
        assert_eq!(master.product("BIKE-001").unwrap().name, "Bike");
        assert_eq!(master.bom("BOM-BIKE").unwrap().product_id, "BIKE-001");
        assert!(master.conversion("kg", "g").is_some());
        assert!(master.conversion("g", "kg").is_none());
    }

    #[test]
    fn test_missing_entries() {
        let master = MasterData::new();

        let err = master.bom("BOM-NONE").unwrap_err();
        assert_eq!(err.category(), ErrorCategory::NotFound);
        assert!(master.product("NONE").is_err());
    }
}
