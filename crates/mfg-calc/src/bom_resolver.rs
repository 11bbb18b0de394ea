//! 訂單行 BOM 解析

use mfg_core::{BillOfMaterial, MasterData, MfgError, Product, SaleOrderLine};

/// BOM 解析器
pub struct BomResolver;

impl BomResolver {
    /// 解析訂單行要使用的 BOM
    ///
    /// 順序：訂單行指定 → 產品預設 → 父產品預設。
    /// 都沒有時回傳配置錯誤。
    pub fn resolve<'a>(
        master: &'a MasterData,
        line: &SaleOrderLine,
        product: &Product,
    ) -> mfg_core::Result<&'a BillOfMaterial> {
        if let Some(bom_id) = &line.bill_of_material {
            return master.bom(bom_id);
        }

        if let Some(bom_id) = &product.default_bom {
            return master.bom(bom_id);
        }

        if let Some(parent_id) = &product.parent_product {
            let parent = master.product(parent_id)?;
            if let Some(bom_id) = &parent.default_bom {
                tracing::debug!("產品 {} 使用父產品 {} 的 BOM {}", product.id, parent_id, bom_id);
                return master.bom(bom_id);
            }
        }

        Err(MfgError::MissingBom {
            product_id: product.id.clone(),
        })
    }
}
