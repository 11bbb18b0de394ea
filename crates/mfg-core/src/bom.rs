//! BOM（物料清單）模型

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 生產製程
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProdProcess {
    /// 製程ID
    pub id: String,

    /// 製程名稱
    pub name: String,

    /// 製程前置時間（工作日）
    pub lead_time_days: u32,
}

impl ProdProcess {
    pub fn new(id: impl Into<String>, name: impl Into<String>, lead_time_days: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            lead_time_days,
        }
    }
}

/// 物料清單
///
/// `children` 只存子 BOM 的 ID；BOM 之間的關係預期無環，
/// 但展開時仍以層數上限防禦意外的循環。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillOfMaterial {
    /// BOM ID
    pub id: String,

    /// BOM 名稱
    pub name: String,

    /// 產出產品
    pub product_id: String,

    /// 每單位父件的用量
    pub qty: Decimal,

    /// 單位
    pub unit: String,

    /// 生產製程（沒有製程的節點不產生製令）
    pub prod_process: Option<ProdProcess>,

    /// 作為子件時是否繼續展開（否則視為直接耗用）
    pub define_sub_bom: bool,

    /// 子 BOM ID
    pub children: Vec<String>,
}

impl BillOfMaterial {
    /// 創建新的 BOM（用量 1，無製程，無子件）
    pub fn new(
        id: impl Into<String>,
        product_id: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            product_id: product_id.into(),
            qty: Decimal::ONE,
            unit: unit.into(),
            prod_process: None,
            define_sub_bom: false,
            children: Vec::new(),
        }
    }

    /// 建構器模式：設置名稱
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// 建構器模式：設置用量
    pub fn with_qty(mut self, qty: Decimal) -> Self {
        self.qty = qty;
        self
    }

    /// 建構器模式：設置製程
    pub fn with_process(mut self, process: ProdProcess) -> Self {
        self.prod_process = Some(process);
        self
    }

    /// 建構器模式：標記為需要展開的子 BOM
    pub fn as_sub_bom(mut self) -> Self {
        self.define_sub_bom = true;
        self
    }

    /// 建構器模式：設置子件
    pub fn with_children<I, S>(mut self, children: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.children = children.into_iter().map(Into::into).collect();
        self
    }

    /// 添加子件
    pub fn add_child(&mut self, bom_id: impl Into<String>) {
        self.children.push(bom_id.into());
    }

    pub fn has_process(&self) -> bool {
        self.prod_process.is_some()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}
