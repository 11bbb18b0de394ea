//! 銷售訂單模型

use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{MasterData, MfgError, Result};

/// 金額小數位數
const AMOUNT_SCALE: u32 = 2;

fn round_amount(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// 金額運算溢出時回傳驗證錯誤
fn checked(value: Option<Decimal>, what: impl std::fmt::Display) -> Result<Decimal> {
    value.ok_or_else(|| MfgError::Validation(format!("{} 金額溢出", what)))
}

/// 銷售訂單狀態
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleOrderStatus {
    /// 草稿
    Draft,
    /// 已確認
    Confirmed,
    /// 已完成
    Completed,
    /// 已取消
    Cancelled,
}

/// 訂單行的供應方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SaleSupply {
    /// 不需供應
    None,
    /// 庫存出貨
    FromStock,
    /// 採購
    Purchase,
    /// 生產
    Produce,
}

/// 銷售訂單行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrderLine {
    /// 行ID
    pub id: Uuid,

    /// 行序號
    pub sequence: u32,

    /// 產品ID
    pub product_id: String,

    /// 訂購數量
    pub qty: Decimal,

    /// 訂購單位（可能與產品庫存單位不同）
    pub unit: String,

    /// 單價（未稅）
    pub price: Decimal,

    /// 稅率（0.05 = 5%）
    pub tax_rate: Decimal,

    /// 指定 BOM（覆蓋產品預設）
    pub bill_of_material: Option<String>,

    /// 供應方式
    pub sale_supply: SaleSupply,

    pub ex_tax_total: Decimal,
    pub in_tax_total: Decimal,
    pub sub_total_cost_price: Decimal,
    pub margin: Decimal,
}

impl SaleOrderLine {
    /// 創建新的訂單行（預設庫存出貨、零稅率）
    pub fn new(product_id: impl Into<String>, qty: Decimal, unit: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: Uuid::new_v4(),
            sequence: 0,
            product_id: product_id.into(),
            qty,
            unit: unit.into(),
            price,
            tax_rate: Decimal::ZERO,
            bill_of_material: None,
            sale_supply: SaleSupply::FromStock,
            ex_tax_total: Decimal::ZERO,
            in_tax_total: Decimal::ZERO,
            sub_total_cost_price: Decimal::ZERO,
            margin: Decimal::ZERO,
        }
    }

    /// 建構器模式：設置稅率
    pub fn with_tax_rate(mut self, tax_rate: Decimal) -> Self {
        self.tax_rate = tax_rate;
        self
    }

    /// 建構器模式：指定 BOM
    pub fn with_bill_of_material(mut self, bom_id: impl Into<String>) -> Self {
        self.bill_of_material = Some(bom_id.into());
        self
    }

    /// 建構器模式：設置供應方式
    pub fn with_sale_supply(mut self, sale_supply: SaleSupply) -> Self {
        self.sale_supply = sale_supply;
        self
    }

    /// 建構器模式：生產供應
    pub fn produced(self) -> Self {
        self.with_sale_supply(SaleSupply::Produce)
    }

    pub fn is_produced(&self) -> bool {
        self.sale_supply == SaleSupply::Produce
    }

    /// 重新計算行金額
    ///
    /// 任一金額溢出時回傳 `Validation`，行金額維持原值。
    pub fn compute_totals(&mut self, cost_price: Decimal) -> Result<()> {
        let what = || format!("產品 {}", self.product_id);

        let ex_tax_total = round_amount(checked(self.qty.checked_mul(self.price), what())?);
        let tax_factor = checked(Decimal::ONE.checked_add(self.tax_rate), what())?;
        let in_tax_total = round_amount(checked(ex_tax_total.checked_mul(tax_factor), what())?);
        let sub_total_cost_price = round_amount(checked(self.qty.checked_mul(cost_price), what())?);
        let margin = checked(ex_tax_total.checked_sub(sub_total_cost_price), what())?;

        self.ex_tax_total = ex_tax_total;
        self.in_tax_total = in_tax_total;
        self.sub_total_cost_price = sub_total_cost_price;
        self.margin = margin;
        Ok(())
    }
}

/// 銷售訂單
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaleOrder {
    /// 訂單ID
    pub id: Uuid,

    /// 訂單編號
    pub reference: String,

    /// 客戶
    pub customer: String,

    /// 訂單幣別
    pub currency: String,

    /// 公司記帳幣別（彙總報表換算目標）
    pub company_currency: String,

    /// 狀態
    pub status: SaleOrderStatus,

    /// 訂單行
    pub lines: Vec<SaleOrderLine>,

    pub ex_tax_total: Decimal,
    pub tax_total: Decimal,
    pub in_tax_total: Decimal,
    pub total_cost_price: Decimal,
    pub margin: Decimal,

    /// 毛利率（百分比）
    pub margin_rate: Decimal,

    /// 確認時間
    pub confirmed_at: Option<DateTime<Utc>>,
}

impl SaleOrder {
    /// 創建新的草稿訂單（公司幣別預設與訂單幣別相同）
    pub fn new(reference: impl Into<String>, customer: impl Into<String>, currency: impl Into<String>) -> Self {
        let currency = currency.into();
        Self {
            id: Uuid::new_v4(),
            reference: reference.into(),
            customer: customer.into(),
            company_currency: currency.clone(),
            currency,
            status: SaleOrderStatus::Draft,
            lines: Vec::new(),
            ex_tax_total: Decimal::ZERO,
            tax_total: Decimal::ZERO,
            in_tax_total: Decimal::ZERO,
            total_cost_price: Decimal::ZERO,
            margin: Decimal::ZERO,
            margin_rate: Decimal::ZERO,
            confirmed_at: None,
        }
    }

    /// 建構器模式：設置公司幣別
    pub fn with_company_currency(mut self, company_currency: impl Into<String>) -> Self {
        self.company_currency = company_currency.into();
        self
    }

    /// 建構器模式：添加訂單行
    pub fn with_line(mut self, line: SaleOrderLine) -> Self {
        self.add_line(line);
        self
    }

    /// 添加訂單行（序號自動遞增 10）
    pub fn add_line(&mut self, mut line: SaleOrderLine) {
        line.sequence = (self.lines.len() as u32 + 1) * 10;
        self.lines.push(line);
    }

    pub fn is_modifiable(&self) -> bool {
        self.status == SaleOrderStatus::Draft
    }

    /// 重新計算行金額與訂單彙總（儲存時呼叫）
    pub fn compute_totals(&mut self, master: &MasterData) -> Result<()> {
        let mut ex_tax_total = Decimal::ZERO;
        let mut in_tax_total = Decimal::ZERO;
        let mut total_cost_price = Decimal::ZERO;

        for line in &mut self.lines {
            let cost_price = master.product(&line.product_id)?.cost_price;
            line.compute_totals(cost_price)?;

            ex_tax_total = checked(ex_tax_total.checked_add(line.ex_tax_total), &self.reference)?;
            in_tax_total = checked(in_tax_total.checked_add(line.in_tax_total), &self.reference)?;
            total_cost_price = checked(
                total_cost_price.checked_add(line.sub_total_cost_price),
                &self.reference,
            )?;
        }

        let margin = checked(ex_tax_total.checked_sub(total_cost_price), &self.reference)?;
        let margin_rate = if ex_tax_total.is_zero() {
            Decimal::ZERO
        } else {
            let ratio = margin
                .checked_div(ex_tax_total)
                .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));
            round_amount(checked(ratio, &self.reference)?)
        };

        self.ex_tax_total = ex_tax_total;
        self.in_tax_total = in_tax_total;
        self.tax_total = checked(in_tax_total.checked_sub(ex_tax_total), &self.reference)?;
        self.total_cost_price = total_cost_price;
        self.margin = margin;
        self.margin_rate = margin_rate;

        Ok(())
    }

    /// 確認訂單（草稿 → 已確認）
    pub fn confirm(&mut self, at: DateTime<Utc>) -> Result<()> {
        if self.status != SaleOrderStatus::Draft {
            return Err(MfgError::Validation(format!(
                "訂單 {} 狀態為 {:?}，無法確認",
                self.reference, self.status
            )));
        }
        if self.lines.is_empty() {
            return Err(MfgError::Validation(format!(
                "訂單 {} 沒有訂單行",
                self.reference
            )));
        }
        self.status = SaleOrderStatus::Confirmed;
        self.confirmed_at = Some(at);
        Ok(())
    }

    /// 完成訂單（已確認 → 已完成）
    pub fn complete(&mut self) -> Result<()> {
        if self.status != SaleOrderStatus::Confirmed {
            return Err(MfgError::Validation(format!(
                "訂單 {} 狀態為 {:?}，無法完成",
                self.reference, self.status
            )));
        }
        self.status = SaleOrderStatus::Completed;
        Ok(())
    }

    /// 取消訂單
    pub fn cancel(&mut self) -> Result<()> {
        match self.status {
            SaleOrderStatus::Draft | SaleOrderStatus::Confirmed => {
                self.status = SaleOrderStatus::Cancelled;
                Ok(())
            }
            status => Err(MfgError::Validation(format!(
                "訂單 {} 狀態為 {:?}，無法取消",
                self.reference, status
            ))),
        }
    }

    /// 需要生產的訂單行
    pub fn produced_lines(&self) -> impl Iterator<Item = &SaleOrderLine> {
        self.lines.iter().filter(|line| line.is_produced())
    }
}
