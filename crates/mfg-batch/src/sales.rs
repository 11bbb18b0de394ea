//! 銷售金額彙總（換算為目標幣別）

use mfg_core::{MfgError, ProductionConfig, SaleOrder, SaleOrderStatus};
use rust_decimal::Decimal;

use crate::{CurrencyRates, SaleOrderSource};

/// 銷售金額彙總器
pub struct SalesAggregator;

impl SalesAggregator {
    /// 逐頁彙總已確認與已完成訂單的未稅金額，換算為 `target_currency`
    ///
    /// 每頁筆數取自 `config.batch_page_size`。
    pub fn converted_total<S: SaleOrderSource + ?Sized>(
        source: &S,
        rates: &CurrencyRates,
        target_currency: &str,
        config: &ProductionConfig,
    ) -> mfg_core::Result<Decimal> {
        Self::accumulate(source, rates, config, |_| Ok(target_currency.to_string()))
    }

    /// 以訂單的公司幣別彙總
    ///
    /// 所有計入的訂單必須屬於同一公司幣別，否則回傳 `Validation`。
    /// 沒有任何計入的訂單時回傳 `None`。
    pub fn company_total<S: SaleOrderSource + ?Sized>(
        source: &S,
        rates: &CurrencyRates,
        config: &ProductionConfig,
    ) -> mfg_core::Result<Option<(String, Decimal)>> {
        let mut company_currency: Option<String> = None;

        let total = Self::accumulate(source, rates, config, |order| {
            let expected = company_currency.get_or_insert_with(|| order.company_currency.clone());
            if *expected != order.company_currency {
                return Err(MfgError::Validation(format!(
                    "訂單 {} 的公司幣別 {} 與 {} 不一致",
                    order.reference, order.company_currency, expected
                )));
            }
            Ok(order.company_currency.clone())
        })?;

        Ok(company_currency.map(|currency| (currency, total)))
    }

    /// 逐頁讀取、換算並累加；`target` 決定每張訂單的換算幣別
    fn accumulate<S, F>(
        source: &S,
        rates: &CurrencyRates,
        config: &ProductionConfig,
        mut target: F,
    ) -> mfg_core::Result<Decimal>
    where
        S: SaleOrderSource + ?Sized,
        F: FnMut(&SaleOrder) -> mfg_core::Result<String>,
    {
        config.validate()?;
        let page_size = config.batch_page_size as usize;

        let mut total = Decimal::ZERO;
        let mut offset = 0;
        let mut counted = 0usize;

        loop {
            let page = source.fetch_page(offset, page_size)?;
            if page.is_empty() {
                break;
            }
            let fetched = page.len();

            for order in &page {
                if !matches!(
                    order.status,
                    SaleOrderStatus::Confirmed | SaleOrderStatus::Completed
                ) {
                    continue;
                }
                let target_currency = target(order)?;
                let converted = rates.convert(order.ex_tax_total, &order.currency, &target_currency)?;
                total = total.checked_add(converted).ok_or_else(|| {
                    MfgError::Validation(format!("銷售彙總於訂單 {} 溢出", order.reference))
                })?;
                counted += 1;
            }

            // 釋放本頁再讀下一頁
            drop(page);
            offset += fetched;

            if fetched < page_size {
                break;
            }
        }

        tracing::info!("銷售彙總完成：{} 筆訂單，合計 {}", counted, total);

        Ok(total)
    }
}
