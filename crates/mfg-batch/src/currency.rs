//! 匯率換算

use std::collections::HashMap;

use mfg_core::MfgError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 匯率表：1 單位 `from` = rate 單位 `to`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CurrencyRates {
    rates: HashMap<String, Decimal>,
}

fn key(from: &str, to: &str) -> String {
    format!("{}/{}", from, to)
}

impl CurrencyRates {
    pub fn new() -> Self {
        Self::default()
    }

    /// 建構器模式：設置匯率
    pub fn with_rate(mut self, from: &str, to: &str, rate: Decimal) -> Self {
        self.set_rate(from, to, rate);
        self
    }

    pub fn set_rate(&mut self, from: &str, to: &str, rate: Decimal) {
        self.rates.insert(key(from, to), rate);
    }

    /// 取得匯率；找不到正向匯率時使用反向匯率的倒數
    pub fn rate(&self, from: &str, to: &str) -> mfg_core::Result<Decimal> {
        if from == to {
            return Ok(Decimal::ONE);
        }
        if let Some(rate) = self.rates.get(&key(from, to)) {
            return Ok(*rate);
        }
        self.rates
            .get(&key(to, from))
            .and_then(|reverse| Decimal::ONE.checked_div(*reverse))
            .ok_or_else(|| MfgError::not_found("匯率", key(from, to)))
    }

    /// 換算金額
    pub fn convert(&self, amount: Decimal, from: &str, to: &str) -> mfg_core::Result<Decimal> {
        let rate = self.rate(from, to)?;
        amount
            .checked_mul(rate)
            .ok_or_else(|| MfgError::Validation(format!("金額換算溢出: {} {}", amount, from)))
    }
}
