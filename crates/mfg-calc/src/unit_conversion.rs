//! 單位換算

use mfg_core::{MasterData, MfgError};
use rust_decimal::{Decimal, RoundingStrategy};

/// 單位換算器
pub struct UnitConverter;

impl UnitConverter {
    /// 將數量從 `from_unit` 換算為 `to_unit`，結果取 `scale` 位小數
    ///
    /// 先找正向換算（乘以係數），找不到再用反向換算（除以係數）。
    pub fn convert(
        master: &MasterData,
        from_unit: &str,
        to_unit: &str,
        qty: Decimal,
        scale: u32,
    ) -> mfg_core::Result<Decimal> {
        if from_unit == to_unit {
            return Ok(qty);
        }

        let converted = if let Some(conversion) = master.conversion(from_unit, to_unit) {
            qty.checked_mul(conversion.coefficient)
        } else if let Some(conversion) = master.conversion(to_unit, from_unit) {
            qty.checked_div(conversion.coefficient)
        } else {
            None
        };

        let converted = converted.ok_or_else(|| MfgError::Conversion {
            from: from_unit.to_string(),
            to: to_unit.to_string(),
        })?;

        tracing::debug!("單位換算: {} {} → {} {}", qty, from_unit, converted, to_unit);

        Ok(converted.round_dp_with_strategy(scale, RoundingStrategy::MidpointAwayFromZero))
    }
}
