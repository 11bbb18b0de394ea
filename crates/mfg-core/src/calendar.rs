//! 工作日曆模型

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{MfgError, Result};

/// 工作日曆
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkCalendar {
    /// 日曆ID
    pub calendar_id: String,

    /// 工作日（索引 0 = 週一, ..., 6 = 週日）
    pub working_days: [bool; 7],

    /// 節假日列表
    pub holidays: Vec<NaiveDate>,
}

impl WorkCalendar {
    /// 創建新的工作日曆（預設週一到週五為工作日）
    pub fn new(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            working_days: [true, true, true, true, true, false, false],
            holidays: Vec::new(),
        }
    }

    /// 創建 24/7 日曆
    pub fn new_24_7(calendar_id: impl Into<String>) -> Self {
        Self {
            calendar_id: calendar_id.into(),
            working_days: [true; 7],
            holidays: Vec::new(),
        }
    }

    /// 建構器模式：設置工作日
    pub fn with_working_days(mut self, working_days: [bool; 7]) -> Self {
        self.working_days = working_days;
        self
    }

    /// 建構器模式：設置節假日
    pub fn with_holidays(mut self, mut holidays: Vec<NaiveDate>) -> Self {
        holidays.sort();
        holidays.dedup();
        self.holidays = holidays;
        self
    }

    /// 添加節假日
    pub fn add_holiday(&mut self, date: NaiveDate) {
        if let Err(pos) = self.holidays.binary_search(&date) {
            self.holidays.insert(pos, date);
        }
    }

    /// 檢查是否為工作日
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        if self.holidays.binary_search(&date).is_ok() {
            return false;
        }
        let weekday_index = date.weekday().num_days_from_monday() as usize;
        self.working_days[weekday_index]
    }

    /// 向後推算工作日
    pub fn add_working_days(&self, start_date: NaiveDate, days: u32) -> Result<NaiveDate> {
        if days > 0 && !self.working_days.iter().any(|&working| working) {
            return Err(MfgError::ConfigInvalid(format!(
                "日曆 {} 沒有任何工作日",
                self.calendar_id
            )));
        }

        let mut current = start_date;
        let mut remaining = days;

        while remaining > 0 {
            current = current
                .succ_opt()
                .ok_or_else(|| MfgError::Validation(format!("日期溢出: {}", current)))?;
            if self.is_working_day(current) {
                remaining -= 1;
            }
        }

        Ok(current)
    }

    /// 計算完工時間：保留開工的時分，日期依工作日推算
    pub fn schedule_end(&self, start: NaiveDateTime, lead_time_days: u32) -> Result<NaiveDateTime> {
        let end_date = self.add_working_days(start.date(), lead_time_days)?;
        Ok(end_date.and_time(start.time()))
    }

    /// 創建降級日曆（當無法取得排班表時使用）
    pub fn fallback_calendar() -> Self {
        Self::new_24_7("FALLBACK-24/7")
    }
}

impl Default for WorkCalendar {
    fn default() -> Self {
        Self::new("DEFAULT")
    }
}
