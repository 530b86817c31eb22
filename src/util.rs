use chrono::{Datelike, Duration, NaiveDate, Weekday};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::errors::{ProviderError, ProviderResult};

// 标的代码归一化：大写、去空白，空串视为非法参数
pub fn normalize_symbol(symbol: &str) -> ProviderResult<String> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::InvalidArgument(
            "symbol must be non-empty".to_string(),
        ));
    }
    Ok(trimmed.to_uppercase())
}

// range_days 为 0 时拒绝请求，避免发出无意义的抓取
pub fn validate_range_days(symbol: &str, range_days: u32) -> ProviderResult<()> {
    if range_days == 0 {
        return Err(ProviderError::InvalidArgument(format!(
            "range_days must be positive for {}",
            symbol
        )));
    }
    Ok(())
}

/// Derive a mock-generation seed from the symbol so repeated requests for the
/// same symbol reproduce the same series within a process run.
pub fn seed_for_symbol(symbol: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    symbol.hash(&mut hasher);
    hasher.finish()
}

/// Last `n` calendar days ending at `end`, oldest first.
pub fn calendar_days_back(end: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut dates: Vec<NaiveDate> = (0..n as i64)
        .map(|i| end - Duration::days(i))
        .collect();
    dates.reverse();
    dates
}

/// Last `n` weekdays ending at or before `end`, oldest first. Stocks only
/// trade Monday through Friday, so the walk skips weekends until `n` trading
/// days are collected.
pub fn weekdays_back(end: NaiveDate, n: u32) -> Vec<NaiveDate> {
    let mut dates = Vec::with_capacity(n as usize);
    let mut current = end;
    while dates.len() < n as usize {
        if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(current);
        }
        current = current - Duration::days(1);
    }
    dates.reverse();
    dates
}
