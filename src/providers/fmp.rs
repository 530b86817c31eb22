use crate::config::Config;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::series::{PricePoint, Series};
use crate::providers::base::DataProvider;
use crate::util;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

const FMP_BASE_URL: &str = "https://financialmodelingprep.com/api/v3";

/// Financial Modeling Prep 股票历史数据提供者
pub struct FmpProvider {
    client: Client,
    api_key: String,
}

impl FmpProvider {
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let api_key = config.fmp_api_key.clone().ok_or_else(|| {
            ProviderError::InvalidArgument("FMP API key is not configured".to_string())
        })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::UpstreamFailure(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    fn parse_point(symbol: &str, item: &Value) -> ProviderResult<PricePoint> {
        let date_str = item
            .get("date")
            .and_then(|v| v.as_str())
            .ok_or_else(|| missing_field(symbol, "date"))?;
        let date = NaiveDate::parse_from_str(date_str, "%Y-%m-%d").map_err(|e| {
            ProviderError::MalformedPayload(format!("{}: bad date {}: {}", symbol, date_str, e))
        })?;

        Ok(PricePoint {
            date,
            open: require_f64(symbol, item, "open")?,
            high: require_f64(symbol, item, "high")?,
            low: require_f64(symbol, item, "low")?,
            close: require_f64(symbol, item, "close")?,
            volume: require_f64(symbol, item, "volume")?,
        })
    }
}

// 必填数值字段缺失即视为损坏的响应，绝不静默补零
fn require_f64(symbol: &str, item: &Value, field: &str) -> ProviderResult<f64> {
    item.get(field)
        .and_then(|v| v.as_f64())
        .ok_or_else(|| missing_field(symbol, field))
}

fn missing_field(symbol: &str, field: &str) -> ProviderError {
    ProviderError::MalformedPayload(format!("{}: missing numeric field '{}'", symbol, field))
}

#[async_trait]
impl DataProvider for FmpProvider {
    fn source_name(&self) -> &'static str {
        "fmp"
    }

    async fn fetch_series(&self, symbol: &str, range_days: u32) -> ProviderResult<Series> {
        let symbol = util::normalize_symbol(symbol)?;
        util::validate_range_days(&symbol, range_days)?;

        debug!("Fetching {} days of history for stock {}", range_days, symbol);

        let response = self
            .client
            .get(format!("{}/historical-price-full/{}", FMP_BASE_URL, symbol))
            .query(&[
                ("timeseries", range_days.to_string().as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_request(&symbol, e))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::NotFound(symbol));
        }
        if !status.is_success() {
            return Err(ProviderError::UpstreamFailure(format!(
                "{}: HTTP status {}",
                symbol, status
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::from_request(&symbol, e))?;

        // FMP returns an empty object for unknown tickers
        let historical = match json.get("historical").and_then(|h| h.as_array()) {
            Some(items) if !items.is_empty() => items,
            _ => return Err(ProviderError::NotFound(symbol)),
        };

        let mut points = Vec::with_capacity(historical.len());
        for item in historical {
            points.push(FmpProvider::parse_point(&symbol, item)?);
        }

        // FMP delivers newest first; the series contract is ascending
        points.sort_by_key(|p| p.date);

        info!("Fetched {} points for stock {}", points.len(), symbol);
        Ok(Series::new(symbol, points))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn parse_point_maps_all_fields() {
        let item = json!({
            "date": "2025-03-31",
            "open": 171.19,
            "high": 172.42,
            "low": 169.97,
            "close": 170.28,
            "volume": 68829400.0
        });

        let p = FmpProvider::parse_point("AAPL", &item).unwrap();
        assert_eq!(p.date, NaiveDate::from_ymd_opt(2025, 3, 31).unwrap());
        assert_eq!(p.close, 170.28);
        assert_eq!(p.volume, 68829400.0);
    }

    #[test]
    fn parse_point_rejects_missing_close() {
        let item = json!({
            "date": "2025-03-31",
            "open": 171.19,
            "high": 172.42,
            "low": 169.97,
            "volume": 68829400.0
        });

        assert!(matches!(
            FmpProvider::parse_point("AAPL", &item),
            Err(ProviderError::MalformedPayload(_))
        ));
    }

    #[test]
    fn parse_point_rejects_non_numeric_field() {
        let item = json!({
            "date": "2025-03-31",
            "open": "n/a",
            "high": 172.42,
            "low": 169.97,
            "close": 170.28,
            "volume": 68829400.0
        });

        assert!(matches!(
            FmpProvider::parse_point("AAPL", &item),
            Err(ProviderError::MalformedPayload(_))
        ));
    }
}
