use crate::config::Config;
use crate::errors::{ProviderError, ProviderResult};
use crate::models::series::{PricePoint, Series};
use crate::providers::base::DataProvider;
use crate::util;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration as StdDuration;

const CMC_BASE_URL: &str = "https://pro-api.coinmarketcap.com/v1";

// TOTAL市值指数没有专用行情源，用BTC历史价格按固定倍数近似
// （约 $2.5T 总市值 / $68k BTC）
const TOTAL_MCAP_PER_BTC_DOLLAR: f64 = 36_800_000.0;
const TOTAL_REFERENCE_ASSET: &str = "BTC";

fn is_market_cap_index(symbol: &str) -> bool {
    matches!(symbol, "TOTAL" | "GLOBAL_MCAP")
}

/// CoinMarketCap 加密货币历史数据提供者
pub struct CmcProvider {
    client: Client,
    api_key: String,
}

impl CmcProvider {
    pub fn new(config: &Config) -> ProviderResult<Self> {
        let api_key = config.cmc_api_key.clone().ok_or_else(|| {
            ProviderError::InvalidArgument("CMC API key is not configured".to_string())
        })?;

        let client = Client::builder()
            .timeout(StdDuration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| ProviderError::UpstreamFailure(e.to_string()))?;

        Ok(Self { client, api_key })
    }

    /// Resolve a ticker symbol to the CoinMarketCap numeric id
    async fn resolve_id(&self, symbol: &str) -> ProviderResult<i64> {
        let response = self
            .client
            .get(format!("{}/cryptocurrency/map", CMC_BASE_URL))
            .query(&[("symbol", symbol)])
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UpstreamFailure(format!(
                "{}: HTTP status {}",
                symbol, status
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::from_request(symbol, e))?;

        json.get("data")
            .and_then(|d| d.as_array())
            .and_then(|entries| entries.first())
            .and_then(|entry| entry.get("id"))
            .and_then(|id| id.as_i64())
            .ok_or_else(|| ProviderError::NotFound(symbol.to_string()))
    }

    async fn fetch_coin_history(&self, symbol: &str, range_days: u32) -> ProviderResult<Series> {
        let id = self.resolve_id(symbol).await?;
        debug!("Resolved {} to CMC id {}", symbol, id);

        let end = Utc::now();
        let start = end - Duration::days(range_days as i64);

        let response = self
            .client
            .get(format!("{}/cryptocurrency/quotes/historical", CMC_BASE_URL))
            .query(&[
                ("id", id.to_string().as_str()),
                ("time_start", start.to_rfc3339().as_str()),
                ("time_end", end.to_rfc3339().as_str()),
                ("interval", "1d"),
                ("convert", "USD"),
            ])
            .header("X-CMC_PRO_API_KEY", &self.api_key)
            .send()
            .await
            .map_err(|e| ProviderError::from_request(symbol, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::UpstreamFailure(format!(
                "{}: HTTP status {}",
                symbol, status
            )));
        }

        let json: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::from_request(symbol, e))?;

        let quotes = json
            .get("data")
            .and_then(|d| d.get("quotes"))
            .and_then(|q| q.as_array())
            .ok_or_else(|| {
                ProviderError::MalformedPayload(format!("{}: response has no quotes", symbol))
            })?;

        if quotes.is_empty() {
            warn!("CMC returned an empty quote list for {}", symbol);
            return Err(ProviderError::NotFound(symbol.to_string()));
        }

        let mut points = Vec::with_capacity(quotes.len());
        for quote in quotes {
            points.push(parse_quote_point(symbol, quote)?);
        }
        points.sort_by_key(|p| p.date);

        info!("Fetched {} points for crypto {}", points.len(), symbol);
        Ok(Series::new(symbol, points))
    }
}

fn parse_quote_point(symbol: &str, quote: &Value) -> ProviderResult<PricePoint> {
    let timestamp = quote
        .get("timestamp")
        .and_then(|t| t.as_str())
        .ok_or_else(|| {
            ProviderError::MalformedPayload(format!("{}: quote missing timestamp", symbol))
        })?;
    let date = DateTime::parse_from_rfc3339(timestamp)
        .map_err(|e| {
            ProviderError::MalformedPayload(format!("{}: bad timestamp {}: {}", symbol, timestamp, e))
        })?
        .date_naive();

    let usd = quote
        .get("quote")
        .and_then(|q| q.get("USD"))
        .ok_or_else(|| {
            ProviderError::MalformedPayload(format!("{}: quote missing USD leg", symbol))
        })?;

    // `price` is mandatory; OHLC fields are sparse on the daily interval and
    // fall back to the period price when absent
    let price = usd.get("price").and_then(|v| v.as_f64()).ok_or_else(|| {
        ProviderError::MalformedPayload(format!("{}: missing numeric field 'price'", symbol))
    })?;
    let field_or_price =
        |field: &str| -> f64 { usd.get(field).and_then(|v| v.as_f64()).unwrap_or(price) };

    Ok(PricePoint {
        date,
        open: field_or_price("open"),
        high: field_or_price("high"),
        low: field_or_price("low"),
        close: price,
        volume: usd.get("volume_24h").and_then(|v| v.as_f64()).unwrap_or(0.0),
    })
}

/// Scale a reference-asset series into an approximated market-cap index.
fn scale_to_index(index_symbol: &str, reference: Series, multiplier: f64) -> Series {
    let points = reference
        .points
        .into_iter()
        .map(|p| PricePoint {
            date: p.date,
            open: p.open * multiplier,
            high: p.high * multiplier,
            low: p.low * multiplier,
            close: p.close * multiplier,
            volume: p.volume,
        })
        .collect();

    Series::approximated(index_symbol, points)
}

#[async_trait]
impl DataProvider for CmcProvider {
    fn source_name(&self) -> &'static str {
        "cmc"
    }

    async fn fetch_series(&self, symbol: &str, range_days: u32) -> ProviderResult<Series> {
        let symbol = util::normalize_symbol(symbol)?;
        util::validate_range_days(&symbol, range_days)?;

        if is_market_cap_index(&symbol) {
            info!(
                "Approximating index {} from scaled {} history",
                symbol, TOTAL_REFERENCE_ASSET
            );
            let reference = self
                .fetch_coin_history(TOTAL_REFERENCE_ASSET, range_days)
                .await?;
            return Ok(scale_to_index(&symbol, reference, TOTAL_MCAP_PER_BTC_DOLLAR));
        }

        self.fetch_coin_history(&symbol, range_days).await
    }
}
