use crate::errors::ProviderResult;
use crate::models::series::{PricePoint, Series};
use crate::providers::base::DataProvider;
use crate::util;
use async_trait::async_trait;
use chrono::NaiveDate;
use log::debug;
use rand::prelude::*;
use rand::rngs::StdRng;

// 固定锚点日期，保证股票与加密货币面板的日期对齐
const MOCK_END_DATE: (i32, u32, u32) = (2025, 4, 1);

// Process-wide base seed; combined with the per-symbol hash so every symbol
// walks its own path but repeated requests reproduce the same series.
const MOCK_BASE_SEED: u64 = 42;

/// Asset class drives volatility, trading calendar and volume scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AssetClass {
    Stock,
    Crypto,
    Index,
}

impl AssetClass {
    fn volatility(self) -> f64 {
        match self {
            // Crypto moves roughly twice as hard as equities
            AssetClass::Stock => 0.02,
            AssetClass::Crypto => 0.04,
            AssetClass::Index => 0.02,
        }
    }

    fn volume_range(self) -> (f64, f64) {
        match self {
            AssetClass::Stock => (1_000_000.0, 10_000_000.0),
            AssetClass::Crypto => (5_000_000.0, 50_000_000.0),
            AssetClass::Index => (10_000_000.0, 100_000_000.0),
        }
    }

    /// Weight of the shared market component versus the symbol-specific one
    fn market_weight(self) -> f64 {
        match self {
            AssetClass::Stock => 0.7,
            AssetClass::Crypto => 0.6,
            AssetClass::Index => 1.0,
        }
    }
}

// 各标的基准价格表，未知标的回退到100
fn stock_base_price(symbol: &str) -> f64 {
    match symbol {
        "AAPL" => 180.0,
        "MSFT" => 420.0,
        "AMZN" => 185.0,
        "GOOGL" => 175.0,
        "META" => 485.0,
        "TSLA" => 175.0,
        "NVDA" => 880.0,
        "JPM" => 195.0,
        "JNJ" => 150.0,
        "V" => 275.0,
        "SPY" => 500.0,
        "QQQ" => 420.0,
        "DIA" => 380.0,
        "IWM" => 200.0,
        "VTI" => 240.0,
        _ => 100.0,
    }
}

fn crypto_base_price(symbol: &str) -> f64 {
    match symbol {
        "BTC" => 68_000.0,
        "ETH" => 3_500.0,
        "BNB" => 600.0,
        "SOL" => 150.0,
        "XRP" => 0.50,
        "ADA" => 0.45,
        "DOGE" => 0.15,
        "DOT" => 7.0,
        "LINK" => 15.0,
        "LTC" => 80.0,
        _ => 100.0,
    }
}

fn index_base_value(symbol: &str) -> f64 {
    match symbol {
        "TOTAL" | "GLOBAL_MCAP" => 2_500_000_000_000.0,
        "TOTAL2" => 1_500_000_000_000.0, // excluding BTC
        "TOTAL3" => 800_000_000_000.0,   // excluding BTC & ETH
        "DEFI" => 100_000_000_000.0,
        "DEX" => 50_000_000_000.0,
        "CEX" => 80_000_000_000.0,
        "NFT" => 25_000_000_000.0,
        "PRIVACY" => 15_000_000_000.0,
        _ => 50_000_000_000.0,
    }
}

fn is_crypto_index(symbol: &str) -> bool {
    matches!(
        symbol,
        "TOTAL" | "GLOBAL_MCAP" | "TOTAL2" | "TOTAL3" | "DEFI" | "DEX" | "CEX" | "NFT" | "PRIVACY"
    )
}

/// 模拟数据提供者，基于带种子的随机游走生成可复现的OHLC序列
pub struct MockProvider {
    market: MockMarket,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockMarket {
    Stocks,
    Cryptos,
}

impl MockProvider {
    pub fn stocks() -> Self {
        Self {
            market: MockMarket::Stocks,
        }
    }

    pub fn cryptos() -> Self {
        Self {
            market: MockMarket::Cryptos,
        }
    }

    fn mock_end_date() -> NaiveDate {
        let (y, m, d) = MOCK_END_DATE;
        // Constant is always a valid calendar date
        NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
    }

    fn classify(&self, symbol: &str) -> AssetClass {
        match self.market {
            MockMarket::Stocks => AssetClass::Stock,
            MockMarket::Cryptos if is_crypto_index(symbol) => AssetClass::Index,
            MockMarket::Cryptos => AssetClass::Crypto,
        }
    }

    fn base_price(&self, symbol: &str, class: AssetClass) -> f64 {
        match class {
            AssetClass::Stock => stock_base_price(symbol),
            AssetClass::Crypto => crypto_base_price(symbol),
            AssetClass::Index => index_base_value(symbol),
        }
    }

    fn generate(&self, symbol: &str, range_days: u32) -> Series {
        let class = self.classify(symbol);
        let end = Self::mock_end_date();
        let dates = match class {
            // Equities only print weekday candles
            AssetClass::Stock => util::weekdays_back(end, range_days),
            AssetClass::Crypto | AssetClass::Index => util::calendar_days_back(end, range_days),
        };

        let mut rng = StdRng::seed_from_u64(MOCK_BASE_SEED ^ util::seed_for_symbol(symbol));
        let volatility = class.volatility();
        let market_weight = class.market_weight();
        let (vol_lo, vol_hi) = class.volume_range();

        let mut close = self.base_price(symbol, class);
        let mut points = Vec::with_capacity(dates.len());

        for date in dates {
            // Bounded drift: shared market component plus symbol-specific noise
            let market_drift = rng.gen_range(-0.01..=0.01) + 0.001;
            let specific_drift = rng.gen_range(-volatility..=volatility);
            let change = market_weight * market_drift + (1.0 - market_weight) * specific_drift;
            close *= 1.0 + change;

            let daily_range = volatility * close;
            let mut high = close + rng.gen_range(0.0..=daily_range);
            let mut low = close - rng.gen_range(0.0..=daily_range);
            let open = rng.gen_range(low..=high);

            // Clamp so that low <= open, close <= high always holds
            high = high.max(open).max(close);
            low = low.min(open).min(close);

            points.push(PricePoint {
                date,
                open,
                high,
                low,
                close,
                volume: rng.gen_range(vol_lo..=vol_hi).round(),
            });
        }

        if class == AssetClass::Index {
            Series::approximated(symbol, points)
        } else {
            Series::new(symbol, points)
        }
    }
}

#[async_trait]
impl DataProvider for MockProvider {
    fn source_name(&self) -> &'static str {
        match self.market {
            MockMarket::Stocks => "mock-stocks",
            MockMarket::Cryptos => "mock-cryptos",
        }
    }

    async fn fetch_series(&self, symbol: &str, range_days: u32) -> ProviderResult<Series> {
        let symbol = util::normalize_symbol(symbol)?;
        util::validate_range_days(&symbol, range_days)?;

        debug!("Generating {} mock points for {}", range_days, symbol);
        Ok(self.generate(&symbol, range_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ProviderError;
    use chrono::{Datelike, Weekday};

    #[tokio::test]
    async fn mock_stock_series_has_exactly_n_weekday_points() {
        let provider = MockProvider::stocks();
        let series = provider.fetch_series("AAPL", 30).await.unwrap();

        assert_eq!(series.len(), 30);
        assert!(!series.is_approximated);
        assert!(series
            .points
            .iter()
            .all(|p| !matches!(p.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[tokio::test]
    async fn mock_series_dates_are_strictly_ascending() {
        let provider = MockProvider::cryptos();
        let series = provider.fetch_series("BTC", 60).await.unwrap();

        assert_eq!(series.len(), 60);
        assert!(series.points.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[tokio::test]
    async fn every_mock_point_satisfies_ohlc_invariant() {
        for provider in [MockProvider::stocks(), MockProvider::cryptos()] {
            for symbol in ["AAPL", "NVDA", "BTC", "XRP", "UNKNOWN"] {
                let series = provider.fetch_series(symbol, 90).await.unwrap();
                for p in &series.points {
                    assert!(p.low <= p.open && p.open <= p.high, "{}: {:?}", symbol, p);
                    assert!(p.low <= p.close && p.close <= p.high, "{}: {:?}", symbol, p);
                    assert!(p.low > 0.0);
                    assert!(p.volume >= 0.0);
                }
            }
        }
    }

    #[tokio::test]
    async fn same_symbol_reproduces_same_series() {
        let provider = MockProvider::stocks();
        let a = provider.fetch_series("MSFT", 30).await.unwrap();
        let b = provider.fetch_series("msft", 30).await.unwrap();
        assert_eq!(a.points, b.points);

        let other = provider.fetch_series("TSLA", 30).await.unwrap();
        assert_ne!(a.points, other.points);
    }

    #[tokio::test]
    async fn total_index_is_flagged_as_approximated() {
        let provider = MockProvider::cryptos();
        let series = provider.fetch_series("TOTAL", 30).await.unwrap();
        assert!(series.is_approximated);
        // Market-cap scale, not a coin price
        assert!(series.last_close().unwrap() > 1e11);
    }

    #[tokio::test]
    async fn sector_indexes_are_approximated_at_index_scale() {
        let provider = MockProvider::cryptos();
        for symbol in ["TOTAL2", "TOTAL3", "DEFI", "DEX", "CEX", "NFT", "PRIVACY"] {
            let series = provider.fetch_series(symbol, 14).await.unwrap();
            assert!(series.is_approximated, "{} should be approximated", symbol);
            assert!(series.last_close().unwrap() > 1e9, "{} not index-scale", symbol);
        }
    }

    #[tokio::test]
    async fn zero_range_days_is_rejected() {
        let provider = MockProvider::stocks();
        assert!(matches!(
            provider.fetch_series("AAPL", 0).await,
            Err(ProviderError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn empty_symbol_is_rejected() {
        let provider = MockProvider::cryptos();
        assert!(matches!(
            provider.fetch_series("  ", 30).await,
            Err(ProviderError::InvalidArgument(_))
        ));
    }
}
