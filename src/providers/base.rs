use crate::errors::ProviderResult;
use crate::models::series::Series;
use async_trait::async_trait;

/// Base trait for market data providers
///
/// A provider resolves one symbol into an OHLC series covering the requested
/// number of days. Implementations are selected once at startup (mock or
/// live); callers never branch on the data source per request.
#[async_trait]
pub trait DataProvider {
    /// Short name of the backing data source, used in logs
    fn source_name(&self) -> &'static str;

    /// Fetch a chronologically ascending price series for `symbol`
    async fn fetch_series(&self, symbol: &str, range_days: u32) -> ProviderResult<Series>;
}
