use crate::config::Config;
use crate::errors::Result;
use crate::models::series::{Metrics, Series};
use crate::processor;
use crate::providers::{self, SharedProvider};
use log::{debug, info};
use serde::Serialize;

/// One rendered dashboard panel: the normalized series plus its metrics.
#[derive(Debug, Clone, Serialize)]
pub struct Panel {
    pub series: Series,
    pub metrics: Metrics,
}

/// 面板服务：持有两个数据提供者，完成一次 抓取→归一化→计算 周期
///
/// Providers are chosen once at construction; every call after that is a
/// stateless fetch-and-compute cycle with no shared mutable state.
pub struct PanelService {
    stock_provider: SharedProvider,
    crypto_provider: SharedProvider,
}

impl PanelService {
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            stock_provider: providers::stock_provider(config)?,
            crypto_provider: providers::crypto_provider(config)?,
        })
    }

    pub async fn stock_panel(&self, symbol: &str, range_days: u32) -> Result<Panel> {
        Self::build_panel(&self.stock_provider, symbol, range_days).await
    }

    pub async fn crypto_panel(&self, symbol: &str, range_days: u32) -> Result<Panel> {
        Self::build_panel(&self.crypto_provider, symbol, range_days).await
    }

    /// Fetch a stock panel and a crypto panel concurrently. The two fetches
    /// are independent and idempotent, so there is no ordering to preserve
    /// and each panel fails on its own; one bad symbol must not take the
    /// other panel down.
    pub async fn overview(
        &self,
        stock_symbol: &str,
        crypto_symbol: &str,
        range_days: u32,
    ) -> (Result<Panel>, Result<Panel>) {
        tokio::join!(
            Self::build_panel(&self.stock_provider, stock_symbol, range_days),
            Self::build_panel(&self.crypto_provider, crypto_symbol, range_days),
        )
    }

    async fn build_panel(
        provider: &SharedProvider,
        symbol: &str,
        range_days: u32,
    ) -> Result<Panel> {
        debug!(
            "Building panel for {} over {} days via {}",
            symbol,
            range_days,
            provider.source_name()
        );

        let raw = provider.fetch_series(symbol, range_days).await?;
        let series = processor::normalize(raw)?;
        let metrics = processor::compute_metrics(&series)?;

        info!(
            "Panel ready for {}: {} points, change {:.2}%",
            series.symbol,
            series.len(),
            metrics.percent_change
        );
        Ok(Panel { series, metrics })
    }
}
