pub mod base;
pub mod cmc;
pub mod fmp;
pub mod mock;

use crate::config::Config;
use crate::errors::Result;
use log::info;
use std::sync::Arc;

pub use base::DataProvider;
pub use cmc::CmcProvider;
pub use fmp::FmpProvider;
pub use mock::MockProvider;

pub type SharedProvider = Arc<dyn DataProvider + Send + Sync>;

// 启动时一次性选择 mock 或实时实现，之后不再按请求分支

/// Select the stock data provider for this process.
pub fn stock_provider(config: &Config) -> Result<SharedProvider> {
    let provider: SharedProvider = if config.use_mock_data {
        Arc::new(MockProvider::stocks())
    } else {
        Arc::new(FmpProvider::new(config)?)
    };
    info!("Using stock provider: {}", provider.source_name());
    Ok(provider)
}

/// Select the crypto data provider for this process.
pub fn crypto_provider(config: &Config) -> Result<SharedProvider> {
    let provider: SharedProvider = if config.use_mock_data {
        Arc::new(MockProvider::cryptos())
    } else {
        Arc::new(CmcProvider::new(config)?)
    };
    info!("Using crypto provider: {}", provider.source_name());
    Ok(provider)
}
