use crate::errors::{MarketDashError, Result};

/// 进程级配置，加载后只读，由构造时传入各数据提供者
#[derive(Debug, Clone)]
pub struct Config {
    pub fmp_api_key: Option<String>,
    pub cmc_api_key: Option<String>,
    pub use_mock_data: bool,
    pub debug_mode: bool,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            fmp_api_key: None,
            cmc_api_key: None,
            // 默认使用模拟数据，避免消耗API配额
            use_mock_data: true,
            debug_mode: false,
            request_timeout_secs: 10,
        }
    }

    /// Load configuration from the environment (reads `.env` when present).
    /// Missing API keys only fail validation when mock data is disabled.
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let use_mock_data = std::env::var("USE_MOCK_DATA")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true);
        let debug_mode = std::env::var("DEBUG")
            .map(|v| v == "true" || v == "1")
            .unwrap_or(false);

        let config = Self::new()
            .with_use_mock_data(use_mock_data)
            .with_debug_mode(debug_mode)
            .with_fmp_api_key(std::env::var("FMP_API_KEY").ok())
            .with_cmc_api_key(std::env::var("CMC_API_KEY").ok());

        config.validate()?;
        Ok(config)
    }

    pub fn with_fmp_api_key(mut self, key: Option<String>) -> Self {
        self.fmp_api_key = key;
        self
    }

    pub fn with_cmc_api_key(mut self, key: Option<String>) -> Self {
        self.cmc_api_key = key;
        self
    }

    pub fn with_use_mock_data(mut self, use_mock_data: bool) -> Self {
        self.use_mock_data = use_mock_data;
        self
    }

    pub fn with_debug_mode(mut self, debug_mode: bool) -> Self {
        self.debug_mode = debug_mode;
        self
    }

    pub fn with_request_timeout_secs(mut self, secs: u64) -> Self {
        self.request_timeout_secs = secs;
        self
    }

    /// Missing keys are only an error when live data is requested.
    pub fn validate(&self) -> Result<()> {
        if !self.use_mock_data {
            if self.fmp_api_key.is_none() {
                return Err(MarketDashError::Config(
                    "FMP_API_KEY is required when mock data is disabled".to_string(),
                ));
            }
            if self.cmc_api_key.is_none() {
                return Err(MarketDashError::Config(
                    "CMC_API_KEY is required when mock data is disabled".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_config_needs_no_keys() {
        assert!(Config::new().validate().is_ok());
    }

    #[test]
    fn live_config_requires_both_keys() {
        let live = Config::new().with_use_mock_data(false);
        assert!(live.validate().is_err());

        let with_one = Config::new()
            .with_use_mock_data(false)
            .with_fmp_api_key(Some("k1".to_string()));
        assert!(with_one.validate().is_err());

        let with_both = Config::new()
            .with_use_mock_data(false)
            .with_fmp_api_key(Some("k1".to_string()))
            .with_cmc_api_key(Some("k2".to_string()));
        assert!(with_both.validate().is_ok());
    }
}
