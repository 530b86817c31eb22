use thiserror::Error;

/// 数据提供者错误
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Symbol not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),
}

/// 数据处理器错误
#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Series contains no points")]
    EmptySeries,
}

#[derive(Error, Debug)]
pub enum MarketDashError {
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Processor error: {0}")]
    Processor(#[from] ProcessorError),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MarketDashError>;

/// Result type used at the provider boundary; callers decide retry policy.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

impl ProviderError {
    /// Map a reqwest failure into the provider taxonomy. Timeouts are kept
    /// distinct so each panel can render its own fallback state.
    pub fn from_request(symbol: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout(format!("{}: {}", symbol, err))
        } else {
            ProviderError::UpstreamFailure(format!("{}: {}", symbol, err))
        }
    }
}
