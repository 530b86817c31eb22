// 公开导出的模块，供外部使用
pub mod config;
pub mod errors;
pub mod models;
pub mod processor;
pub mod providers;
pub mod services;

#[doc(hidden)]
pub mod util;

// 重新导出常用类型，方便使用
pub use config::Config;
pub use errors::{MarketDashError, ProcessorError, ProviderError, Result};
pub use models::series::{Direction, Metrics, PricePoint, Series};
pub use providers::DataProvider;
pub use services::panel::{Panel, PanelService};
