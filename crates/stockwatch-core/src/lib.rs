pub mod app_config;
pub mod config;
pub mod error;
pub mod monitors;
pub mod verdict;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env, DEFAULT_USER_AGENT};
pub use error::ConfigError;
pub use monitors::{
    load_monitors, parse_monitors, CssSelector, Destination, DetectionRule, MonitorSpec,
    MonitorsFormat, SelectorRule, SubstringRule, DEFAULT_ALWAYS_IN_STOCK_TEXT,
    MAX_INTERVAL_SECS,
};
pub use verdict::StockVerdict;
