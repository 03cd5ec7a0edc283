//! Service configuration loaded from TOML.
//!
//! ```toml
//! [strategy]
//! reward_multiple = 3.0
//!
//! [service]
//! exchange = "binance"
//! limit = 300
//! htf_timeframe = "4h"
//!
//! [telegram]
//! enabled = true
//!
//! [scanner]
//! pairs = ["BTCUSDT", "ETHUSDT"]
//! timeframe = "1h"
//! interval_secs = 120
//! ```
//!
//! Telegram credentials never live in the file; they come from
//! `TELEGRAM_BOT_TOKEN` and `TELEGRAM_CHAT_ID`.

use serde::{Deserialize, Serialize};
use std::path::Path;

use smc_core::data::{validate_timeframe, Exchange};
use smc_core::strategy::{ConfigError, StrategyConfig};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub strategy: StrategyConfig,
    pub service: ServiceSection,
    pub telegram: TelegramSection,
    pub scanner: ScannerSection,
}

/// Request defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceSection {
    pub exchange: Exchange,
    pub limit: usize,
    /// Timeframe of the trend series. When unset the request timeframe is
    /// used for both series.
    pub htf_timeframe: Option<String>,
}

impl Default for ServiceSection {
    fn default() -> Self {
        Self {
            exchange: Exchange::Binance,
            limit: 300,
            htf_timeframe: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramSection {
    pub enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerSection {
    pub pairs: Vec<String>,
    pub timeframe: String,
    pub interval_secs: u64,
}

impl Default for ScannerSection {
    fn default() -> Self {
        Self {
            pairs: vec!["BTCUSDT".into(), "ETHUSDT".into()],
            timeframe: "1h".into(),
            interval_secs: 120,
        }
    }
}

impl ServiceConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.strategy.validate()?;

        if self.service.limit == 0 {
            return Err(ConfigError::Invalid("service.limit must be positive".into()));
        }
        if let Some(tf) = &self.service.htf_timeframe {
            validate_timeframe(tf)
                .map_err(|e| ConfigError::Invalid(format!("service.htf_timeframe: {e}")))?;
        }
        validate_timeframe(&self.scanner.timeframe)
            .map_err(|e| ConfigError::Invalid(format!("scanner.timeframe: {e}")))?;
        if self.scanner.interval_secs == 0 {
            return Err(ConfigError::Invalid("scanner.interval_secs must be positive".into()));
        }
        if self.scanner.pairs.iter().any(|p| p.trim().is_empty()) {
            return Err(ConfigError::Invalid("scanner.pairs contains an empty symbol".into()));
        }
        Ok(())
    }
}
