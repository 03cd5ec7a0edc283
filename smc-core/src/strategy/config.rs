//! Strategy configuration.
//!
//! Every heuristic constant the pipeline uses is a named field here so that
//! it can be tuned from a TOML file without touching code. The defaults are
//! the values the strategy was designed around.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::analysis::confidence::DEFAULT_STRENGTH_THRESHOLD;
use crate::analysis::liquidity::{DEFAULT_SWEEP_TOLERANCE, DEFAULT_SWEEP_WINDOW};
use crate::analysis::order_block::DEFAULT_BODY_RATIO;
use crate::analysis::premium_discount::{DEFAULT_BAND, DEFAULT_RANGE_LOOKBACK};
use crate::analysis::{StructureParams, TrendParams};
use crate::domain::Session;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyConfig {
    /// Higher-timeframe trend classifier inputs.
    pub trend: TrendParams,
    pub min_htf_candles: usize,
    pub min_ltf_candles: usize,
    /// A range reading below this confidence stops the run.
    pub range_min_confidence: f64,
    /// Only emit signals while the latest LTF candle is in this session.
    pub session_filter: Option<Session>,
    /// Window scanned for order blocks and fair value gaps.
    pub zone_lookback: usize,
    pub order_block_body_ratio: f64,
    pub premium_discount_lookback: usize,
    pub premium_discount_band: f64,
    pub sweep_window: usize,
    pub sweep_tolerance: f64,
    /// Lower-timeframe break-of-structure inputs.
    pub structure: StructureParams,
    pub strength_threshold: f64,
    /// Take-profit distance as a multiple of the stop distance.
    pub reward_multiple: f64,
}

impl Default for StrategyConfig {
    fn default() -> Self {
        Self {
            trend: TrendParams::default(),
            min_htf_candles: 50,
            min_ltf_candles: 20,
            range_min_confidence: 0.5,
            session_filter: None,
            zone_lookback: 50,
            order_block_body_ratio: DEFAULT_BODY_RATIO,
            premium_discount_lookback: DEFAULT_RANGE_LOOKBACK,
            premium_discount_band: DEFAULT_BAND,
            sweep_window: DEFAULT_SWEEP_WINDOW,
            sweep_tolerance: DEFAULT_SWEEP_TOLERANCE,
            structure: StructureParams::default(),
            strength_threshold: DEFAULT_STRENGTH_THRESHOLD,
            reward_multiple: 3.0,
        }
    }
}

impl StrategyConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string. Missing keys take
    /// their default values.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Invalid(format!("serialize: {e}")))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let windows = [
            ("trend.lookback", self.trend.lookback),
            ("trend.swing_window", self.trend.swing_window),
            ("trend.fast_ma", self.trend.fast_ma),
            ("trend.slow_ma", self.trend.slow_ma),
            ("zone_lookback", self.zone_lookback),
            ("premium_discount_lookback", self.premium_discount_lookback),
            ("structure.lookback", self.structure.lookback),
            ("structure.swing_window", self.structure.swing_window),
        ];
        if let Some((name, _)) = windows.iter().find(|(_, value)| *value == 0) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        if self.sweep_window < 2 {
            return Err(ConfigError::Invalid("sweep_window must be at least 2".into()));
        }
        if self.trend.bearish_bias > self.trend.bullish_bias {
            return Err(ConfigError::Invalid(format!(
                "trend.bearish_bias ({}) exceeds trend.bullish_bias ({})",
                self.trend.bearish_bias, self.trend.bullish_bias
            )));
        }
        if !(self.order_block_body_ratio > 0.0 && self.order_block_body_ratio <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "order_block_body_ratio must be in (0, 1], got {}",
                self.order_block_body_ratio
            )));
        }
        let fractions = [
            ("premium_discount_band", self.premium_discount_band),
            ("sweep_tolerance", self.sweep_tolerance),
            ("range_min_confidence", self.range_min_confidence),
            ("strength_threshold", self.strength_threshold),
        ];
        if let Some((name, value)) = fractions.iter().find(|(_, v)| !(0.0..=1.0).contains(v)) {
            return Err(ConfigError::Invalid(format!("{name} must be in [0, 1], got {value}")));
        }
        if !(self.reward_multiple.is_finite() && self.reward_multiple > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "reward_multiple must be positive, got {}",
                self.reward_multiple
            )));
        }
        Ok(())
    }
}
