//! Market-data provider trait and structured error types.
//!
//! The strategy never fetches data itself. Callers go through a
//! `CandleProvider` (exchange REST, CSV files, or a mock in tests) and hand
//! the resulting series to the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use tracing::{error, warn};

use crate::domain::Candle;

/// Timeframes every adapter accepts.
pub const SUPPORTED_TIMEFRAMES: [&str; 11] = [
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "12h", "1d",
];

#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by exchange (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("HTTP {status} from {exchange}")]
    HttpStatus { exchange: Exchange, status: u16 },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("exchange '{0}' not supported")]
    UnsupportedExchange(String),

    #[error("timeframe '{0}' not supported")]
    UnsupportedTimeframe(String),

    #[error("no candles returned for {symbol} {timeframe}")]
    EmptySeries { symbol: String, timeframe: String },

    #[error("CSV I/O error: {0}")]
    Csv(String),
}

/// Exchanges with a REST adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Exchange {
    #[default]
    Binance,
    Bybit,
}

impl Exchange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Binance => "binance",
            Self::Bybit => "bybit",
        }
    }
}

impl fmt::Display for Exchange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Exchange {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "binance" => Ok(Self::Binance),
            "bybit" => Ok(Self::Bybit),
            other => Err(DataError::UnsupportedExchange(other.to_string())),
        }
    }
}

/// One candle-series request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchRequest {
    pub symbol: String,
    pub timeframe: String,
    pub exchange: Exchange,
    pub limit: usize,
}

impl FetchRequest {
    pub fn new(
        symbol: impl Into<String>,
        timeframe: impl Into<String>,
        exchange: Exchange,
        limit: usize,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timeframe: timeframe.into(),
            exchange,
            limit,
        }
    }
}

/// Source of ordered (oldest first) candle series.
pub trait CandleProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Candle>, DataError>;
}

/// Fetch a series, collapsing any failure into an empty one.
///
/// The pipeline's validation gate rejects an empty series, so a failed fetch
/// ends up as "no signal" rather than an error.
pub fn fetch_or_empty(provider: &dyn CandleProvider, request: &FetchRequest) -> Vec<Candle> {
    match provider.fetch(request) {
        Ok(candles) => candles,
        Err(e) => {
            error!(
                provider = provider.name(),
                symbol = %request.symbol,
                timeframe = %request.timeframe,
                error = %e,
                "fetch failed"
            );
            Vec::new()
        }
    }
}

/// Drop candles that fail the OHLC sanity check.
pub fn retain_sane(candles: &mut Vec<Candle>, symbol: &str) {
    let before = candles.len();
    candles.retain(Candle::is_sane);
    let dropped = before - candles.len();
    if dropped > 0 {
        warn!(symbol, dropped, "dropped malformed candles");
    }
}

/// `BTC/USDT`, `btc-usdt` and `BTCUSDT` all become `BTCUSDT`.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

pub fn validate_timeframe(timeframe: &str) -> Result<(), DataError> {
    if SUPPORTED_TIMEFRAMES.contains(&timeframe) {
        Ok(())
    } else {
        Err(DataError::UnsupportedTimeframe(timeframe.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Failing;

    impl CandleProvider for Failing {
        fn name(&self) -> &str {
            "failing"
        }

        fn fetch(&self, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
            Err(DataError::SymbolNotFound {
                symbol: request.symbol.clone(),
            })
        }
    }

    #[test]
    fn failed_fetch_becomes_empty_series() {
        let request = FetchRequest::new("BTC/USDT", "1h", Exchange::Binance, 100);
        assert!(fetch_or_empty(&Failing, &request).is_empty());
    }

    #[test]
    fn malformed_candles_are_dropped() {
        use chrono::{TimeZone, Utc};
        let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let good = Candle {
            time: at,
            open: 10.0,
            high: 11.0,
            low: 9.0,
            close: 10.5,
            volume: 1.0,
        };
        let inverted = Candle { high: 8.0, ..good };
        let void = Candle { close: f64::NAN, ..good };
        let mut candles = vec![good, inverted, void, good];
        retain_sane(&mut candles, "BTCUSDT");
        assert_eq!(candles, vec![good, good]);
    }

    #[test]
    fn exchange_parsing() {
        assert_eq!("Binance".parse::<Exchange>().unwrap(), Exchange::Binance);
        assert_eq!(" bybit ".parse::<Exchange>().unwrap(), Exchange::Bybit);
        assert!(matches!(
            "kraken".parse::<Exchange>(),
            Err(DataError::UnsupportedExchange(name)) if name == "kraken"
        ));
        assert_eq!(Exchange::default(), Exchange::Binance);
    }

    #[test]
    fn symbols_are_normalized() {
        assert_eq!(normalize_symbol("BTC/USDT"), "BTCUSDT");
        assert_eq!(normalize_symbol("eth-usdt"), "ETHUSDT");
        assert_eq!(normalize_symbol("SOLUSDT"), "SOLUSDT");
    }

    #[test]
    fn only_listed_timeframes_validate() {
        for tf in SUPPORTED_TIMEFRAMES {
            assert!(validate_timeframe(tf).is_ok());
        }
        assert!(matches!(validate_timeframe("7m"), Err(DataError::UnsupportedTimeframe(_))));
        assert!(validate_timeframe("1H").is_err());
    }
}
