//! REST kline adapters for Binance and Bybit.
//!
//! Both exchanges return string-encoded prices and epoch-millisecond open
//! times. Binance lists candles oldest first; Bybit lists them newest first
//! and is reversed here so every series leaves this module oldest first.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::provider::{
    normalize_symbol, retain_sane, validate_timeframe, CandleProvider, DataError, Exchange,
    FetchRequest,
};
use crate::domain::Candle;

const BINANCE_URL: &str = "https://api.binance.com";
const BYBIT_URL: &str = "https://api.bybit.com";

/// Largest page either exchange serves in one request.
const MAX_LIMIT: usize = 1000;

/// Bybit v5 kline envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BybitResponse {
    ret_code: i64,
    ret_msg: String,
    result: Option<BybitResult>,
}

#[derive(Debug, Deserialize)]
struct BybitResult {
    #[serde(default)]
    list: Vec<Vec<Value>>,
}

/// Blocking exchange client with a fixed-pause retry loop.
pub struct ExchangeProvider {
    client: reqwest::blocking::Client,
    max_attempts: u32,
    retry_delay: Duration,
    binance_url: String,
    bybit_url: String,
}

impl ExchangeProvider {
    pub fn new() -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| DataError::NetworkUnreachable(format!("build HTTP client: {e}")))?;

        Ok(Self {
            client,
            max_attempts: 3,
            retry_delay: Duration::from_secs(1),
            binance_url: BINANCE_URL.to_string(),
            bybit_url: BYBIT_URL.to_string(),
        })
    }

    pub fn with_retries(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Point an exchange at a different host (e.g. a testnet).
    pub fn with_base_url(mut self, exchange: Exchange, url: impl Into<String>) -> Self {
        match exchange {
            Exchange::Binance => self.binance_url = url.into(),
            Exchange::Bybit => self.bybit_url = url.into(),
        }
        self
    }

    fn kline_url(&self, request: &FetchRequest) -> Result<String, DataError> {
        validate_timeframe(&request.timeframe)?;
        let symbol = normalize_symbol(&request.symbol);
        let limit = request.limit.clamp(1, MAX_LIMIT);

        Ok(match request.exchange {
            Exchange::Binance => format!(
                "{}/api/v3/klines?symbol={symbol}&interval={}&limit={limit}",
                self.binance_url, request.timeframe
            ),
            Exchange::Bybit => format!(
                "{}/v5/market/kline?category=spot&symbol={symbol}&interval={}&limit={limit}",
                self.bybit_url,
                bybit_interval(&request.timeframe)?
            ),
        })
    }

    fn fetch_once(&self, url: &str, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| DataError::NetworkUnreachable(e.to_string()))?;

        let status = resp.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited { retry_after_secs });
        }
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                exchange: request.exchange,
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|e| DataError::NetworkUnreachable(format!("read body: {e}")))?;

        let candles = match request.exchange {
            Exchange::Binance => parse_binance(&body)?,
            Exchange::Bybit => parse_bybit(&body, &request.symbol)?,
        };
        if candles.is_empty() {
            return Err(DataError::EmptySeries {
                symbol: request.symbol.clone(),
                timeframe: request.timeframe.clone(),
            });
        }
        Ok(candles)
    }
}

impl CandleProvider for ExchangeProvider {
    fn name(&self) -> &str {
        "exchange"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
        let url = self.kline_url(request)?;
        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            match self.fetch_once(&url, request) {
                Ok(mut candles) => {
                    retain_sane(&mut candles, &request.symbol);
                    debug!(
                        exchange = %request.exchange,
                        symbol = %request.symbol,
                        timeframe = %request.timeframe,
                        count = candles.len(),
                        "fetched candles"
                    );
                    return Ok(candles);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = self.max_attempts,
                        exchange = %request.exchange,
                        symbol = %request.symbol,
                        error = %e,
                        "fetch attempt failed"
                    );
                    last_error = Some(e);
                    if attempt < self.max_attempts {
                        std::thread::sleep(self.retry_delay);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| DataError::NetworkUnreachable("no attempts made".into())))
    }
}

fn bybit_interval(timeframe: &str) -> Result<&'static str, DataError> {
    Ok(match timeframe {
        "1m" => "1",
        "3m" => "3",
        "5m" => "5",
        "15m" => "15",
        "30m" => "30",
        "1h" => "60",
        "2h" => "120",
        "4h" => "240",
        "6h" => "360",
        "12h" => "720",
        "1d" => "D",
        other => return Err(DataError::UnsupportedTimeframe(other.to_string())),
    })
}

/// Parse a Binance `/api/v3/klines` body.
pub fn parse_binance(body: &str) -> Result<Vec<Candle>, DataError> {
    let rows: Vec<Vec<Value>> = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("binance klines: {e}")))?;
    rows.iter().map(|row| parse_row(row)).collect()
}

/// Parse a Bybit `/v5/market/kline` body, returning candles oldest first.
pub fn parse_bybit(body: &str, symbol: &str) -> Result<Vec<Candle>, DataError> {
    let resp: BybitResponse = serde_json::from_str(body)
        .map_err(|e| DataError::ResponseFormatChanged(format!("bybit kline: {e}")))?;

    if resp.ret_code != 0 {
        // 10001 is Bybit's generic parameter error, which an unknown symbol triggers.
        if resp.ret_code == 10001 {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
            });
        }
        return Err(DataError::ResponseFormatChanged(format!(
            "bybit retCode {}: {}",
            resp.ret_code, resp.ret_msg
        )));
    }

    let result = resp
        .result
        .ok_or_else(|| DataError::ResponseFormatChanged("bybit response has no result".into()))?;
    let mut candles = result.list.iter().map(|row| parse_row(row)).collect::<Result<Vec<_>, _>>()?;
    candles.reverse();
    Ok(candles)
}

/// `[open_time_ms, open, high, low, close, volume, ...]`
fn parse_row(row: &[Value]) -> Result<Candle, DataError> {
    if row.len() < 6 {
        return Err(DataError::ResponseFormatChanged(format!(
            "kline row has {} fields, expected at least 6",
            row.len()
        )));
    }
    Ok(Candle {
        time: epoch_ms(&row[0])?,
        open: number(&row[1])?,
        high: number(&row[2])?,
        low: number(&row[3])?,
        close: number(&row[4])?,
        volume: number(&row[5])?,
    })
}

/// Exchanges send numbers either as JSON numbers or as decimal strings.
fn number(value: &Value) -> Result<f64, DataError> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse::<f64>().ok(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        DataError::ResponseFormatChanged(format!("expected a number, got {value}"))
    })
}

fn epoch_ms(value: &Value) -> Result<DateTime<Utc>, DataError> {
    let millis = match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse::<i64>().ok(),
        _ => None,
    };
    millis
        .and_then(DateTime::from_timestamp_millis)
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {value}")))
}
