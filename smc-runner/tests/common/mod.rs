//! Fixture provider, recording channel and synthetic series for the runner tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use smc_core::data::{CandleProvider, DataError, FetchRequest};
use smc_core::notify::{NotifyError, SignalChannel};
use smc_core::{Candle, Signal};
use smc_runner::{AnalysisService, ServiceSection};

// ── Series ───────────────────────────────────────────────────────────

struct Series {
    candles: Vec<Candle>,
    start: DateTime<Utc>,
    step: Duration,
}

impl Series {
    fn new(start: DateTime<Utc>, step: Duration, close: f64) -> Self {
        let mut series = Self {
            candles: Vec::new(),
            start,
            step,
        };
        series.raw(close, close + 0.2, close - 0.1, close);
        series
    }

    fn last_close(&self) -> f64 {
        self.candles.last().map_or(0.0, |c| c.close)
    }

    fn raw(&mut self, open: f64, high: f64, low: f64, close: f64) -> &mut Self {
        let time = self.start + self.step * self.candles.len() as i32;
        self.candles.push(Candle {
            time,
            open,
            high,
            low,
            close,
            volume: 1000.0,
        });
        self
    }

    fn push(&mut self, next: f64) -> &mut Self {
        let last = self.last_close();
        if next >= last {
            self.raw(last, next + 0.2, last - 0.1, next)
        } else {
            self.raw(last, last + 0.1, next - 0.2, next)
        }
    }

    fn walk(&mut self, step: f64, count: usize) -> &mut Self {
        for _ in 0..count {
            let next = self.last_close() + step;
            self.push(next);
        }
        self
    }
}

fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// 80 four-hour candles trending up with one bullish order block at 100-102.
pub fn bullish_htf() -> Vec<Candle> {
    let mut s = Series::new(utc(2024, 2, 15, 0, 0), Duration::hours(4), 70.0);
    s.candles[0].open = 69.0;
    s.candles[0].low = 68.9;
    for _ in 0..3 {
        s.walk(2.0, 6).walk(-1.0, 5);
    }
    for level in [93.0, 95.0, 97.0, 99.0, 100.2] {
        s.push(level);
    }
    s.raw(100.2, 102.0, 100.0, 101.8);
    s.raw(101.8, 101.9, 99.7, 99.9);
    for _ in 0..3 {
        s.walk(2.0, 6).walk(-1.0, 5);
    }
    s.walk(2.0, 6);
    s.candles
}

/// 30 fifteen-minute candles ending at 14:00 UTC with a sweep-and-break
/// candle that closes at 101, the middle of the order block.
pub fn bullish_ltf() -> Vec<Candle> {
    let mut s = Series::new(utc(2024, 3, 1, 6, 45), Duration::minutes(15), 98.0);
    for _ in 0..3 {
        s.walk(0.5, 4).walk(-0.5, 4);
    }
    s.walk(0.5, 4);
    s.raw(102.5, 103.0, 100.8, 101.0);
    s.candles
}

// ── Provider ─────────────────────────────────────────────────────────

/// Serves fixed series keyed by `(symbol, timeframe)` and records every request.
#[derive(Default)]
pub struct FixtureProvider {
    series: HashMap<(String, String), Vec<Candle>>,
    pub calls: Arc<Mutex<Vec<FetchRequest>>>,
}

impl FixtureProvider {
    pub fn with(mut self, symbol: &str, timeframe: &str, candles: Vec<Candle>) -> Self {
        self.series.insert((symbol.to_string(), timeframe.to_string()), candles);
        self
    }

    /// BTCUSDT serving the bullish pair on 4h / 15m.
    pub fn bullish(symbol: &str) -> Self {
        Self::default()
            .with(symbol, "4h", bullish_htf())
            .with(symbol, "15m", bullish_ltf())
    }
}

impl CandleProvider for FixtureProvider {
    fn name(&self) -> &str {
        "fixture"
    }

    fn fetch(&self, request: &FetchRequest) -> Result<Vec<Candle>, DataError> {
        self.calls.lock().unwrap().push(request.clone());
        self.series
            .get(&(request.symbol.clone(), request.timeframe.clone()))
            .cloned()
            .ok_or_else(|| DataError::SymbolNotFound {
                symbol: request.symbol.clone(),
            })
    }
}

// ── Channel ──────────────────────────────────────────────────────────

/// Records delivered `(symbol, signal)` pairs; optionally fails every delivery.
#[derive(Default, Clone)]
pub struct RecordingChannel {
    pub delivered: Arc<Mutex<Vec<(String, Signal)>>>,
    pub fail: bool,
}

impl RecordingChannel {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn count(&self) -> usize {
        self.delivered.lock().unwrap().len()
    }
}

impl SignalChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    fn deliver(&self, signal: &Signal, symbol: &str) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Transport("connection reset".into()));
        }
        self.delivered.lock().unwrap().push((symbol.to_string(), signal.clone()));
        Ok(())
    }
}

// ── Service ──────────────────────────────────────────────────────────

pub fn htf_4h() -> ServiceSection {
    ServiceSection {
        htf_timeframe: Some("4h".into()),
        ..ServiceSection::default()
    }
}

pub fn service(provider: FixtureProvider, channel: RecordingChannel) -> AnalysisService {
    AnalysisService::new(Default::default(), htf_4h(), Box::new(provider), Box::new(channel))
}
