//! Synthetic candle series shared by the integration tests.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use smc_core::Candle;

/// Appends candles that walk the close from one level to the next.
///
/// A push to a level at or above the last close makes a bullish candle with a
/// 0.2 upper wick and a 0.1 lower wick; a push below makes the mirror bearish
/// candle.
pub struct SeriesBuilder {
    candles: Vec<Candle>,
    start: DateTime<Utc>,
    step: Duration,
}

impl SeriesBuilder {
    pub fn new(
        start: DateTime<Utc>,
        step: Duration,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
    ) -> Self {
        let mut builder = Self {
            candles: Vec::new(),
            start,
            step,
        };
        builder.raw(open, high, low, close);
        builder
    }

    pub fn last_close(&self) -> f64 {
        self.candles.last().map_or(0.0, |c| c.close)
    }

    pub fn raw(&mut self, open: f64, high: f64, low: f64, close: f64) -> &mut Self {
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

    pub fn push(&mut self, next: f64) -> &mut Self {
        let last = self.last_close();
        if next >= last {
            self.raw(last, next + 0.2, last - 0.1, next)
        } else {
            self.raw(last, last + 0.1, next - 0.2, next)
        }
    }

    /// `count` pushes of `step` each from the running close.
    pub fn walk(&mut self, step: f64, count: usize) -> &mut Self {
        for _ in 0..count {
            let next = self.last_close() + step;
            self.push(next);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn build(&self) -> Vec<Candle> {
        self.candles.clone()
    }
}

pub fn utc(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).unwrap()
}

/// 80 four-hour candles trending up: two ascending swing structures, closes
/// above a rising SMA20/SMA50 stack, and one bullish order block at 100-102
/// (an impulse candle followed by a candle that undercuts its low).
pub fn bullish_htf() -> Vec<Candle> {
    let start = utc(2024, 2, 15, 0, 0);
    let mut b = SeriesBuilder::new(start, Duration::hours(4), 69.0, 70.2, 68.9, 70.0);
    for _ in 0..3 {
        b.walk(2.0, 6).walk(-1.0, 5);
    }
    for level in [93.0, 95.0, 97.0, 99.0, 100.2] {
        b.push(level);
    }
    b.raw(100.2, 102.0, 100.0, 101.8);
    b.raw(101.8, 101.9, 99.7, 99.9);
    for _ in 0..3 {
        b.walk(2.0, 6).walk(-1.0, 5);
    }
    b.walk(2.0, 6);
    b.build()
}

/// 30 fifteen-minute candles ending at 14:00 UTC (London session).
///
/// The last candle pokes to a new high and closes red at 101, which is both
/// a bullish liquidity sweep and a bullish break of structure.
pub fn bullish_ltf() -> Vec<Candle> {
    let start = utc(2024, 3, 1, 6, 45);
    let mut b = SeriesBuilder::new(start, Duration::minutes(15), 98.0, 98.2, 97.9, 98.0);
    for _ in 0..3 {
        b.walk(0.5, 4).walk(-0.5, 4);
    }
    b.walk(0.5, 4);
    b.raw(102.5, 103.0, 100.8, 101.0);
    b.build()
}

/// 61 four-hour candles chopping sideways with a slightly wider final leg.
///
/// Swings disagree (equal lows, a higher last high), the MA stack is not
/// ordered and 48% of candles are bullish, so the weighted classifier reads
/// range at exactly 0.5. Every leg top leaves a bearish order block at
/// 99.8-101.1.
pub fn range_htf() -> Vec<Candle> {
    let start = utc(2024, 2, 20, 0, 0);
    let mut b = SeriesBuilder::new(start, Duration::hours(4), 100.0, 100.2, 99.9, 100.0);
    for amplitude in [1.0, 1.0, 1.0, 1.0, 1.2] {
        b.walk(amplitude, 6).walk(-amplitude, 6);
    }
    b.build()
}

/// `n` identical candles around `price`, the last one at `last`.
pub fn flat_ltf(n: usize, price: f64, last: DateTime<Utc>) -> Vec<Candle> {
    let step = Duration::minutes(15);
    (0..n)
        .map(|i| Candle {
            time: last - step * (n - 1 - i) as i32,
            open: price,
            high: price + 0.15,
            low: price - 0.15,
            close: price,
            volume: 1000.0,
        })
        .collect()
}
