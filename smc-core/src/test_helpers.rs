//! Candle builders shared by unit tests.

use crate::domain::Candle;
use chrono::{DateTime, Duration, TimeZone, Utc};

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap()
}

/// Candle at `base_time() + index` hours.
pub fn candle(index: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle {
        time: base_time() + Duration::hours(index as i64),
        open,
        high,
        low,
        close,
        volume: 1000.0,
    }
}

/// Synthetic candles from close prices.
///
/// open = prev_close (or close for the first candle),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0.
pub fn candles_from_closes(closes: &[f64]) -> Vec<Candle> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            candle(i, open, open.max(close) + 1.0, open.min(close) - 1.0, close)
        })
        .collect()
}

/// Candles from explicit `(high, low)` pairs with flat bodies at the midpoint.
pub fn candles_from_highs_lows(points: &[(f64, f64)]) -> Vec<Candle> {
    points
        .iter()
        .enumerate()
        .map(|(i, &(high, low))| {
            let mid = (high + low) / 2.0;
            candle(i, mid, high, low, mid)
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

pub const DEFAULT_EPSILON: f64 = 1e-10;
