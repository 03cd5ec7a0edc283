//! Order block detection.
//!
//! An order block is an impulse candle (body at least `body_ratio` of its
//! range, direction matching the trend) whose next candle trades through the
//! impulse's far edge: a lower low after a bullish impulse, a higher high after
//! a bearish one. The zone spans the impulse candle's low to high.

use crate::domain::{tail, Candle, Trend, Zone};

/// Minimum body-to-range ratio of an impulse candle.
pub const DEFAULT_BODY_RATIO: f64 = 0.6;

/// Scan the trailing `lookback` candles for order blocks.
///
/// Zones are returned in scan order, ranked `OB_1`, `OB_2`, ... from the left
/// of the window. The first candle and the last two are never impulses.
/// Any trend other than bullish scans for bearish blocks.
pub fn order_blocks(
    candles: &[Candle],
    trend: Trend,
    lookback: usize,
    body_ratio: f64,
) -> Vec<Zone> {
    let window = tail(candles, lookback);
    let end = window.len().saturating_sub(2);

    (1..end)
        .filter(|&i| is_order_block(&window[i], &window[i + 1], trend, body_ratio))
        .enumerate()
        .map(|(k, i)| Zone::order_block(window[i].low, window[i].high, k + 1))
        .collect()
}

fn is_order_block(impulse: &Candle, next: &Candle, trend: Trend, body_ratio: f64) -> bool {
    let strong = impulse.body() >= impulse.range() * body_ratio;
    if trend.is_bullish() {
        impulse.is_bullish() && strong && next.low < impulse.low
    } else {
        impulse.is_bearish() && strong && next.high > impulse.high
    }
}
