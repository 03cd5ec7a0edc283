//! Fair value gap detection.
//!
//! A bullish gap exists between consecutive candles when the earlier high sits
//! strictly below the later low; a bearish gap when the earlier low sits
//! strictly above the later high. A gap only counts while it is unfilled by
//! every candle from the later candle to the end of the scanned window.

use crate::domain::{max_high, min_low, tail, Candle, Trend, Zone};

/// Scan the trailing `lookback` candles for unfilled fair value gaps.
///
/// Zones are ranked `FVG_1`, `FVG_2`, ... in scan order. The final candle
/// never closes a gap. Any trend other than bullish scans for bearish gaps.
pub fn fair_value_gaps(candles: &[Candle], trend: Trend, lookback: usize) -> Vec<Zone> {
    let window = tail(candles, lookback);
    let end = window.len().saturating_sub(1);

    (1..end)
        .filter_map(|i| gap_at(window, i, trend))
        .enumerate()
        .map(|(k, (low, high))| Zone::fair_value_gap(low, high, k + 1))
        .collect()
}

/// Bounds of the unfilled gap closed by `window[i]`, if any.
fn gap_at(window: &[Candle], i: usize, trend: Trend) -> Option<(f64, f64)> {
    let prev = &window[i - 1];
    let current = &window[i];
    let after = &window[i..];

    if trend.is_bullish() {
        if prev.high < current.low {
            let gap_low = prev.high;
            let unfilled = min_low(after).is_some_and(|lowest| lowest > gap_low);
            return unfilled.then_some((gap_low, current.low));
        }
    } else if prev.low > current.high {
        let gap_high = prev.low;
        let unfilled = max_high(after).is_some_and(|highest| highest < gap_high);
        return unfilled.then_some((current.high, gap_high));
    }
    None
}
