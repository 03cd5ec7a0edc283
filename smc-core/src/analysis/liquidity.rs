//! Liquidity sweep detection on the lower timeframe.

use crate::domain::{max_high, min_low, tail, Candle, Trend};

/// Candles inspected for a sweep.
pub const DEFAULT_SWEEP_WINDOW: usize = 5;

/// Fractional distance from the window extreme that still counts as a touch.
pub const DEFAULT_SWEEP_TOLERANCE: f64 = 0.01;

/// Did the last candles run the recent extreme and reject it?
///
/// Bullish: the previous candle reached within `tolerance` of the window's
/// highest high and the last candle closed below it, or the last candle
/// reached that band itself and closed below its own open. Any other trend
/// checks the mirror condition on the window's lowest low.
pub fn liquidity_sweep(candles: &[Candle], trend: Trend, window: usize, tolerance: f64) -> bool {
    if window < 2 || candles.len() < window {
        return false;
    }
    let recent = tail(candles, window);
    let (prev, last) = match recent {
        [.., prev, last] => (prev, last),
        _ => return false,
    };

    if trend.is_bullish() {
        let Some(extreme) = max_high(recent) else {
            return false;
        };
        let band = extreme * (1.0 - tolerance);
        (prev.high >= band && last.close < extreme) || (last.high >= band && last.close < last.open)
    } else {
        let Some(extreme) = min_low(recent) else {
            return false;
        };
        let band = extreme * (1.0 + tolerance);
        (prev.low <= band && last.close > extreme) || (last.low <= band && last.close > last.open)
    }
}
