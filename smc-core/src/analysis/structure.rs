//! Break of structure (BOS) and change of character (CHoCH).

use serde::{Deserialize, Serialize};

use super::swing::{last_pair, swing_highs, swing_lows};
use crate::domain::{max_high, min_low, tail, Candle, Trend};

/// Default structure window on the lower timeframe.
pub const DEFAULT_STRUCTURE_LOOKBACK: usize = 20;

/// Trailing candles excluded when measuring the earlier structure extreme.
pub const DEFAULT_RECENT_EXCLUSION: usize = 5;

/// Parameters shared by the structure detectors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StructureParams {
    pub lookback: usize,
    pub swing_window: usize,
    pub recent_exclusion: usize,
}

impl Default for StructureParams {
    fn default() -> Self {
        Self {
            lookback: DEFAULT_STRUCTURE_LOOKBACK,
            swing_window: super::swing::STRUCTURE_SWING_WINDOW,
            recent_exclusion: DEFAULT_RECENT_EXCLUSION,
        }
    }
}

/// Has the latest candle broken the earlier structure of the window?
///
/// Needs at least `lookback + recent_exclusion` candles. Bullish requires two
/// swing lows in the window and a latest high strictly above every high of the
/// window minus its last `recent_exclusion` candles. Other trends mirror this
/// with swing highs and a strictly lower low.
pub fn break_of_structure(candles: &[Candle], trend: Trend, params: &StructureParams) -> bool {
    if candles.len() < params.lookback + params.recent_exclusion {
        return false;
    }
    let Some(last) = candles.last() else {
        return false;
    };
    let window = tail(candles, params.lookback);
    let earlier = &window[..window.len().saturating_sub(params.recent_exclusion)];

    if trend.is_bullish() {
        if swing_lows(window, params.swing_window).len() < 2 {
            return false;
        }
        max_high(earlier).is_some_and(|structure_high| last.high > structure_high)
    } else {
        if swing_highs(window, params.swing_window).len() < 2 {
            return false;
        }
        min_low(earlier).is_some_and(|structure_low| last.low < structure_low)
    }
}

/// Is the prevailing swing pattern starting to fail?
///
/// Bullish: the latest swing low sits below the previous one. Other trends:
/// the latest swing high sits above the previous one.
pub fn change_of_character(candles: &[Candle], trend: Trend, params: &StructureParams) -> bool {
    if candles.len() < params.lookback {
        return false;
    }
    let window = tail(candles, params.lookback);

    if trend.is_bullish() {
        last_pair(&swing_lows(window, params.swing_window))
            .is_some_and(|(prev, last)| last.price < prev.price)
    } else {
        last_pair(&swing_highs(window, params.swing_window))
            .is_some_and(|(prev, last)| last.price > prev.price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::candles_from_highs_lows;

    /// Two dips then a push to a new high on the last candle.
    fn breakout_series() -> Vec<Candle> {
        let mut points = vec![(101.0, 99.0); 5];
        points.extend([
            (101.0, 99.0),
            (101.0, 99.0),
            (100.5, 98.0),
            (100.0, 97.0),
            (100.5, 98.0),
            (101.0, 99.0),
            (101.2, 99.2),
            (100.5, 98.2),
            (100.0, 97.5),
            (100.5, 98.2),
            (101.0, 99.0),
            (101.2, 99.4),
            (101.4, 99.6),
            (101.6, 99.8),
            (101.8, 100.0),
            (102.0, 100.4),
            (102.2, 100.6),
            (102.4, 100.8),
            (102.6, 100.9),
            (103.0, 101.0),
        ]);
        candles_from_highs_lows(&points)
    }

    #[test]
    fn too_short_series_never_breaks() {
        let candles = breakout_series();
        let short = &candles[candles.len() - 24..];
        assert!(!break_of_structure(short, Trend::Bullish, &StructureParams::default()));
    }

    #[test]
    fn new_high_after_two_swing_lows_is_a_bullish_break() {
        let candles = breakout_series();
        assert_eq!(candles.len(), 25);
        assert!(break_of_structure(&candles, Trend::Bullish, &StructureParams::default()));
    }

    #[test]
    fn high_inside_earlier_range_is_not_a_break() {
        let mut candles = breakout_series();
        let last = candles.last_mut().unwrap();
        last.high = 101.1;
        assert!(!break_of_structure(&candles, Trend::Bullish, &StructureParams::default()));
    }

    #[test]
    fn bearish_break_needs_a_lower_low() {
        let candles = breakout_series();
        assert!(!break_of_structure(&candles, Trend::Bearish, &StructureParams::default()));
        assert!(!break_of_structure(&candles, Trend::Range, &StructureParams::default()));
    }

    #[test]
    fn lower_swing_low_is_a_bullish_change_of_character() {
        let candles = candles_from_highs_lows(&[
            (101.0, 99.0),
            (101.0, 99.0),
            (100.0, 97.5),
            (101.0, 99.0),
            (101.5, 99.5),
            (101.0, 99.0),
            (100.0, 97.0),
            (101.0, 99.0),
            (101.5, 99.5),
        ]);
        let params = StructureParams {
            lookback: 9,
            swing_window: 1,
            ..StructureParams::default()
        };
        assert!(change_of_character(&candles, Trend::Bullish, &params));

        let mut higher = candles.clone();
        higher[6].low = 98.0;
        assert!(!change_of_character(&higher, Trend::Bullish, &params));
    }

    #[test]
    fn change_of_character_needs_full_window() {
        let candles = breakout_series();
        let params = StructureParams {
            lookback: 30,
            ..StructureParams::default()
        };
        assert!(!change_of_character(&candles, Trend::Bullish, &params));
        assert!(!change_of_character(&candles, Trend::Bearish, &params));
    }
}
