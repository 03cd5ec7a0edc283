//! Swing point detection.
//!
//! A swing high at `i` is a candle whose high equals the maximum high over the
//! closed window `[i - w, i + w]`; swing lows mirror this on lows. Plateaus are
//! not resolved, so a flat top can yield several adjacent swing points.

use serde::{Deserialize, Serialize};

use crate::domain::Candle;

/// Default half-window for trend swings.
pub const TREND_SWING_WINDOW: usize = 5;

/// Default half-window for lower-timeframe structure swings.
pub const STRUCTURE_SWING_WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SwingKind {
    High,
    Low,
}

/// A local extreme, indexed into the series it was detected on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

pub fn swing_highs(candles: &[Candle], window: usize) -> Vec<SwingPoint> {
    detect(candles, window, SwingKind::High)
}

pub fn swing_lows(candles: &[Candle], window: usize) -> Vec<SwingPoint> {
    detect(candles, window, SwingKind::Low)
}

fn detect(candles: &[Candle], window: usize, kind: SwingKind) -> Vec<SwingPoint> {
    let n = candles.len();
    if n < 2 * window + 1 {
        return Vec::new();
    }

    let price_of = |c: &Candle| match kind {
        SwingKind::High => c.high,
        SwingKind::Low => c.low,
    };

    (window..n - window)
        .filter_map(|i| {
            let span = candles[i - window..=i + window].iter().map(price_of);
            let extreme = match kind {
                SwingKind::High => span.fold(f64::NEG_INFINITY, f64::max),
                SwingKind::Low => span.fold(f64::INFINITY, f64::min),
            };
            let price = price_of(&candles[i]);
            (price == extreme).then_some(SwingPoint { index: i, price, kind })
        })
        .collect()
}

/// The last two points of a swing list as `(previous, latest)`.
pub fn last_pair(points: &[SwingPoint]) -> Option<(SwingPoint, SwingPoint)> {
    match points {
        [.., prev, last] => Some((*prev, *last)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::candles_from_highs_lows;

    #[test]
    fn finds_single_peak_and_trough() {
        let candles = candles_from_highs_lows(&[
            (10.0, 9.0),
            (11.0, 8.0),
            (15.0, 10.0),
            (12.0, 7.0),
            (11.0, 6.0),
            (12.0, 8.0),
            (13.0, 9.0),
        ]);
        let highs = swing_highs(&candles, 2);
        assert_eq!(highs.len(), 1);
        assert_eq!(highs[0].index, 2);
        assert_eq!(highs[0].price, 15.0);
        assert_eq!(highs[0].kind, SwingKind::High);

        let lows = swing_lows(&candles, 2);
        assert_eq!(lows.iter().map(|p| p.index).collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn plateau_yields_adjacent_points() {
        let candles = candles_from_highs_lows(&[
            (10.0, 9.0),
            (12.0, 9.0),
            (12.0, 9.5),
            (11.0, 9.2),
            (10.5, 9.1),
        ]);
        let highs = swing_highs(&candles, 1);
        assert_eq!(highs.iter().map(|p| p.index).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn series_shorter_than_window_is_empty() {
        let candles =
            candles_from_highs_lows(&[(10.0, 9.0), (11.0, 8.0), (12.0, 7.0), (11.0, 8.0)]);
        assert!(swing_highs(&candles, 2).is_empty());
        assert!(swing_lows(&candles, 2).is_empty());
    }

    #[test]
    fn edges_are_never_reported() {
        let candles = candles_from_highs_lows(&[
            (20.0, 1.0),
            (10.0, 5.0),
            (11.0, 6.0),
            (12.0, 7.0),
            (30.0, 0.5),
        ]);
        assert!(swing_highs(&candles, 1).iter().all(|p| p.index >= 1 && p.index <= 3));
        assert!(swing_lows(&candles, 1).iter().all(|p| p.index >= 1 && p.index <= 3));
    }

    #[test]
    fn last_pair_needs_two_points() {
        let p = |index| SwingPoint {
            index,
            price: index as f64,
            kind: SwingKind::High,
        };
        assert!(last_pair(&[p(1)]).is_none());
        let (prev, last) = last_pair(&[p(1), p(4), p(9)]).unwrap();
        assert_eq!((prev.index, last.index), (4, 9));
    }
}
