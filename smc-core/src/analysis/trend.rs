//! Higher-timeframe trend classification.
//!
//! Two classifiers share the `TrendClassifier` interface:
//! - `WeightedTrend` scores swing structure (0.4), the close/SMA20/SMA50
//!   stack (0.3) and candle bias (0.3) and returns the leading label with its
//!   score as confidence. This is the one the strategy uses.
//! - `CascadeTrend` applies the same ingredients as an ordered rule list and
//!   returns the first rule that decides. It is kept for parity checks.

use serde::{Deserialize, Serialize};

use crate::domain::{max_high, min_low, tail, Candle, Trend, TrendReading};
use crate::indicators::Sma;

use super::swing::{last_pair, swing_highs, swing_lows, TREND_SWING_WINDOW};

const SWING_WEIGHT: f64 = 0.4;
const SWING_RANGE_WEIGHT: f64 = 0.2;
const MA_WEIGHT: f64 = 0.3;
const MA_RANGE_WEIGHT: f64 = 0.15;
const BIAS_WEIGHT: f64 = 0.3;
const BIAS_RANGE_WEIGHT: f64 = 0.15;

/// Tunable inputs shared by both classifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendParams {
    /// Number of trailing candles analysed.
    pub lookback: usize,
    /// Half-window for swing detection.
    pub swing_window: usize,
    pub fast_ma: usize,
    pub slow_ma: usize,
    /// Bullish-candle fraction above which the bias reads bullish.
    pub bullish_bias: f64,
    /// Bullish-candle fraction below which the bias reads bearish.
    pub bearish_bias: f64,
    /// Series shorter than this are always `(range, 0.0)`.
    pub min_candles: usize,
    /// Window of the cascade's progression rule.
    pub progression_window: usize,
}

impl Default for TrendParams {
    fn default() -> Self {
        Self {
            lookback: 50,
            swing_window: TREND_SWING_WINDOW,
            fast_ma: 20,
            slow_ma: 50,
            bullish_bias: 0.6,
            bearish_bias: 0.4,
            min_candles: 20,
            progression_window: 10,
        }
    }
}

/// Classifies a candle series into a trend label with a confidence.
pub trait TrendClassifier: Send + Sync {
    /// Human-readable name (e.g., "weighted", "cascade").
    fn name(&self) -> &str;

    fn classify(&self, candles: &[Candle]) -> TrendReading;
}

/// Weighted-scoring classifier.
#[derive(Debug, Clone, Default)]
pub struct WeightedTrend {
    pub params: TrendParams,
}

impl WeightedTrend {
    pub fn new(params: TrendParams) -> Self {
        Self { params }
    }
}

/// Accumulated evidence per label.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TrendScores {
    pub bullish: f64,
    pub bearish: f64,
    pub range: f64,
}

impl TrendScores {
    fn add(&mut self, trend: Trend, weight: f64) {
        match trend {
            Trend::Bullish => self.bullish += weight,
            Trend::Bearish => self.bearish += weight,
            Trend::Range => self.range += weight,
        }
    }

    /// Highest-scoring label; ties go to bullish, then bearish.
    pub fn leader(&self) -> TrendReading {
        let mut best = TrendReading::new(Trend::Bullish, self.bullish);
        if self.bearish > best.confidence {
            best = TrendReading::new(Trend::Bearish, self.bearish);
        }
        if self.range > best.confidence {
            best = TrendReading::new(Trend::Range, self.range);
        }
        best
    }
}

impl WeightedTrend {
    /// Per-label scores for the trailing window.
    pub fn scores(&self, candles: &[Candle]) -> TrendScores {
        let p = &self.params;
        let window = tail(candles, p.lookback);
        let mut scores = TrendScores::default();

        match swing_structure(window, p.swing_window) {
            Some(Trend::Range) => scores.add(Trend::Range, SWING_RANGE_WEIGHT),
            Some(trend) => scores.add(trend, SWING_WEIGHT),
            None => {}
        }

        match ma_stack(window, p.fast_ma, p.slow_ma) {
            Trend::Range => scores.add(Trend::Range, MA_RANGE_WEIGHT),
            trend => scores.add(trend, MA_WEIGHT),
        }

        match candle_bias(window, p.bullish_bias, p.bearish_bias) {
            Trend::Range => scores.add(Trend::Range, BIAS_RANGE_WEIGHT),
            trend => scores.add(trend, BIAS_WEIGHT),
        }

        scores
    }
}

impl TrendClassifier for WeightedTrend {
    fn name(&self) -> &str {
        "weighted"
    }

    fn classify(&self, candles: &[Candle]) -> TrendReading {
        if candles.len() < self.params.min_candles {
            return TrendReading::undetermined();
        }
        let reading = self.scores(candles).leader();
        TrendReading::new(reading.trend, reading.confidence.clamp(0.0, 1.0))
    }
}

/// Ordered-rule classifier. Confidence is 1.0 when a rule decides a
/// direction and 0.0 when it falls through to range.
#[derive(Debug, Clone, Default)]
pub struct CascadeTrend {
    pub params: TrendParams,
}

impl CascadeTrend {
    pub fn new(params: TrendParams) -> Self {
        Self { params }
    }

    fn decide(&self, window: &[Candle]) -> Trend {
        let p = &self.params;

        if let Some(trend @ (Trend::Bullish | Trend::Bearish)) =
            swing_structure(window, p.swing_window)
        {
            return trend;
        }

        let stack = ma_stack(window, p.fast_ma, p.slow_ma);
        if stack != Trend::Range {
            return stack;
        }

        let progression = progression(tail(window, p.progression_window));
        if progression != Trend::Range {
            return progression;
        }

        candle_bias(window, p.bullish_bias, p.bearish_bias)
    }
}

impl TrendClassifier for CascadeTrend {
    fn name(&self) -> &str {
        "cascade"
    }

    fn classify(&self, candles: &[Candle]) -> TrendReading {
        if candles.len() < self.params.min_candles {
            return TrendReading::undetermined();
        }
        match self.decide(tail(candles, self.params.lookback)) {
            Trend::Range => TrendReading::new(Trend::Range, 0.0),
            trend => TrendReading::new(trend, 1.0),
        }
    }
}

/// Compare the two most recent swing highs and lows.
///
/// `None` when fewer than two of either kind exist; `Range` when the pairs
/// are neither strictly higher-high/higher-low nor lower-high/lower-low.
pub fn swing_structure(window: &[Candle], swing_window: usize) -> Option<Trend> {
    let (prev_high, last_high) = last_pair(&swing_highs(window, swing_window))?;
    let (prev_low, last_low) = last_pair(&swing_lows(window, swing_window))?;

    let higher_high = last_high.price > prev_high.price;
    let higher_low = last_low.price > prev_low.price;
    let lower_high = last_high.price < prev_high.price;
    let lower_low = last_low.price < prev_low.price;

    Some(if higher_high && higher_low {
        Trend::Bullish
    } else if lower_high && lower_low {
        Trend::Bearish
    } else {
        Trend::Range
    })
}

/// Last close against the fast and slow trailing means.
///
/// A slow mean that cannot be computed (window too short) is NaN, which fails
/// both comparisons and reads as range.
pub fn ma_stack(window: &[Candle], fast: usize, slow: usize) -> Trend {
    let Some(last) = window.last() else {
        return Trend::Range;
    };
    let fast_ma = Sma::new(fast).latest(window);
    let slow_ma = Sma::new(slow).latest(window);

    if last.close > fast_ma && fast_ma > slow_ma {
        Trend::Bullish
    } else if last.close < fast_ma && fast_ma < slow_ma {
        Trend::Bearish
    } else {
        Trend::Range
    }
}

/// Fraction of candles that closed above their open.
pub fn bullish_ratio(window: &[Candle]) -> f64 {
    if window.is_empty() {
        return 0.5;
    }
    window.iter().filter(|c| c.is_bullish()).count() as f64 / window.len() as f64
}

pub fn candle_bias(window: &[Candle], bullish_above: f64, bearish_below: f64) -> Trend {
    let ratio = bullish_ratio(window);
    if ratio > bullish_above {
        Trend::Bullish
    } else if ratio < bearish_below {
        Trend::Bearish
    } else {
        Trend::Range
    }
}

/// Latest candle against the rest of a short window.
fn progression(window: &[Candle]) -> Trend {
    let Some((last, prior)) = window.split_last() else {
        return Trend::Range;
    };
    let (Some(prior_high), Some(prior_low)) = (max_high(prior), min_low(prior)) else {
        return Trend::Range;
    };

    if last.high > prior_high && last.low > prior_low {
        Trend::Bullish
    } else if last.high < prior_high && last.low < prior_low {
        Trend::Bearish
    } else {
        Trend::Range
    }
}
