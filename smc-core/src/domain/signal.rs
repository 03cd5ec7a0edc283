//! The trading signal produced by one successful pipeline run.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::session::Session;
use super::zone::{PriceZone, ZoneSource};

/// Higher-timeframe trend label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Bullish,
    Bearish,
    Range,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
            Self::Range => "range",
        }
    }

    /// Direction-dependent stages only branch on bullish; bearish and range
    /// both take the bearish path.
    pub fn is_bullish(&self) -> bool {
        matches!(self, Self::Bullish)
    }
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A trend label plus its confidence in `[0.0, 1.0]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendReading {
    pub trend: Trend,
    pub confidence: f64,
}

impl TrendReading {
    pub fn new(trend: Trend, confidence: f64) -> Self {
        Self { trend, confidence }
    }

    /// The reading for a series too short to classify.
    pub fn undetermined() -> Self {
        Self::new(Trend::Range, 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signal quality grade. Ordered so that `A > B > C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Grade {
    C,
    B,
    A,
}

impl Grade {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entry presented as a range; a point entry has `low == high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntryRange {
    pub low: f64,
    pub high: f64,
}

impl EntryRange {
    pub fn point(price: f64) -> Self {
        Self {
            low: price,
            high: price,
        }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

/// A fully populated trade recommendation.
///
/// Built once per successful run and never mutated afterwards; the caller owns
/// it for rendering and delivery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub side: Side,
    pub entry: EntryRange,
    pub stop_loss: f64,
    pub take_profit: f64,
    pub trend: Trend,
    pub zone_type: PriceZone,
    pub zone_source: ZoneSource,
    pub dedup_id: String,
    pub confidence: Grade,
    pub zone_strength: f64,
    pub risk_reward: f64,
    pub trend_strength: f64,
    pub session: Session,
}

impl Signal {
    pub fn entry_price(&self) -> f64 {
        self.entry.low
    }

    /// Absolute distance from entry to stop.
    pub fn risk(&self) -> f64 {
        (self.entry_price() - self.stop_loss).abs()
    }

    /// Absolute distance from entry to target.
    pub fn reward(&self) -> f64 {
        (self.take_profit - self.entry_price()).abs()
    }
}

/// Reward divided by risk; 0 when risk is zero or the ratio is not finite.
pub fn risk_reward(entry: f64, stop_loss: f64, take_profit: f64) -> f64 {
    let risk = (entry - stop_loss).abs();
    let reward = (take_profit - entry).abs();
    if risk > 0.0 {
        let ratio = reward / risk;
        if ratio.is_finite() {
            return ratio;
        }
    }
    0.0
}
