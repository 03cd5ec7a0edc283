//! Price zones: order blocks, fair value gaps and premium/discount bands.
//!
//! All three share a `{low, high}` shape and differ only in where they came
//! from, so they are one struct carrying an explicit origin tag.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Where a zone came from.
///
/// Order blocks and fair value gaps carry their 1-based rank in the scan that
/// produced them. Ranks are local to one detector call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneOrigin {
    OrderBlock { rank: usize },
    FairValueGap { rank: usize },
    Premium,
    Discount,
}

/// A closed price interval `[low, high]` with `low <= high`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub low: f64,
    pub high: f64,
    pub origin: ZoneOrigin,
}

impl Zone {
    /// Build a zone, ordering the bounds so that `low <= high` holds.
    pub fn new(a: f64, b: f64, origin: ZoneOrigin) -> Self {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        Self { low, high, origin }
    }

    pub fn order_block(low: f64, high: f64, rank: usize) -> Self {
        Self::new(low, high, ZoneOrigin::OrderBlock { rank })
    }

    pub fn fair_value_gap(low: f64, high: f64, rank: usize) -> Self {
        Self::new(low, high, ZoneOrigin::FairValueGap { rank })
    }

    /// Inclusive containment on both edges.
    pub fn contains(&self, price: f64) -> bool {
        self.low <= price && price <= self.high
    }

    pub fn width(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_order_block(&self) -> bool {
        matches!(self.origin, ZoneOrigin::OrderBlock { .. })
    }

    pub fn is_fair_value_gap(&self) -> bool {
        matches!(self.origin, ZoneOrigin::FairValueGap { .. })
    }

    /// Stable textual identifier: `OB_<n>`, `FVG_<n>`, `PREMIUM` or `DISCOUNT`.
    pub fn id(&self) -> String {
        match self.origin {
            ZoneOrigin::OrderBlock { rank } => format!("OB_{rank}"),
            ZoneOrigin::FairValueGap { rank } => format!("FVG_{rank}"),
            ZoneOrigin::Premium => "PREMIUM".to_string(),
            ZoneOrigin::Discount => "DISCOUNT".to_string(),
        }
    }
}

/// Which kind of structure produced the zone a signal trades from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ZoneSource {
    Ob,
    Fvg,
    Both,
    None,
}

impl ZoneSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ob => "OB",
            Self::Fvg => "FVG",
            Self::Both => "BOTH",
            Self::None => "NONE",
        }
    }
}

impl fmt::Display for ZoneSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a price sits relative to the recent range extremes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceZone {
    Premium,
    Discount,
    Neutral,
}

impl PriceZone {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Premium => "premium",
            Self::Discount => "discount",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for PriceZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_orders_bounds() {
        let zone = Zone::new(102.0, 100.0, ZoneOrigin::Premium);
        assert_eq!(zone.low, 100.0);
        assert_eq!(zone.high, 102.0);
    }

    #[test]
    fn contains_is_inclusive() {
        let zone = Zone::order_block(100.0, 102.0, 1);
        assert!(zone.contains(100.0));
        assert!(zone.contains(102.0));
        assert!(zone.contains(101.0));
        assert!(!zone.contains(99.99));
        assert!(!zone.contains(102.01));
    }

    #[test]
    fn identifiers_follow_origin() {
        assert_eq!(Zone::order_block(1.0, 2.0, 3).id(), "OB_3");
        assert_eq!(Zone::fair_value_gap(1.0, 2.0, 1).id(), "FVG_1");
        assert_eq!(Zone::new(1.0, 2.0, ZoneOrigin::Discount).id(), "DISCOUNT");
    }

    #[test]
    fn source_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ZoneSource::Both).unwrap(), "\"BOTH\"");
        assert_eq!(ZoneSource::Fvg.to_string(), "FVG");
        assert_eq!(serde_json::to_string(&PriceZone::Neutral).unwrap(), "\"neutral\"");
    }
}
