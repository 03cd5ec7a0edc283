//! Premium/discount bands at the extremes of the recent range.

use serde::{Deserialize, Serialize};

use crate::domain::{max_high, min_low, tail, Candle, PriceZone, Zone, ZoneOrigin};

pub const DEFAULT_RANGE_LOOKBACK: usize = 100;

/// Band width as a fraction of the extreme price.
pub const DEFAULT_BAND: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumDiscount {
    /// `[max_high * (1 - band), max_high]`
    pub premium: Zone,
    /// `[min_low, min_low * (1 + band)]`
    pub discount: Zone,
}

impl PremiumDiscount {
    /// Classify a price. Premium is checked first, so an overlap of the two
    /// bands on a narrow range reads as premium.
    pub fn classify(&self, price: f64) -> PriceZone {
        if self.premium.contains(price) {
            PriceZone::Premium
        } else if self.discount.contains(price) {
            PriceZone::Discount
        } else {
            PriceZone::Neutral
        }
    }
}

/// Bands over the trailing `lookback` candles, or `None` for an empty series.
pub fn premium_discount(candles: &[Candle], lookback: usize, band: f64) -> Option<PremiumDiscount> {
    let window = tail(candles, lookback);
    let highest = max_high(window)?;
    let lowest = min_low(window)?;

    Some(PremiumDiscount {
        premium: Zone::new(highest * (1.0 - band), highest, ZoneOrigin::Premium),
        discount: Zone::new(lowest, lowest * (1.0 + band), ZoneOrigin::Discount),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{assert_approx, candles_from_highs_lows, DEFAULT_EPSILON};

    #[test]
    fn bands_hug_the_extremes() {
        let candles = candles_from_highs_lows(&[(110.0, 95.0), (150.0, 120.0), (130.0, 100.0)]);
        let bands = premium_discount(&candles, DEFAULT_RANGE_LOOKBACK, DEFAULT_BAND).unwrap();
        assert_approx(bands.premium.low, 147.0, DEFAULT_EPSILON);
        assert_eq!(bands.premium.high, 150.0);
        assert_eq!(bands.discount.low, 95.0);
        assert_approx(bands.discount.high, 96.9, DEFAULT_EPSILON);

        assert_eq!(bands.classify(149.0), PriceZone::Premium);
        assert_eq!(bands.classify(96.0), PriceZone::Discount);
        assert_eq!(bands.classify(120.0), PriceZone::Neutral);
        assert_eq!(bands.classify(150.0), PriceZone::Premium);
    }

    #[test]
    fn only_the_trailing_window_counts() {
        let candles = candles_from_highs_lows(&[(500.0, 1.0), (110.0, 100.0), (120.0, 105.0)]);
        let bands = premium_discount(&candles, 2, DEFAULT_BAND).unwrap();
        assert_eq!(bands.premium.high, 120.0);
        assert_eq!(bands.discount.low, 100.0);
    }

    #[test]
    fn overlapping_bands_classify_as_premium() {
        let candles = candles_from_highs_lows(&[(100.5, 100.0), (101.0, 100.2)]);
        let bands = premium_discount(&candles, DEFAULT_RANGE_LOOKBACK, DEFAULT_BAND).unwrap();
        assert!(bands.discount.contains(100.5));
        assert_eq!(bands.classify(100.5), PriceZone::Premium);
    }

    #[test]
    fn empty_series_has_no_bands() {
        assert!(premium_discount(&[], DEFAULT_RANGE_LOOKBACK, DEFAULT_BAND).is_none());
    }
}
