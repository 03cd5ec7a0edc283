//! The gated signal pipeline.
//!
//! Gates run in a fixed order and the first one that fails ends the run:
//!
//! 1. validate series lengths
//! 2. classify the HTF trend (weak ranges stop here)
//! 3. session filter on the latest LTF candle
//! 4. premium/discount classification of the latest LTF close
//! 5. order block and fair value gap scan on the HTF
//! 6. zone match on the latest LTF close
//! 7. sweep and break-of-structure confirmation on the LTF
//! 8. zone strength and grade
//! 9. stop and target from the matched zone
//!
//! A range trend that clears gate 2 follows the bearish path in every
//! direction-dependent step, including the stop/target arithmetic.

use std::fmt;

use thiserror::Error;
use tracing::{debug, error, info};

use super::config::StrategyConfig;
use crate::analysis::{
    break_of_structure, deduplicate, fair_value_gaps, grade, liquidity_sweep, order_blocks,
    premium_discount, zone_strength, TrendClassifier, WeightedTrend,
};
use crate::domain::{risk_reward, Candle, EntryRange, Session, Side, Signal, Trend};

/// A fault inside the pipeline. Distinct from a rejection, which is the
/// normal "no signal" result of a gate.
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("non-finite {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("empty analysis window: {0}")]
    EmptyWindow(&'static str),
}

/// Which gate stopped a run.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    InsufficientData { htf: usize, ltf: usize },
    WeakRange { confidence: f64 },
    SessionMismatch { required: Session, actual: Session },
    NoStructure,
    PriceOutsideZones { price: f64 },
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InsufficientData { htf, ltf } => {
                write!(f, "insufficient data (htf={htf}, ltf={ltf})")
            }
            Self::WeakRange { confidence } => {
                write!(f, "range market with weak confidence {confidence:.2}")
            }
            Self::SessionMismatch { required, actual } => {
                write!(f, "session {actual} does not match filter {required}")
            }
            Self::NoStructure => f.write_str("no order blocks or fair value gaps"),
            Self::PriceOutsideZones { price } => write!(f, "price {price} is not inside any zone"),
        }
    }
}

/// Result of a pipeline run that did not fault.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Signal(Signal),
    Rejected(Rejection),
}

impl Outcome {
    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Signal(_) => None,
            Self::Rejected(rejection) => Some(rejection),
        }
    }
}

/// Smart-money-concepts strategy over a higher and a lower timeframe.
///
/// Holds only configuration, so one instance can serve concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct SmcStrategy {
    config: StrategyConfig,
    classifier: WeightedTrend,
}

impl SmcStrategy {
    pub fn new(config: StrategyConfig) -> Self {
        let classifier = WeightedTrend::new(config.trend.clone());
        Self { config, classifier }
    }

    pub fn config(&self) -> &StrategyConfig {
        &self.config
    }

    /// Run the pipeline, collapsing rejections and faults into `None`.
    pub fn run(&self, htf: &[Candle], ltf: &[Candle]) -> Option<Signal> {
        match self.evaluate(htf, ltf) {
            Ok(Outcome::Signal(signal)) => {
                info!(
                    side = %signal.side,
                    entry = signal.entry_price(),
                    grade = %signal.confidence,
                    dedup_id = %signal.dedup_id,
                    "signal generated"
                );
                Some(signal)
            }
            Ok(Outcome::Rejected(rejection)) => {
                debug!(%rejection, "no signal");
                None
            }
            Err(e) => {
                error!(error = %e, "strategy fault");
                None
            }
        }
    }

    /// Run every gate and report either the signal or the gate that stopped it.
    pub fn evaluate(&self, htf: &[Candle], ltf: &[Candle]) -> Result<Outcome, AnalysisError> {
        let cfg = &self.config;

        let enough = htf.len() >= cfg.min_htf_candles && ltf.len() >= cfg.min_ltf_candles;
        let latest = match ltf.last() {
            Some(latest) if enough => latest,
            _ => {
                return Ok(Outcome::Rejected(Rejection::InsufficientData {
                    htf: htf.len(),
                    ltf: ltf.len(),
                }))
            }
        };
        debug!(htf = htf.len(), ltf = ltf.len(), "data validated");

        let reading = self.classifier.classify(htf);
        debug!(trend = %reading.trend, confidence = reading.confidence, "htf trend");
        if reading.trend == Trend::Range && reading.confidence < cfg.range_min_confidence {
            return Ok(Outcome::Rejected(Rejection::WeakRange {
                confidence: reading.confidence,
            }));
        }
        let trend = reading.trend;

        let session = Session::at(latest.time);
        if let Some(required) = cfg.session_filter {
            if session != required {
                return Ok(Outcome::Rejected(Rejection::SessionMismatch {
                    required,
                    actual: session,
                }));
            }
        }
        debug!(%session, "session resolved");

        let price = finite("latest close", latest.close)?;
        let bands = premium_discount(htf, cfg.premium_discount_lookback, cfg.premium_discount_band)
            .ok_or(AnalysisError::EmptyWindow("premium/discount"))?;
        let zone_type = bands.classify(price);
        debug!(price, %zone_type, "price zone");

        let mut zones = order_blocks(htf, trend, cfg.zone_lookback, cfg.order_block_body_ratio);
        let order_block_count = zones.len();
        zones.extend(fair_value_gaps(htf, trend, cfg.zone_lookback));
        debug!(
            order_blocks = order_block_count,
            fair_value_gaps = zones.len() - order_block_count,
            "structure scan"
        );
        if zones.is_empty() {
            return Ok(Outcome::Rejected(Rejection::NoStructure));
        }

        let matched = deduplicate(&zones, price);
        let Some(zone) = matched.zone else {
            return Ok(Outcome::Rejected(Rejection::PriceOutsideZones { price }));
        };
        debug!(
            source = %matched.source,
            dedup_id = %matched.dedup_id,
            low = zone.low,
            high = zone.high,
            "zone matched"
        );

        let sweep = liquidity_sweep(ltf, trend, cfg.sweep_window, cfg.sweep_tolerance);
        let structure_break = break_of_structure(ltf, trend, &cfg.structure);
        let strength = zone_strength(price, &zone);
        let confidence = grade(sweep, structure_break, strength, cfg.strength_threshold);
        debug!(sweep, structure_break, strength, %confidence, "scored");

        let (side, stop_loss, take_profit) = if trend.is_bullish() {
            let stop = zone.low;
            (Side::Buy, stop, price + cfg.reward_multiple * (price - stop))
        } else {
            let stop = zone.high;
            (Side::Sell, stop, price - cfg.reward_multiple * (stop - price))
        };
        let take_profit = finite("take profit", take_profit)?;

        Ok(Outcome::Signal(Signal {
            side,
            entry: EntryRange::point(price),
            stop_loss,
            take_profit,
            trend,
            zone_type,
            zone_source: matched.source,
            dedup_id: matched.dedup_id,
            confidence,
            zone_strength: strength,
            risk_reward: risk_reward(price, stop_loss, take_profit),
            trend_strength: reading.confidence,
            session,
        }))
    }
}

fn finite(what: &'static str, value: f64) -> Result<f64, AnalysisError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(AnalysisError::NonFinite { what, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::candles_from_closes;

    fn flat(n: usize) -> Vec<Candle> {
        candles_from_closes(&vec![100.0; n])
    }

    #[test]
    fn short_series_are_rejected() {
        let strategy = SmcStrategy::default();
        let outcome = strategy.evaluate(&flat(10), &flat(30)).unwrap();
        assert_eq!(
            outcome,
            Outcome::Rejected(Rejection::InsufficientData { htf: 10, ltf: 30 })
        );
        assert!(strategy.run(&flat(60), &flat(19)).is_none());
        assert!(strategy.run(&[], &[]).is_none());
    }

    #[test]
    fn flat_market_is_a_weak_range() {
        // Equal swings and a flat MA stack score range 0.35; zero bullish
        // candles score bearish 0.3. Range wins below the 0.5 floor.
        let strategy = SmcStrategy::default();
        let outcome = strategy.evaluate(&flat(60), &flat(30)).unwrap();
        assert!(matches!(outcome.rejection(), Some(Rejection::WeakRange { .. })));
    }

    #[test]
    fn non_finite_price_is_a_fault_not_a_rejection() {
        let strategy = SmcStrategy::default();
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64).collect();
        let htf = candles_from_closes(&closes);
        let mut ltf = flat(30);
        if let Some(last) = ltf.last_mut() {
            last.close = f64::NAN;
        }
        assert!(matches!(
            strategy.evaluate(&htf, &ltf),
            Err(AnalysisError::NonFinite { what: "latest close", .. })
        ));
        assert!(strategy.run(&htf, &ltf).is_none());
    }

    #[test]
    fn rejections_render_the_gate() {
        let r = Rejection::SessionMismatch {
            required: Session::London,
            actual: Session::Tokyo,
        };
        assert_eq!(r.to_string(), "session tokyo does not match filter london");
        assert_eq!(Rejection::NoStructure.to_string(), "no order blocks or fair value gaps");
    }
}
