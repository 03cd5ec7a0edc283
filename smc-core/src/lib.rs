//! SMC Core: smart-money-concepts analysis and signal assembly.
//!
//! This crate contains the signal engine:
//! - Domain types (candles, zones, sessions, signals)
//! - Swing, trend, order block, fair value gap, sweep and structure detectors
//! - Premium/discount banding, zone deduplication and confidence grading
//! - The gated strategy pipeline that turns two candle series into a signal
//! - Market-data providers (exchange REST, CSV) and notification channels

pub mod analysis;
pub mod data;
pub mod domain;
pub mod indicators;
pub mod notify;
pub mod strategy;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use domain::{Candle, Signal};
pub use strategy::{Outcome, Rejection, SmcStrategy, StrategyConfig};
