//! Indicators used by the trend classifiers.

pub mod sma;

pub use sma::Sma;
