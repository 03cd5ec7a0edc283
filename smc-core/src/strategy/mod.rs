//! Strategy configuration and the signal pipeline.

pub mod config;
pub mod pipeline;

pub use config::{ConfigError, StrategyConfig};
pub use pipeline::{AnalysisError, Outcome, Rejection, SmcStrategy};
