//! Market-structure analysis: every detector the strategy composes.
//!
//! All functions here are pure over the candle slice they are given. Zone
//! ranks (`OB_n`, `FVG_n`) are assigned inside a single call and never shared.

pub mod confidence;
pub mod dedup;
pub mod fvg;
pub mod liquidity;
pub mod order_block;
pub mod premium_discount;
pub mod structure;
pub mod swing;
pub mod trend;

pub use confidence::{grade, zone_strength};
pub use dedup::{deduplicate, ZoneMatch};
pub use fvg::fair_value_gaps;
pub use liquidity::liquidity_sweep;
pub use order_block::order_blocks;
pub use premium_discount::{premium_discount, PremiumDiscount};
pub use structure::{break_of_structure, change_of_character, StructureParams};
pub use swing::{swing_highs, swing_lows, SwingKind, SwingPoint};
pub use trend::{CascadeTrend, TrendClassifier, TrendParams, WeightedTrend};
