//! Domain types for the SMC signal engine

pub mod candle;
pub mod session;
pub mod signal;
pub mod zone;

pub use candle::{max_high, min_low, tail, Candle};
pub use session::Session;
pub use signal::{risk_reward, EntryRange, Grade, Side, Signal, Trend, TrendReading};
pub use zone::{PriceZone, Zone, ZoneOrigin, ZoneSource};
