//! Zone strength and the A/B/C confidence grade.

use crate::domain::{Grade, Zone};

/// Strength above which a zone alone lifts a signal to B.
pub const DEFAULT_STRENGTH_THRESHOLD: f64 = 0.7;

/// How centred `price` is in `zone`: 1 at the midpoint, 0 at either edge.
///
/// Zero-width zones are 0.5. The result is clamped to `[0, 1]`, so prices
/// outside the zone score 0.
pub fn zone_strength(price: f64, zone: &Zone) -> f64 {
    let width = zone.width();
    if width == 0.0 {
        return 0.5;
    }
    let position = (price - zone.low) / width;
    let strength = 1.0 - 2.0 * (position - 0.5).abs();
    if strength.is_nan() {
        return 0.5;
    }
    strength.clamp(0.0, 1.0)
}

/// Grade a candidate signal.
///
/// A needs both confirmations and a strong zone; B needs either both
/// confirmations or a strong zone.
pub fn grade(sweep: bool, structure_break: bool, strength: f64, threshold: f64) -> Grade {
    let confirmed = sweep && structure_break;
    let strong = strength > threshold;
    match (confirmed, strong) {
        (true, true) => Grade::A,
        (true, false) | (false, true) => Grade::B,
        (false, false) => Grade::C,
    }
}
