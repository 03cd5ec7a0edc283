//! Resolve overlapping order blocks and fair value gaps into one tradable zone.

use serde::{Deserialize, Serialize};

use crate::domain::{Zone, ZoneSource};

/// The zone a price trades from, with its provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneMatch {
    pub zone: Option<Zone>,
    pub source: ZoneSource,
    pub dedup_id: String,
}

impl ZoneMatch {
    pub fn none() -> Self {
        Self {
            zone: None,
            source: ZoneSource::None,
            dedup_id: ZoneSource::None.as_str().to_string(),
        }
    }

    pub fn is_match(&self) -> bool {
        self.zone.is_some()
    }
}

/// Pick the zone containing `price`.
///
/// The first order block and the first fair value gap (in scan order) that
/// contain the price are found independently. When both match, the gap's
/// bounds win and the identifier is `<fvg>+<ob>`.
pub fn deduplicate(zones: &[Zone], price: f64) -> ZoneMatch {
    let order_block = zones.iter().find(|z| z.is_order_block() && z.contains(price));
    let gap = zones.iter().find(|z| z.is_fair_value_gap() && z.contains(price));

    match (gap, order_block) {
        (Some(gap), Some(ob)) => ZoneMatch {
            zone: Some(*gap),
            source: ZoneSource::Both,
            dedup_id: format!("{}+{}", gap.id(), ob.id()),
        },
        (Some(gap), None) => ZoneMatch {
            zone: Some(*gap),
            source: ZoneSource::Fvg,
            dedup_id: gap.id(),
        },
        (None, Some(ob)) => ZoneMatch {
            zone: Some(*ob),
            source: ZoneSource::Ob,
            dedup_id: ob.id(),
        },
        (None, None) => ZoneMatch::none(),
    }
}
