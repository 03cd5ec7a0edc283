//! Trading sessions keyed by UTC hour.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Market session a timestamp falls into.
///
/// London (08–16 UTC) is checked before New York (13–21 UTC), so the
/// overlap resolves to London and New York effectively covers 16–21.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Session {
    London,
    #[serde(rename = "newyork")]
    NewYork,
    Tokyo,
    #[serde(rename = "none")]
    OffHours,
}

impl Session {
    pub fn from_hour(hour: u32) -> Self {
        if (8..16).contains(&hour) {
            Self::London
        } else if (13..21).contains(&hour) {
            Self::NewYork
        } else if hour < 8 {
            Self::Tokyo
        } else {
            Self::OffHours
        }
    }

    pub fn at(time: DateTime<Utc>) -> Self {
        Self::from_hour(time.hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::London => "london",
            Self::NewYork => "newyork",
            Self::Tokyo => "tokyo",
            Self::OffHours => "none",
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Session {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "london" => Ok(Self::London),
            "newyork" | "new_york" | "ny" => Ok(Self::NewYork),
            "tokyo" => Ok(Self::Tokyo),
            "none" => Ok(Self::OffHours),
            other => Err(format!("unknown session '{other}'")),
        }
    }
}
