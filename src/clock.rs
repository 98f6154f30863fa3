use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::zones;

pub const DEFAULT_REFRESH_MS: u64 = 1000;

/// The three lines of the clock screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClockFace {
    pub time: String,
    pub date: String,
    pub zone: String,
}

impl ClockFace {
    pub fn at(now: DateTime<Utc>, tz: Tz) -> Self {
        let local = now.with_timezone(&tz);
        Self {
            time: local.format("%H:%M").to_string(),
            date: local.format("%A, %d %b %Y").to_string(),
            zone: zones::label_for(tz, now),
        }
    }
}
