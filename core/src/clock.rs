//! Wall clock — the single source of "today" and "now".
//!
//! Report functions take explicit dates so they stay pure; the clock
//! sits at the store/tool boundary. Tests pin it with `fixed()`.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum OpsClock {
    System,
    Fixed { now: DateTime<Utc> },
}

impl OpsClock {
    pub fn system() -> Self {
        Self::System
    }

    /// Pin the clock to midday UTC on the given date.
    pub fn fixed(date: NaiveDate) -> Self {
        let now = Utc
            .from_utc_datetime(&date.and_hms_opt(12, 0, 0).unwrap_or_default());
        Self::Fixed { now }
    }

    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Self::System => Utc::now(),
            Self::Fixed { now } => *now,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}
