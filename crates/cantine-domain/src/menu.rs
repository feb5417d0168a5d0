//! Menu weekday label and work-week helpers.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Hour of the menu date at which ordering closes by default.
pub const DEFAULT_CUTOFF_HOUR: u32 = 12;

/// Work-day label carried by a menu. Menus exist for Monday through Friday
/// only; the label is part of the (date, site, weekday) uniqueness key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weekday {
    Monday = 0,
    Tuesday = 1,
    Wednesday = 2,
    Thursday = 3,
    Friday = 4,
}

impl Weekday {
    pub fn from_u8(v: u8) -> Option<Self> {
        match v {
            0 => Some(Self::Monday),
            1 => Some(Self::Tuesday),
            2 => Some(Self::Wednesday),
            3 => Some(Self::Thursday),
            4 => Some(Self::Friday),
            _ => None,
        }
    }

    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Label for a calendar date. `None` on weekends.
    pub fn from_date(date: NaiveDate) -> Option<Self> {
        Self::from_u8(date.weekday().num_days_from_monday() as u8)
    }
}

/// The Monday-to-Friday dates of the week containing `today`.
pub fn work_week(today: NaiveDate) -> [NaiveDate; 5] {
    let monday = today - Days::new(today.weekday().num_days_from_monday() as u64);
    std::array::from_fn(|i| monday + Days::new(i as u64))
}

/// Default order cutoff for a menu date: noon UTC on the menu day.
pub fn default_cutoff(date: NaiveDate) -> DateTime<Utc> {
    let noon = NaiveTime::from_hms_opt(DEFAULT_CUTOFF_HOUR, 0, 0).expect("valid time");
    Utc.from_utc_datetime(&date.and_time(noon))
}
