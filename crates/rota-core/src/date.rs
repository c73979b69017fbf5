//! Day-granularity date handling.
//!
//! Every date in the store and on the wire is a calendar day rendered as
//! `DD-MM-YYYY`. Comparisons never look at time of day.

use chrono::{Local, NaiveDate};

use crate::error::{Result, RotaError};

pub const DAY_FORMAT: &str = "%d-%m-%Y";

/// Today as a calendar day in local time.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Fallback day for members with no recorded pick. Far enough in the past
/// that any cooldown window has long expired.
pub fn long_ago() -> NaiveDate {
    NaiveDate::from_ymd_opt(2006, 12, 31).expect("valid constant date")
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}

pub fn parse_day(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, DAY_FORMAT).map_err(|_| RotaError::DateParse(raw.to_string()))
}

/// Whole days from `from` to `to`. A `from` after `to` is a clock or
/// consistency violation and is refused rather than clamped.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> Result<i64> {
    if from > to {
        return Err(RotaError::FutureDate {
            recorded: from,
            today: to,
        });
    }
    Ok((to - from).num_days())
}

/// Serde adapter: `NaiveDate` as a `DD-MM-YYYY` string.
pub mod serde_day {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DAY_FORMAT;

    pub fn serialize<S: Serializer>(day: &NaiveDate, ser: S) -> Result<S::Ok, S::Error> {
        ser.serialize_str(&day.format(DAY_FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(de)?;
        NaiveDate::parse_from_str(&raw, DAY_FORMAT).map_err(serde::de::Error::custom)
    }
}

/// Serde adapter: `Option<NaiveDate>` as a `DD-MM-YYYY` string or null.
pub mod serde_opt_day {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    use super::DAY_FORMAT;

    pub fn serialize<S: Serializer>(day: &Option<NaiveDate>, ser: S) -> Result<S::Ok, S::Error> {
        match day {
            Some(d) => ser.serialize_str(&d.format(DAY_FORMAT).to_string()),
            None => ser.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<NaiveDate>, D::Error> {
        let raw = Option::<String>::deserialize(de)?;
        raw.map(|s| NaiveDate::parse_from_str(&s, DAY_FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}
