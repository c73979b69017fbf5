//! Non-working-day lookup.
//!
//! Bank holidays come from the gov.uk feed for one region; weekends never
//! consult the feed. The calendar is fetched once at startup — a feed
//! outage degrades to weekend-only checks instead of refusing to boot.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::Deserialize;

use crate::date;
use crate::error::{Result, RotaError};

pub const DEFAULT_FEED_URL: &str = "https://www.gov.uk/bank-holidays.json";
pub const DEFAULT_REGION: &str = "england-and-wales";

#[derive(Debug, Deserialize)]
struct Division {
    events: Vec<Event>,
}

#[derive(Debug, Deserialize)]
struct Event {
    title: String,
    /// ISO `YYYY-MM-DD` in the feed.
    date: String,
}

/// Holiday dates for one region, plus the weekend rule.
#[derive(Debug, Default, Clone)]
pub struct HolidayCalendar {
    holidays: HashMap<NaiveDate, String>,
    /// Teams covering seven days a week treat weekends as working days.
    weekend_cover: bool,
}

impl HolidayCalendar {
    /// Weekend-only calendar, used when the feed is unavailable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_weekend_cover(mut self) -> Self {
        self.weekend_cover = true;
        self
    }

    /// Fetch the region's holidays, degrading to an empty calendar with a
    /// warning when the feed cannot be reached or parsed.
    pub fn load(region: &str) -> Self {
        match Self::fetch_from(DEFAULT_FEED_URL, region) {
            Ok(calendar) => calendar,
            Err(err) => {
                tracing::warn!(%err, region, "holiday feed unavailable, weekend checks only");
                Self::empty()
            }
        }
    }

    /// Fetch and parse the feed at `url` for `region`.
    pub fn fetch_from(url: &str, region: &str) -> Result<Self> {
        let feed: HashMap<String, Division> = reqwest::blocking::get(url)
            .map_err(|e| RotaError::HolidayFeed(e.to_string()))?
            .json()
            .map_err(|e| RotaError::HolidayFeed(e.to_string()))?;

        let mut holidays = HashMap::new();
        if let Some(division) = feed.get(region) {
            for event in &division.events {
                match NaiveDate::parse_from_str(&event.date, "%Y-%m-%d") {
                    Ok(day) => {
                        holidays.insert(day, event.title.clone());
                    }
                    Err(_) => return Err(RotaError::DateParse(event.date.clone())),
                }
            }
        } else {
            tracing::warn!(region, "region not present in holiday feed");
        }
        Ok(Self {
            holidays,
            weekend_cover: false,
        })
    }

    /// `Some(reason)` when `day` is a weekend or a listed holiday.
    pub fn non_working_day(&self, day: NaiveDate) -> Option<String> {
        if !self.weekend_cover && matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            return Some("Weekend".to_string());
        }
        self.holidays.get(&day).cloned()
    }

    /// Today's non-working reason, if any.
    pub fn today_non_working(&self) -> Option<String> {
        self.non_working_day(date::today())
    }
}
