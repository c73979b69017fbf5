use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotaError {
    #[error("{0} is already assigned for the day")]
    AlreadyAssigned(String),

    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    #[error("unable to parse date string '{0}': expected DD-MM-YYYY")]
    DateParse(String),

    #[error("stored date {recorded} is after today ({today})")]
    FutureDate { recorded: NaiveDate, today: NaiveDate },

    #[error("corrupt counter value under key '{0}'")]
    CorruptCounter(String),

    #[error("store error: {0}")]
    Store(String),

    #[error("holiday feed: {0}")]
    HolidayFeed(String),

    #[error("notification failed: {0}")]
    Notify(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, RotaError>;
