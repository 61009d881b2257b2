//! Public-holiday calendars and the weekend/holiday day counter.

use thiserror::Error;

pub mod counter;
pub mod malaysia;

pub use counter::{count_between, count_weekends_and_holidays, parse_date, DayCounts, MAX_RANGE_DAYS};
pub use malaysia::MalaysiaCalendar;

/// Errors raised by calendar lookups
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("time data '{input}' does not match format '%Y-%m-%d': {source}")]
    InvalidDate {
        input: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error("date range {start} to {end} is longer than {max_days} days")]
    RangeTooLong {
        start: chrono::NaiveDate,
        end: chrono::NaiveDate,
        max_days: i64,
    },
    #[error("cannot read extra holidays from {path}: {reason}")]
    ExtraHolidays { path: String, reason: String },
}
