use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;
use tracing::debug;

use crate::calendar::CalendarError;
use crate::traits::calendar::HolidayCalendar;

/// Longest `start..=end` span accepted by the counter, about ten years
pub const MAX_RANGE_DAYS: i64 = 3660;

/// Weekend and public-holiday totals over a date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct DayCounts {
    pub weekends: u32,
    pub holidays: u32,
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(input: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|source| CalendarError::InvalidDate {
        input: input.to_string(),
        source,
    })
}

/// Count weekend days and holidays between two inclusive `YYYY-MM-DD` dates
pub fn count_weekends_and_holidays(
    calendar: &dyn HolidayCalendar,
    start_date: &str,
    end_date: &str,
) -> Result<DayCounts, CalendarError> {
    let start = parse_date(start_date)?;
    let end = parse_date(end_date)?;
    count_between(calendar, start, end)
}

/// Count weekend days and holidays in `start..=end`.
///
/// A day can be both a weekend and a holiday and then counts towards both
/// totals. An inverted range counts nothing. Spans longer than
/// [`MAX_RANGE_DAYS`] are rejected.
pub fn count_between(
    calendar: &dyn HolidayCalendar,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<DayCounts, CalendarError> {
    if end < start {
        return Ok(DayCounts::default());
    }
    if (end - start).num_days() >= MAX_RANGE_DAYS {
        return Err(CalendarError::RangeTooLong {
            start,
            end,
            max_days: MAX_RANGE_DAYS,
        });
    }

    let holiday_dates = calendar.holidays_between_years(start.year(), end.year());

    debug!(
        calendar = calendar.name(),
        from = start.year(),
        to = end.year(),
        dates = ?holiday_dates,
        "holiday dates"
    );

    let mut counts = DayCounts::default();
    for day in start.iter_days().take_while(|day| *day <= end) {
        if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            counts.weekends += 1;
        }
        if holiday_dates.contains(&day) {
            counts.holidays += 1;
        }
    }

    Ok(counts)
}
