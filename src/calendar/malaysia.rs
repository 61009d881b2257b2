use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use tracing::debug;

use crate::calendar::CalendarError;
use crate::traits::calendar::HolidayCalendar;

/// First and last year of the embedded lunar tables
const FIRST_YEAR: i32 = 2015;
const LAST_YEAR: i32 = 2035;

// Lunar, Islamic and Hindu holidays follow no Gregorian rule. Each entry is
// the gazetted (first) day; Chinese New Year and Hari Raya Aidilfitri last
// two days.

const CHINESE_NEW_YEAR: &[(i32, u32, u32)] = &[
    (2015, 2, 19), (2016, 2, 8), (2017, 1, 28), (2018, 2, 16), (2019, 2, 5),
    (2020, 1, 25), (2021, 2, 12), (2022, 2, 1), (2023, 1, 22), (2024, 2, 10),
    (2025, 1, 29), (2026, 2, 17), (2027, 2, 6), (2028, 1, 26), (2029, 2, 13),
    (2030, 2, 3), (2031, 1, 23), (2032, 2, 11), (2033, 1, 31), (2034, 2, 19),
    (2035, 2, 8),
];

const HARI_RAYA_AIDILFITRI: &[(i32, u32, u32)] = &[
    (2015, 7, 17), (2016, 7, 6), (2017, 6, 25), (2018, 6, 15), (2019, 6, 5),
    (2020, 5, 24), (2021, 5, 13), (2022, 5, 2), (2023, 4, 22), (2024, 4, 10),
    (2025, 3, 31), (2026, 3, 21), (2027, 3, 10), (2028, 2, 27), (2029, 2, 15),
    (2030, 2, 5), (2031, 1, 25), (2032, 1, 14), (2033, 1, 2), (2033, 12, 23),
    (2034, 12, 12), (2035, 12, 1),
];

const HARI_RAYA_HAJI: &[(i32, u32, u32)] = &[
    (2015, 9, 24), (2016, 9, 12), (2017, 9, 1), (2018, 8, 22), (2019, 8, 11),
    (2020, 7, 31), (2021, 7, 20), (2022, 7, 10), (2023, 6, 29), (2024, 6, 17),
    (2025, 6, 7), (2026, 5, 27), (2027, 5, 17), (2028, 5, 6), (2029, 4, 24),
    (2030, 4, 14), (2031, 4, 3), (2032, 3, 22), (2033, 3, 11), (2034, 3, 1),
    (2035, 2, 18),
];

const AWAL_MUHARRAM: &[(i32, u32, u32)] = &[
    (2015, 10, 14), (2016, 10, 2), (2017, 9, 22), (2018, 9, 11), (2019, 9, 1),
    (2020, 8, 20), (2021, 8, 10), (2022, 7, 30), (2023, 7, 19), (2024, 7, 7),
    (2025, 6, 27), (2026, 6, 17), (2027, 6, 6), (2028, 5, 26), (2029, 5, 15),
    (2030, 5, 5), (2031, 4, 24), (2032, 4, 12), (2033, 4, 1), (2034, 3, 22),
    (2035, 3, 11),
];

const MAULIDUR_RASUL: &[(i32, u32, u32)] = &[
    (2015, 1, 3), (2015, 12, 24), (2016, 12, 12), (2017, 12, 1), (2018, 11, 20),
    (2019, 11, 9), (2020, 10, 29), (2021, 10, 19), (2022, 10, 8), (2023, 9, 28),
    (2024, 9, 16), (2025, 9, 5), (2026, 8, 25), (2027, 8, 15), (2028, 8, 3),
    (2029, 7, 24), (2030, 7, 13), (2031, 7, 2), (2032, 6, 21), (2033, 6, 10),
    (2034, 5, 31), (2035, 5, 20),
];

const WESAK: &[(i32, u32, u32)] = &[
    (2015, 5, 3), (2016, 5, 21), (2017, 5, 10), (2018, 5, 29), (2019, 5, 19),
    (2020, 5, 7), (2021, 5, 26), (2022, 5, 15), (2023, 5, 4), (2024, 5, 22),
    (2025, 5, 12), (2026, 5, 31), (2027, 5, 20), (2028, 5, 9), (2029, 5, 27),
    (2030, 5, 16), (2031, 5, 6), (2032, 5, 23), (2033, 5, 13), (2034, 5, 3),
    (2035, 5, 22),
];

const DEEPAVALI: &[(i32, u32, u32)] = &[
    (2015, 11, 10), (2016, 10, 29), (2017, 10, 18), (2018, 11, 6), (2019, 10, 27),
    (2020, 11, 14), (2021, 11, 4), (2022, 10, 24), (2023, 11, 12), (2024, 10, 31),
    (2025, 10, 20), (2026, 11, 8), (2027, 10, 28), (2028, 10, 17), (2029, 11, 5),
    (2030, 10, 26), (2031, 11, 14), (2032, 11, 2), (2033, 10, 22), (2034, 11, 10),
    (2035, 10, 30),
];

/// One-off national holidays: installations of the Agong, general
/// elections, the 2017 SEA Games and the extra Hari Raya day of 2023
const SPECIAL_HOLIDAYS: &[(i32, u32, u32)] = &[
    (2017, 4, 24), (2017, 9, 4), (2018, 5, 9), (2018, 5, 10), (2018, 5, 11),
    (2019, 7, 30), (2022, 11, 18), (2022, 11, 19), (2023, 4, 21), (2024, 7, 20),
];

/// Malaysian national (federal) public holidays
#[derive(Debug, Clone, Default)]
pub struct MalaysiaCalendar {
    /// Additional dates merged in at startup, keyed by year
    extra: BTreeMap<i32, BTreeSet<NaiveDate>>,
}

impl MalaysiaCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge extra holiday dates, e.g. one-off gazetted holidays
    pub fn with_extra_dates(mut self, dates: impl IntoIterator<Item = NaiveDate>) -> Self {
        for date in dates {
            self.extra.entry(date.year()).or_default().insert(date);
        }
        self
    }

    /// Read extra dates from a JSON array of `YYYY-MM-DD` strings
    pub fn with_extra_dates_file(self, path: impl AsRef<Path>) -> Result<Self, CalendarError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| CalendarError::ExtraHolidays {
            path: path.display().to_string(),
            reason: source.to_string(),
        })?;
        let dates: Vec<NaiveDate> = serde_json::from_str(&contents).map_err(|source| CalendarError::ExtraHolidays {
            path: path.display().to_string(),
            reason: source.to_string(),
        })?;
        Ok(self.with_extra_dates(dates))
    }

    /// Years covered by the embedded lunar tables
    pub fn supported_years() -> RangeInclusive<i32> {
        FIRST_YEAR..=LAST_YEAR
    }

    fn gazetted(year: i32) -> BTreeSet<NaiveDate> {
        let mut dates = BTreeSet::new();

        let mut fixed = vec![(5, 1), (8, 31), (12, 25)];
        if year >= 2010 {
            fixed.push((9, 16));
        }
        dates.extend(fixed.into_iter().filter_map(|(m, d)| NaiveDate::from_ymd_opt(year, m, d)));

        // Agong's birthday
        let agong = match year {
            ..=2017 => NaiveDate::from_weekday_of_month_opt(year, 6, Weekday::Sat, 1),
            2018 | 2019 => NaiveDate::from_ymd_opt(year, 9, 9),
            _ => NaiveDate::from_weekday_of_month_opt(year, 6, Weekday::Mon, 1),
        };
        dates.extend(agong);

        if !Self::supported_years().contains(&year) {
            debug!(year, "no lunar holiday data for year, only fixed-date holidays are known");
            return dates;
        }

        for table in [HARI_RAYA_HAJI, AWAL_MUHARRAM, MAULIDUR_RASUL, WESAK, DEEPAVALI, SPECIAL_HOLIDAYS] {
            dates.extend(table_dates(table, year));
        }
        for table in [CHINESE_NEW_YEAR, HARI_RAYA_AIDILFITRI] {
            for first in table_dates(table, year) {
                dates.insert(first);
                dates.extend(first.succ_opt());
            }
        }

        dates
    }
}

fn table_dates(table: &[(i32, u32, u32)], year: i32) -> impl Iterator<Item = NaiveDate> + '_ {
    table
        .iter()
        .filter(move |(y, _, _)| *y == year)
        .filter_map(|(y, m, d)| NaiveDate::from_ymd_opt(*y, *m, *d))
}

/// A holiday on Sunday is replaced by the next day that is neither a Sunday
/// nor already a holiday.
fn add_observed(dates: &mut BTreeSet<NaiveDate>) {
    let sundays: Vec<NaiveDate> = dates.iter().copied().filter(|d| d.weekday() == Weekday::Sun).collect();

    for sunday in sundays {
        let mut candidate = sunday + Duration::days(1);
        while candidate.weekday() == Weekday::Sun || dates.contains(&candidate) {
            candidate += Duration::days(1);
        }
        dates.insert(candidate);
    }
}

impl HolidayCalendar for MalaysiaCalendar {
    fn name(&self) -> &str {
        "Malaysia"
    }

    fn holidays_in_year(&self, year: i32) -> BTreeSet<NaiveDate> {
        let mut dates = Self::gazetted(year);
        add_observed(&mut dates);

        // an observed day can spill into January of the next year
        dates.retain(|d| d.year() == year);

        if let Some(extra) = self.extra.get(&year) {
            dates.extend(extra.iter().copied());
        }
        dates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_new_year_is_not_national() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2024);
        assert!(!holidays.contains(&ymd(2024, 1, 1)));
    }

    #[test]
    fn test_fixed_and_rule_based_dates() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2024);
        assert!(holidays.contains(&ymd(2024, 5, 1)));
        assert!(holidays.contains(&ymd(2024, 8, 31)));
        assert!(holidays.contains(&ymd(2024, 9, 16)));
        assert!(holidays.contains(&ymd(2024, 12, 25)));
        // first Monday of June 2024
        assert!(holidays.contains(&ymd(2024, 6, 3)));
        // Chinese New Year
        assert!(holidays.contains(&ymd(2024, 2, 10)));
    }

    #[test]
    fn test_sunday_holiday_is_observed_next_free_day() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2022);
        // Labour Day 2022 was a Sunday, followed by two days of Hari Raya
        assert!(holidays.contains(&ymd(2022, 5, 1)));
        assert!(holidays.contains(&ymd(2022, 5, 4)));
        // Christmas 2022 was a Sunday
        assert!(holidays.contains(&ymd(2022, 12, 26)));
    }

    #[test]
    fn test_lunar_tables_cover_service_years() {
        assert_eq!(MalaysiaCalendar::supported_years(), 2015..=2035);

        let calendar = MalaysiaCalendar::new();
        for year in MalaysiaCalendar::supported_years() {
            let holidays = calendar.holidays_in_year(year);
            let cny = CHINESE_NEW_YEAR.iter().find(|(y, _, _)| *y == year).unwrap();
            assert!(holidays.contains(&ymd(cny.0, cny.1, cny.2)), "{}", year);
            assert!(holidays.iter().any(|d| d.month() == 10 || d.month() == 11), "{}", year);
        }
    }

    #[test]
    fn test_chinese_new_year_2026() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2026);
        assert!(!holidays.contains(&ymd(2026, 2, 16)));
        assert!(holidays.contains(&ymd(2026, 2, 17)));
        assert!(holidays.contains(&ymd(2026, 2, 18)));
    }

    #[test]
    fn test_hari_raya_2021() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2021);
        assert!(holidays.contains(&ymd(2021, 5, 13)));
        assert!(holidays.contains(&ymd(2021, 5, 14)));
    }

    #[test]
    fn test_two_aidilfitri_in_2033() {
        let holidays = MalaysiaCalendar::new().holidays_in_year(2033);
        assert!(holidays.contains(&ymd(2033, 1, 2)));
        assert!(holidays.contains(&ymd(2033, 1, 3)));
        assert!(holidays.contains(&ymd(2033, 12, 23)));
        assert!(holidays.contains(&ymd(2033, 12, 24)));
    }

    #[test]
    fn test_observed_day_skips_adjacent_holidays() {
        // Wesak 2026 falls on Sunday and the Agong's birthday takes Monday
        let holidays = MalaysiaCalendar::new().holidays_in_year(2026);
        assert!(holidays.contains(&ymd(2026, 5, 31)));
        assert!(holidays.contains(&ymd(2026, 6, 1)));
        assert!(holidays.contains(&ymd(2026, 6, 2)));

        // Sunday CNY 2030 runs into two days of Hari Raya
        let holidays = MalaysiaCalendar::new().holidays_in_year(2030);
        assert!(holidays.contains(&ymd(2030, 2, 7)));
    }

    #[test]
    fn test_special_and_agong_dates() {
        let calendar = MalaysiaCalendar::new();
        assert!(calendar.holidays_in_year(2022).contains(&ymd(2022, 11, 18)));
        assert!(calendar.holidays_in_year(2023).contains(&ymd(2023, 4, 21)));
        assert!(calendar.holidays_in_year(2018).contains(&ymd(2018, 5, 9)));
        // first Saturday of June before 2018
        assert!(calendar.holidays_in_year(2017).contains(&ymd(2017, 6, 3)));
        assert!(calendar.holidays_in_year(2019).contains(&ymd(2019, 9, 9)));
    }

    #[test]
    fn test_extra_dates_are_merged() {
        let calendar = MalaysiaCalendar::new().with_extra_dates([ymd(2024, 1, 1)]);
        assert!(calendar.holidays_in_year(2024).contains(&ymd(2024, 1, 1)));
        assert!(!calendar.holidays_in_year(2025).contains(&ymd(2024, 1, 1)));
    }

    #[test]
    fn test_extra_dates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("extra.json");
        fs::write(&path, r#"["2024-11-04"]"#).unwrap();

        let calendar = MalaysiaCalendar::new().with_extra_dates_file(&path).unwrap();
        assert!(calendar.holidays_in_year(2024).contains(&ymd(2024, 11, 4)));

        fs::write(&path, r#"["not-a-date"]"#).unwrap();
        let result = MalaysiaCalendar::new().with_extra_dates_file(&path);
        assert!(matches!(result, Err(CalendarError::ExtraHolidays { .. })));
    }
}
