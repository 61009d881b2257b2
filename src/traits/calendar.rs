use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Source of public-holiday dates for one country
pub trait HolidayCalendar: Send + Sync {
    /// Human readable name, used in logs
    fn name(&self) -> &str;

    /// All holiday dates falling in `year`
    fn holidays_in_year(&self, year: i32) -> BTreeSet<NaiveDate>;

    /// Holiday dates for every year in `first..=last`
    fn holidays_between_years(&self, first: i32, last: i32) -> BTreeSet<NaiveDate> {
        let mut dates = BTreeSet::new();
        for year in first..=last {
            dates.extend(self.holidays_in_year(year));
        }
        dates
    }
}
