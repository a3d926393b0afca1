use jiff::civil::{Date, DateTime};
use jiff::tz::TimeZone;
use jiff::Zoned;

use crate::bits::BitSet;
use crate::bounds::{
    Field, DAYS_OF_MONTH, DAYS_OF_WEEK, HOURS, MAX_YEAR, MINUTES, MIN_YEAR, MONTHS, SECONDS, YEARS,
};

/// A parsed calendar schedule: one bit set per time field plus an optional
/// zone to evaluate in.
///
/// A schedule is a plain value. Once built it is never mutated by the search
/// functions, so it can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Schedule {
    pub second: BitSet,
    pub minute: BitSet,
    pub hour: BitSet,
    /// Days 1-31, plus [`BitSet::STAR`] when written as a wildcard.
    pub day_of_month: BitSet,
    pub month: BitSet,
    /// Sunday = 0 through Saturday = 6, plus [`BitSet::STAR`] when written as
    /// a wildcard.
    ///
    /// Setting the flag on either day field without covering the whole range
    /// gives a schedule with no text form; see the [`Display`] impl.
    ///
    /// [`Display`]: std::fmt::Display
    pub day_of_week: BitSet,
    /// Offsets from 1970.
    pub year: BitSet,
    /// `None` evaluates in the zone of the instant passed to the search.
    pub location: Option<TimeZone>,
}

impl Schedule {
    /// A schedule that fires every second of every year in range.
    pub fn every_second() -> Self {
        Self {
            second: SECONDS.all(),
            minute: MINUTES.all(),
            hour: HOURS.all(),
            day_of_month: DAYS_OF_MONTH.all().with_star(),
            month: MONTHS.all(),
            day_of_week: DAYS_OF_WEEK.all().with_star(),
            year: YEARS.all(),
            location: None,
        }
    }

    pub fn with_second<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.second = BitSet::from_values(values);
        self
    }

    pub fn with_minute<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.minute = BitSet::from_values(values);
        self
    }

    pub fn with_hour<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.hour = BitSet::from_values(values);
        self
    }

    /// Restrict the day of month. The field is no longer a wildcard.
    pub fn with_day_of_month<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.day_of_month = BitSet::from_values(values);
        self
    }

    pub fn with_month<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.month = BitSet::from_values(values);
        self
    }

    /// Restrict the day of week (0 = Sunday). The field is no longer a
    /// wildcard.
    pub fn with_day_of_week<I: IntoIterator<Item = u32>>(mut self, values: I) -> Self {
        self.day_of_week = BitSet::from_values(values);
        self
    }

    /// Restrict the year. Years outside 1970-2099 are ignored.
    pub fn with_year<I: IntoIterator<Item = i16>>(mut self, years: I) -> Self {
        self.year = BitSet::from_values(
            years
                .into_iter()
                .filter(|y| (MIN_YEAR..=MAX_YEAR).contains(y))
                .map(|y| (y - MIN_YEAR) as u32),
        );
        self
    }

    pub fn with_location(mut self, tz: TimeZone) -> Self {
        self.location = Some(tz);
        self
    }

    /// Each field paired with its bit set, in expression order.
    pub fn fields(&self) -> [(Field, &BitSet); 7] {
        [
            (Field::Second, &self.second),
            (Field::Minute, &self.minute),
            (Field::Hour, &self.hour),
            (Field::DayOfMonth, &self.day_of_month),
            (Field::Month, &self.month),
            (Field::DayOfWeek, &self.day_of_week),
            (Field::Year, &self.year),
        ]
    }

    /// The IANA name of the schedule's zone, if it has one.
    pub fn timezone(&self) -> Option<&str> {
        self.location.as_ref().and_then(|tz| tz.iana_name())
    }

    /// The zone a search starting at `now` runs in.
    pub(crate) fn zone_for(&self, now: &Zoned) -> TimeZone {
        self.location
            .clone()
            .unwrap_or_else(|| now.time_zone().clone())
    }

    /// Day-of-month and day-of-week combination.
    ///
    /// When either day field is a wildcard the two must both match, which
    /// reduces to the other field alone. When both are restricted, either one
    /// matching is enough.
    pub fn day_matches(&self, date: Date) -> bool {
        let dom = self.day_of_month.contains(date.day() as u32);
        let dow = self
            .day_of_week
            .contains(date.weekday().to_sunday_zero_offset() as u32);
        if self.day_of_month.is_star() || self.day_of_week.is_star() {
            dom && dow
        } else {
            dom || dow
        }
    }

    pub fn year_matches(&self, year: i16) -> bool {
        (MIN_YEAR..=MAX_YEAR).contains(&year) && self.year.contains((year - MIN_YEAR) as u32)
    }

    /// Whether every field matches a civil datetime. Fractional seconds
    /// never match.
    pub fn matches_datetime(&self, dt: DateTime) -> bool {
        dt.subsec_nanosecond() == 0
            && self.year_matches(dt.year())
            && self.month.contains(dt.month() as u32)
            && self.day_matches(dt.date())
            && self.hour.contains(dt.hour() as u32)
            && self.minute.contains(dt.minute() as u32)
            && self.second.contains(dt.second() as u32)
    }
}

impl Default for Schedule {
    fn default() -> Self {
        Self::every_second()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn mondays_on_the_15th() -> Schedule {
        let mut s = Schedule::every_second().with_day_of_month([15]);
        s.day_of_week = BitSet::from_values([1]).with_star();
        s
    }

    #[test]
    fn test_every_second_matches_everything() {
        let s = Schedule::every_second();
        assert!(s.matches_datetime(date(1970, 1, 1).at(0, 0, 0, 0)));
        assert!(s.matches_datetime(date(2099, 12, 31).at(23, 59, 59, 0)));
        assert!(!s.matches_datetime(date(2100, 1, 1).at(0, 0, 0, 0)));
        assert!(!s.matches_datetime(date(1969, 12, 31).at(23, 59, 59, 0)));
    }

    #[test]
    fn test_fractional_second_never_matches() {
        let s = Schedule::every_second();
        assert!(!s.matches_datetime(date(2024, 1, 1).at(0, 0, 0, 1)));
    }

    #[test]
    fn test_dom_with_wildcard_weekday() {
        let s = Schedule::every_second().with_day_of_month([15]);
        assert!(s.day_matches(date(2024, 1, 15)));
        assert!(!s.day_matches(date(2024, 1, 16)));
        // 2024-01-01 is a Monday
        assert!(!s.day_matches(date(2024, 1, 1)));
    }

    #[test]
    fn test_flagged_weekday_requires_both() {
        let s = mondays_on_the_15th();
        // 2024-01-15 is a Monday, 2024-02-15 a Thursday
        assert!(s.day_matches(date(2024, 1, 15)));
        assert!(!s.day_matches(date(2024, 2, 15)));
        assert!(!s.day_matches(date(2024, 1, 22)));
    }

    #[test]
    fn test_both_restricted_is_union() {
        let s = Schedule::every_second()
            .with_day_of_month([15])
            .with_day_of_week([1]);
        assert!(s.day_matches(date(2024, 1, 15)));
        assert!(s.day_matches(date(2024, 2, 15)));
        assert!(s.day_matches(date(2024, 1, 22)));
        assert!(!s.day_matches(date(2024, 1, 23)));
    }

    #[test]
    fn test_weekday_sunday_is_zero() {
        let mut s = Schedule::every_second().with_day_of_week([0]);
        s.day_of_month = DAYS_OF_MONTH.all().with_star();
        // 2024-01-07 is a Sunday
        assert!(s.day_matches(date(2024, 1, 7)));
        assert!(!s.day_matches(date(2024, 1, 8)));
    }

    #[test]
    fn test_year_builder_ignores_out_of_range() {
        let s = Schedule::every_second().with_year([1969, 2030, 2100]);
        assert_eq!(s.year, BitSet::from_values([60]));
        assert!(s.year_matches(2030));
        assert!(!s.year_matches(2031));
    }

    #[test]
    fn test_timezone_name() {
        let s = Schedule::every_second();
        assert_eq!(s.timezone(), None);
        let s = s.with_location(TimeZone::get("America/New_York").unwrap());
        assert_eq!(s.timezone(), Some("America/New_York"));
    }

    #[test]
    fn test_schedule_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Schedule>();
    }
}
