//! cronbits: bit set cron schedules with next and previous activation search.
//!
//! A [`Schedule`] holds one bit set per calendar field (second through year)
//! and an optional time zone. Searching walks the fields from the year down,
//! stepping each one until it matches, in either direction.
//!
//! # Examples
//!
//! ```
//! use cronbits::Schedule;
//! use jiff::civil::date;
//! use jiff::tz::TimeZone;
//!
//! let schedule: Schedule = "0 30 9 * * MON-FRI".parse().unwrap();
//! let now = date(2024, 1, 6).at(12, 0, 0, 0).to_zoned(TimeZone::UTC).unwrap();
//! let next = schedule.next_from(&now).unwrap().unwrap();
//! assert_eq!(next.date(), date(2024, 1, 8));
//! println!("{}", schedule); // "0 30 9 * * MON-FRI *"
//! ```

pub mod bits;
pub mod bounds;
pub mod display;
pub mod error;
pub mod eval;
pub mod lexer;
pub mod parser;
pub mod schedule;

pub use bits::BitSet;
pub use bounds::{Field, MAX_YEAR, MIN_YEAR};
pub use error::{ScheduleError, Span};
pub use eval::{BoundedOccurrences, Direction, Occurrences};
pub use schedule::Schedule;

use jiff::Zoned;
#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

// --- Schedule convenience methods ---

impl Schedule {
    /// Parse a cron expression string.
    pub fn parse(input: &str) -> Result<Self, ScheduleError> {
        parser::parse(input)
    }

    /// Compute the next occurrence after `now`.
    pub fn next_from(&self, now: &Zoned) -> Result<Option<Zoned>, ScheduleError> {
        eval::next_from(self, now)
    }

    /// Compute the most recent occurrence before `now`.
    pub fn previous_from(&self, now: &Zoned) -> Result<Option<Zoned>, ScheduleError> {
        eval::previous_from(self, now)
    }

    /// Compute the next `n` occurrences after `now`.
    pub fn next_n_from(&self, now: &Zoned, n: usize) -> Result<Vec<Zoned>, ScheduleError> {
        eval::next_n_from(self, now, n)
    }

    /// Compute the `n` occurrences before `now`, most recent first.
    pub fn previous_n_from(&self, now: &Zoned, n: usize) -> Result<Vec<Zoned>, ScheduleError> {
        eval::previous_n_from(self, now, n)
    }

    /// Check if a datetime matches this schedule.
    pub fn matches(&self, datetime: &Zoned) -> Result<bool, ScheduleError> {
        eval::matches(self, datetime)
    }

    /// Check if an expression parses.
    pub fn validate(input: &str) -> bool {
        parser::parse(input).is_ok()
    }

    /// Lazy iterator over occurrences after `from`.
    pub fn occurrences(&self, from: &Zoned) -> Occurrences<'_> {
        Occurrences::new(self, from.clone())
    }

    /// Lazy iterator over occurrences before `from`, latest first.
    pub fn previous_occurrences(&self, from: &Zoned) -> Occurrences<'_> {
        Occurrences::backward(self, from.clone())
    }

    /// Occurrences in the range (from, to].
    pub fn between(&self, from: &Zoned, to: &Zoned) -> BoundedOccurrences<'_> {
        eval::between(self, from, to)
    }
}

impl FromStr for Schedule {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(feature = "serde")]
impl Serialize for Schedule {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry("expression", &self.to_string())?;
        for (field, bits) in self.fields() {
            let values: Vec<i32> = bits
                .values(field.bounds())
                .map(|v| v as i32 + field.bias())
                .collect();
            map.serialize_entry(field.as_str(), &values)?;
        }
        map.serialize_entry("day-of-month-star", &self.day_of_month.is_star())?;
        map.serialize_entry("day-of-week-star", &self.day_of_week.is_star())?;
        map.serialize_entry("timezone", &self.timezone())?;

        map.end()
    }
}

#[cfg(feature = "serde")]
impl<'de> Deserialize<'de> for Schedule {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Deserialize from the expression string
        let s = String::deserialize(deserializer)?;
        Schedule::parse(&s).map_err(serde::de::Error::custom)
    }
}
