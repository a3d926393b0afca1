//! Valid ranges and symbolic names for every schedule field.

use std::fmt;

use crate::bits::BitSet;

/// First year a schedule can match.
pub const MIN_YEAR: i16 = 1970;

/// Last year a schedule can match.
pub const MAX_YEAR: i16 = 2099;

/// The acceptable positions of a field plus its symbolic names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
    names: Names,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Names {
    None,
    Table(&'static [(&'static str, u32)]),
    /// Four-digit year literals, stored as offsets from [`MIN_YEAR`].
    Years,
}

const MONTH_NAMES: &[(&str, u32)] = &[
    ("jan", 1),
    ("feb", 2),
    ("mar", 3),
    ("apr", 4),
    ("may", 5),
    ("jun", 6),
    ("jul", 7),
    ("aug", 8),
    ("sep", 9),
    ("oct", 10),
    ("nov", 11),
    ("dec", 12),
];

const WEEKDAY_NAMES: &[(&str, u32)] = &[
    ("sun", 0),
    ("mon", 1),
    ("tue", 2),
    ("wed", 3),
    ("thu", 4),
    ("fri", 5),
    ("sat", 6),
];

pub const SECONDS: Bounds = Bounds::numeric(0, 59);
pub const MINUTES: Bounds = Bounds::numeric(0, 59);
pub const HOURS: Bounds = Bounds::numeric(0, 23);
pub const DAYS_OF_MONTH: Bounds = Bounds::numeric(1, 31);
pub const MONTHS: Bounds = Bounds {
    min: 1,
    max: 12,
    names: Names::Table(MONTH_NAMES),
};
pub const DAYS_OF_WEEK: Bounds = Bounds {
    min: 0,
    max: 6,
    names: Names::Table(WEEKDAY_NAMES),
};
pub const YEARS: Bounds = Bounds {
    min: 0,
    max: (MAX_YEAR - MIN_YEAR) as u32,
    names: Names::Years,
};

impl Bounds {
    const fn numeric(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            names: Names::None,
        }
    }

    pub fn contains(&self, value: u32) -> bool {
        (self.min..=self.max).contains(&value)
    }

    /// Every value of the field, without the star bit.
    pub fn all(&self) -> BitSet {
        BitSet::range(self.min, self.max, 1)
    }

    /// Resolve a symbolic token (case-insensitive) to its bit position.
    pub fn lookup(&self, token: &str) -> Option<u32> {
        match self.names {
            Names::None => None,
            Names::Table(table) => table
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(token))
                .map(|&(_, value)| value),
            Names::Years => {
                if token.len() != 4 || !token.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let year: i16 = token.parse().ok()?;
                if (MIN_YEAR..=MAX_YEAR).contains(&year) {
                    Some((year - MIN_YEAR) as u32)
                } else {
                    None
                }
            }
        }
    }

    /// The lower-case name for a bit position, if the field has a name
    /// table.
    pub fn name_of(&self, value: u32) -> Option<&'static str> {
        match self.names {
            Names::Table(table) => table
                .iter()
                .find(|&&(_, v)| v == value)
                .map(|&(name, _)| name),
            Names::None | Names::Years => None,
        }
    }

    /// The name that `token` most plausibly extends, such as `mon` for
    /// `MONDAY`.
    pub fn suggest(&self, token: &str) -> Option<&'static str> {
        let Names::Table(table) = self.names else {
            return None;
        };
        let prefix = token.get(..3)?;
        table
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(prefix))
            .map(|&(name, _)| name)
    }
}

/// The seven fields of a schedule, in expression order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Second,
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
    Year,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Second,
        Field::Minute,
        Field::Hour,
        Field::DayOfMonth,
        Field::Month,
        Field::DayOfWeek,
        Field::Year,
    ];

    pub fn bounds(self) -> &'static Bounds {
        match self {
            Field::Second => &SECONDS,
            Field::Minute => &MINUTES,
            Field::Hour => &HOURS,
            Field::DayOfMonth => &DAYS_OF_MONTH,
            Field::Month => &MONTHS,
            Field::DayOfWeek => &DAYS_OF_WEEK,
            Field::Year => &YEARS,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Field::Second => "second",
            Field::Minute => "minute",
            Field::Hour => "hour",
            Field::DayOfMonth => "day-of-month",
            Field::Month => "month",
            Field::DayOfWeek => "day-of-week",
            Field::Year => "year",
        }
    }

    /// Whether the field carries the reserved star bit.
    pub fn is_day(self) -> bool {
        matches!(self, Field::DayOfMonth | Field::DayOfWeek)
    }

    /// Offset between a written value and its bit position.
    pub fn bias(self) -> i32 {
        match self {
            Field::Year => MIN_YEAR as i32,
            _ => 0,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
