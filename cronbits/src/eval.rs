//! Next and previous activation search.
//!
//! Both directions share one cascade over the calendar units, coarsest
//! first. Each unit is stepped until its field matches; a step that crosses
//! into a different enclosing unit (for example the hour moving to another
//! day) restarts the cascade at the year, since every coarser field has to be
//! checked again.

use jiff::civil::{Date, Time};
use jiff::tz::TimeZone;
use jiff::{Span, Zoned};

use crate::bounds::{MAX_YEAR, MIN_YEAR};
use crate::error::ScheduleError;
use crate::schedule::Schedule;

/// How many years past the starting year a search may look before it gives
/// up.
const HORIZON_YEARS: i16 = 5;

/// Which way a search walks through time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    fn sign(self) -> i64 {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Unit {
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    const CASCADE: [Unit; 6] = [
        Unit::Year,
        Unit::Month,
        Unit::Day,
        Unit::Hour,
        Unit::Minute,
        Unit::Second,
    ];

    fn finer(self) -> Option<Unit> {
        match self {
            Unit::Year => Some(Unit::Month),
            Unit::Month => Some(Unit::Day),
            Unit::Day => Some(Unit::Hour),
            Unit::Hour => Some(Unit::Minute),
            Unit::Minute => Some(Unit::Second),
            Unit::Second => None,
        }
    }

    fn matches(self, schedule: &Schedule, t: &Zoned) -> bool {
        match self {
            Unit::Year => schedule.year_matches(t.year()),
            Unit::Month => schedule.month.contains(t.month() as u32),
            Unit::Day => schedule.day_matches(t.date()),
            Unit::Hour => schedule.hour.contains(t.hour() as u32),
            Unit::Minute => schedule.minute.contains(t.minute() as u32),
            Unit::Second => schedule.second.contains(t.second() as u32),
        }
    }

    /// Civil position of the unit enclosing this one. A step that changes
    /// it has wrapped.
    fn enclosing(self, t: &Zoned) -> (i16, i8, i8, i8, i8) {
        match self {
            Unit::Year => (0, 0, 0, 0, 0),
            Unit::Month => (t.year(), 0, 0, 0, 0),
            Unit::Day => (t.year(), t.month(), 0, 0, 0),
            Unit::Hour => (t.year(), t.month(), t.day(), 0, 0),
            Unit::Minute => (t.year(), t.month(), t.day(), t.hour(), 0),
            Unit::Second => (t.year(), t.month(), t.day(), t.hour(), t.minute()),
        }
    }
}

/// Units stepped since the cursor was last moved to the end of that unit.
///
/// A backward step lands on the start of a unit. Once the unit's loop has
/// finished, the cursor must move to the unit's last instant instead; that
/// in turn leaves the next finer unit at its start, so the mark moves down.
#[derive(Debug, Default, Clone, Copy)]
struct Stepped(u8);

impl Stepped {
    fn insert(&mut self, unit: Unit) {
        self.0 |= 1 << unit as u8;
    }

    fn take(&mut self, unit: Unit) -> bool {
        let bit = 1 << unit as u8;
        let was_set = self.0 & bit != 0;
        self.0 &= !bit;
        was_set
    }
}

/// The first instant of `date` in `tz`.
///
/// When a transition removed local midnight the gap is resolved to the
/// instant before it and then pulled back onto `date`: an hour past noon is
/// rounded forward to the next day, otherwise it is rounded back. If the
/// whole day is missing the first instant after the gap is used.
fn midnight(date: Date, tz: &TimeZone) -> Result<Zoned, ScheduleError> {
    let dt = date.to_datetime(Time::midnight());
    let mut zdt = tz.to_ambiguous_zoned(dt).earlier()?;
    let hour = zdt.hour();
    if hour > 12 {
        zdt = zdt.checked_add(Span::new().hours(24 - hour))?;
    } else if hour > 0 {
        zdt = zdt.checked_sub(Span::new().hours(hour))?;
    }
    if zdt.date() < date {
        zdt = tz.to_ambiguous_zoned(dt).later()?;
    }
    Ok(zdt)
}

/// Move to the start of the adjacent unit in `dir`.
///
/// The cursor is truncated to the start of its current unit first, so every
/// finer field lands on its zero value. Units below a day use elapsed time,
/// which keeps them correct across repeated local hours.
fn step(unit: Unit, t: &Zoned, dir: Direction, tz: &TimeZone) -> Result<Zoned, ScheduleError> {
    let n = dir.sign();
    let next = match unit {
        Unit::Year => {
            let first = Date::new(t.year(), 1, 1)?;
            midnight(first.checked_add(Span::new().years(n))?, tz)?
        }
        Unit::Month => {
            let first = t.date().first_of_month();
            midnight(first.checked_add(Span::new().months(n))?, tz)?
        }
        Unit::Day => {
            // A day missing from the zone resolves onto the following day's
            // start, which may be the cursor itself. Keep going until the
            // start lies past the cursor.
            let mut date = t.date();
            loop {
                date = date.checked_add(Span::new().days(n))?;
                let start = midnight(date, tz)?;
                let moved = match dir {
                    Direction::Forward => start > *t,
                    Direction::Backward => start < *t,
                };
                if moved {
                    break start;
                }
            }
        }
        Unit::Hour => t
            .checked_sub(Span::new().minutes(t.minute()).seconds(t.second()))?
            .checked_add(Span::new().hours(n))?,
        Unit::Minute => t
            .checked_sub(Span::new().seconds(t.second()))?
            .checked_add(Span::new().minutes(n))?,
        Unit::Second => t.checked_add(Span::new().seconds(n))?,
    };
    Ok(next)
}

fn search(
    schedule: &Schedule,
    now: &Zoned,
    dir: Direction,
) -> Result<Option<Zoned>, ScheduleError> {
    let tz = schedule.zone_for(now);
    let mut t = now.with_time_zone(tz.clone());

    // Whole seconds only, and never the starting instant itself.
    let nanos = t.subsec_nanosecond();
    if nanos > 0 {
        t = t.checked_sub(Span::new().nanoseconds(nanos))?;
    }
    t = match dir {
        Direction::Forward => t.checked_add(Span::new().seconds(1))?,
        Direction::Backward if nanos > 0 => t,
        Direction::Backward => t.checked_sub(Span::new().seconds(1))?,
    };

    let start_year = t.year();
    let exhausted = |t: &Zoned| {
        let year = t.year();
        let out = match dir {
            Direction::Forward => year > start_year + HORIZON_YEARS || year > MAX_YEAR,
            Direction::Backward => year < start_year - HORIZON_YEARS || year < MIN_YEAR,
        };
        if out {
            log::debug!("no {dir:?} activation within {HORIZON_YEARS} years of {now}");
        }
        out
    };

    let mut stepped = Stepped::default();
    'cascade: loop {
        if exhausted(&t) {
            return Ok(None);
        }
        for unit in Unit::CASCADE {
            while !unit.matches(schedule, &t) {
                stepped.insert(unit);
                let before = unit.enclosing(&t);
                t = step(unit, &t, dir, &tz)?;
                if unit == Unit::Year {
                    if exhausted(&t) {
                        return Ok(None);
                    }
                } else if unit.enclosing(&t) != before {
                    log::trace!("{unit:?} wrapped at {t}, restarting at year");
                    continue 'cascade;
                }
            }
            if dir == Direction::Backward && stepped.take(unit) {
                if let Some(finer) = unit.finer() {
                    t = step(unit, &t, Direction::Forward, &tz)?;
                    t = step(finer, &t, Direction::Backward, &tz)?;
                    stepped.insert(finer);
                }
            }
        }
        break;
    }

    Ok(Some(t.with_time_zone(now.time_zone().clone())))
}

/// The first activation strictly after `now`, in `now`'s zone.
///
/// Returns `Ok(None)` when nothing matches within five years of `now` or
/// before the end of 2099.
pub fn next_from(schedule: &Schedule, now: &Zoned) -> Result<Option<Zoned>, ScheduleError> {
    search(schedule, now, Direction::Forward)
}

/// The last activation strictly before `now`, in `now`'s zone.
///
/// Returns `Ok(None)` when nothing matches within five years before `now`
/// or after the start of 1970.
pub fn previous_from(schedule: &Schedule, now: &Zoned) -> Result<Option<Zoned>, ScheduleError> {
    search(schedule, now, Direction::Backward)
}

/// Check if an instant is an activation of the schedule.
pub fn matches(schedule: &Schedule, datetime: &Zoned) -> Result<bool, ScheduleError> {
    let tz = schedule.zone_for(datetime);
    let zdt = datetime.with_time_zone(tz);
    Ok(schedule.matches_datetime(zdt.datetime()))
}

/// Compute next N occurrences.
pub fn next_n_from(
    schedule: &Schedule,
    now: &Zoned,
    n: usize,
) -> Result<Vec<Zoned>, ScheduleError> {
    Occurrences::new(schedule, now.clone()).take(n).collect()
}

/// Compute previous N occurrences, most recent first.
pub fn previous_n_from(
    schedule: &Schedule,
    now: &Zoned,
    n: usize,
) -> Result<Vec<Zoned>, ScheduleError> {
    Occurrences::backward(schedule, now.clone()).take(n).collect()
}

/// Lazy iterator over schedule occurrences, walking away from a starting
/// instant in one direction.
pub struct Occurrences<'a> {
    schedule: &'a Schedule,
    current: Zoned,
    direction: Direction,
    done: bool,
}

impl<'a> Occurrences<'a> {
    /// Create a new iterator over occurrences after `from`.
    pub fn new(schedule: &'a Schedule, from: Zoned) -> Self {
        Self::with_direction(schedule, from, Direction::Forward)
    }

    /// Create a new iterator over occurrences before `from`, latest first.
    pub fn backward(schedule: &'a Schedule, from: Zoned) -> Self {
        Self::with_direction(schedule, from, Direction::Backward)
    }

    pub fn with_direction(schedule: &'a Schedule, from: Zoned, direction: Direction) -> Self {
        Self {
            schedule,
            current: from,
            direction,
            done: false,
        }
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }
}

impl Iterator for Occurrences<'_> {
    type Item = Result<Zoned, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match search(self.schedule, &self.current, self.direction) {
            Ok(Some(dt)) => {
                // Searches are strict, so the occurrence itself is the next cursor.
                self.current = dt.clone();
                Some(Ok(dt))
            }
            Ok(None) => {
                self.done = true;
                None
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl std::iter::FusedIterator for Occurrences<'_> {}

/// Bounded iterator for occurrences where from < occurrence <= to.
pub struct BoundedOccurrences<'a> {
    inner: Occurrences<'a>,
    to: Zoned,
}

impl<'a> BoundedOccurrences<'a> {
    /// Create a new bounded iterator for occurrences in the range (from, to].
    pub fn new(schedule: &'a Schedule, from: Zoned, to: Zoned) -> Self {
        Self {
            inner: Occurrences::new(schedule, from),
            to,
        }
    }
}

impl Iterator for BoundedOccurrences<'_> {
    type Item = Result<Zoned, ScheduleError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.inner.next() {
            Some(Ok(dt)) if dt <= self.to => Some(Ok(dt)),
            Some(Ok(_)) => {
                self.inner.done = true;
                None
            }
            Some(Err(e)) => Some(Err(e)),
            None => None,
        }
    }
}

/// Create a bounded iterator of occurrences in the range (from, to].
pub fn between<'a>(schedule: &'a Schedule, from: &Zoned, to: &Zoned) -> BoundedOccurrences<'a> {
    BoundedOccurrences::new(schedule, from.clone(), to.clone())
}
