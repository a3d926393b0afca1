use jiff::tz::TimeZone;

use crate::bits::BitSet;
use crate::bounds::{Field, MAX_YEAR, MIN_YEAR};
use crate::error::{ScheduleError, Span};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::schedule::Schedule;

const FIVE_FIELDS: &[Field] = &[
    Field::Minute,
    Field::Hour,
    Field::DayOfMonth,
    Field::Month,
    Field::DayOfWeek,
];

const SIX_FIELDS: &[Field] = &[
    Field::Second,
    Field::Minute,
    Field::Hour,
    Field::DayOfMonth,
    Field::Month,
    Field::DayOfWeek,
];

const SEVEN_FIELDS: &[Field] = &Field::ALL;

/// Parse a cron expression into a [`Schedule`].
///
/// Accepts an optional `CRON_TZ=`/`TZ=` prefix followed by either a
/// descriptor such as `@daily` or 5, 6 or 7 whitespace-separated fields.
pub fn parse(input: &str) -> Result<Schedule, ScheduleError> {
    let tokens = Lexer::new(input).tokenize()?;
    let mut rest = tokens.as_slice();

    let mut location = None;
    if let Some((
        Token {
            kind: TokenKind::Timezone(name),
            span,
        },
        tail,
    )) = rest.split_first()
    {
        location = Some(resolve_zone(name, *span, input)?);
        rest = tail;
    }

    let mut schedule = match rest {
        [] => {
            return Err(ScheduleError::parse(
                "expected a cron expression",
                Span::new(input.len(), input.len() + 1),
                input,
                None,
            ));
        }
        [Token {
            kind: TokenKind::Descriptor(name),
            span,
        }] => parse_descriptor(name, *span, input)?,
        fields => parse_fields(fields, input)?,
    };
    schedule.location = location;
    Ok(schedule)
}

fn resolve_zone(name: &str, span: Span, input: &str) -> Result<TimeZone, ScheduleError> {
    TimeZone::get(name)
        .map_err(|e| ScheduleError::lex(format!("unknown timezone '{name}': {e}"), span, input))
}

fn parse_descriptor(name: &str, span: Span, input: &str) -> Result<Schedule, ScheduleError> {
    let midnight = Schedule::every_second()
        .with_second([0])
        .with_minute([0])
        .with_hour([0]);
    let schedule = match name {
        "yearly" | "annually" => midnight.with_day_of_month([1]).with_month([1]),
        "monthly" => midnight.with_day_of_month([1]),
        "weekly" => midnight.with_day_of_week([0]),
        "daily" | "midnight" => midnight,
        "hourly" => Schedule::every_second().with_second([0]).with_minute([0]),
        _ => {
            return Err(ScheduleError::parse(
                format!("unknown descriptor '@{name}'"),
                span,
                input,
                None,
            ));
        }
    };
    Ok(schedule)
}

fn parse_fields(tokens: &[Token], input: &str) -> Result<Schedule, ScheduleError> {
    let layout = match tokens.len() {
        5 => FIVE_FIELDS,
        6 => SIX_FIELDS,
        7 => SEVEN_FIELDS,
        n => {
            let span = match (tokens.first(), tokens.last()) {
                (Some(first), Some(last)) => Span::new(first.span.start, last.span.end),
                _ => Span::new(0, input.len()),
            };
            return Err(ScheduleError::parse(
                format!("expected 5, 6 or 7 fields, got {n}"),
                span,
                input,
                None,
            ));
        }
    };

    // Fields missing from the short forms: second 0, any year.
    let mut schedule = Schedule::every_second().with_second([0]);
    for (field, token) in layout.iter().zip(tokens) {
        let text = match &token.kind {
            TokenKind::Field(text) => text,
            TokenKind::Descriptor(_) => {
                return Err(ScheduleError::parse(
                    "descriptors cannot be combined with fields",
                    token.span,
                    input,
                    None,
                ));
            }
            TokenKind::Timezone(_) => {
                return Err(ScheduleError::parse(
                    "timezone prefix must come first",
                    token.span,
                    input,
                    None,
                ));
            }
        };
        let bits = parse_field(*field, text, token.span, input)?;
        match field {
            Field::Second => schedule.second = bits,
            Field::Minute => schedule.minute = bits,
            Field::Hour => schedule.hour = bits,
            Field::DayOfMonth => schedule.day_of_month = bits,
            Field::Month => schedule.month = bits,
            Field::DayOfWeek => schedule.day_of_week = bits,
            Field::Year => schedule.year = bits,
        }
    }
    Ok(schedule)
}

/// Parse one comma-separated field into its bit set.
pub fn parse_field(field: Field, text: &str, span: Span, input: &str) -> Result<BitSet, ScheduleError> {
    let mut bits = BitSet::empty();
    let mut offset = span.start;
    for item in text.split(',') {
        let item_span = Span::new(offset, offset + item.len());
        bits = bits.union(parse_item(field, item, item_span, input)?);
        offset += item.len() + 1;
    }
    Ok(bits)
}

/// `*`, `?`, `a`, or `a-b`, optionally followed by `/step`.
fn parse_item(field: Field, item: &str, span: Span, input: &str) -> Result<BitSet, ScheduleError> {
    if item.is_empty() {
        return Err(ScheduleError::parse(
            format!("empty item in {field} field"),
            Span::new(span.start, span.start + 1),
            input,
            None,
        ));
    }
    let bounds = field.bounds();

    let (range, step) = match item.split_once('/') {
        Some((range, step)) => {
            let step_span = Span::new(span.start + range.len() + 1, span.end);
            (range, Some(parse_step(step, step_span, input)?))
        }
        None => (item, None),
    };
    let range_span = Span::new(span.start, span.start + range.len());

    let wildcard = range == "*" || range == "?";
    if range == "?" && !field.is_day() {
        return Err(ScheduleError::parse(
            format!("'?' is only allowed in day fields, not {field}"),
            range_span,
            input,
            Some("*".into()),
        ));
    }

    let (low, high) = if wildcard {
        (bounds.min, bounds.max)
    } else if let Some((a, b)) = range.split_once('-') {
        let a_span = Span::new(range_span.start, range_span.start + a.len());
        let b_span = Span::new(a_span.end + 1, range_span.end);
        let low = parse_value(field, a, a_span, input)?;
        let high = parse_value(field, b, b_span, input)?;
        if low > high {
            return Err(ScheduleError::parse(
                format!("{field} range {range} is inverted"),
                range_span,
                input,
                Some(format!("{b}-{a}")),
            ));
        }
        (low, high)
    } else {
        let value = parse_value(field, range, range_span, input)?;
        // `a/n` runs to the end of the field
        match step {
            Some(_) => (value, bounds.max),
            None => (value, value),
        }
    };

    let step = step.unwrap_or(1);
    let mut bits = BitSet::range(low, high, step);
    if wildcard && step == 1 && field.is_day() {
        bits = bits.with_star();
    }
    Ok(bits)
}

fn parse_step(text: &str, span: Span, input: &str) -> Result<u32, ScheduleError> {
    let step: u32 = text.parse().map_err(|_| {
        ScheduleError::parse(format!("invalid step '{text}'"), span, input, None)
    })?;
    if step == 0 {
        return Err(ScheduleError::parse(
            "step must be at least 1",
            span,
            input,
            Some("1".into()),
        ));
    }
    Ok(step)
}

/// Resolve a single value to its bit position, checking the field's range.
fn parse_value(field: Field, text: &str, span: Span, input: &str) -> Result<u32, ScheduleError> {
    let bounds = field.bounds();
    if text.is_empty() {
        return Err(ScheduleError::parse(
            format!("missing {field} value"),
            Span::new(span.start, span.start + 1),
            input,
            None,
        ));
    }

    if field == Field::Year {
        return bounds.lookup(text).ok_or_else(|| {
            ScheduleError::parse(
                format!("year {text} out of range {MIN_YEAR}-{MAX_YEAR}"),
                span,
                input,
                None,
            )
        });
    }

    if let Some(value) = bounds.lookup(text) {
        return Ok(value);
    }

    let Ok(value) = text.parse::<u32>() else {
        let suggestion = bounds.suggest(text).map(str::to_ascii_uppercase);
        let message = if text.bytes().all(|b| b.is_ascii_digit()) {
            format!("invalid {field} value '{text}'")
        } else {
            format!("unknown {field} name '{text}'")
        };
        return Err(ScheduleError::parse(message, span, input, suggestion));
    };

    if !bounds.contains(value) {
        // Sunday is 0 here
        let suggestion = (field == Field::DayOfWeek && value == 7).then(|| "0".to_string());
        return Err(ScheduleError::parse(
            format!(
                "{field} value {value} out of range {}-{}",
                bounds.min, bounds.max
            ),
            span,
            input,
            suggestion,
        ));
    }
    Ok(value)
}
