use std::fmt;

use crate::bits::BitSet;
use crate::bounds::{Bounds, Field};
use crate::schedule::Schedule;

/// Renders the canonical seven-field form, which parses back to the same
/// schedule.
///
/// The exception is a day field that carries [`BitSet::STAR`] without
/// covering its whole range. Only the builders can produce one, and cron
/// syntax has no spelling for it: the values are written and the flag is
/// dropped, so the parsed text combines the day fields with OR instead of
/// AND.
impl fmt::Display for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = self.timezone() {
            write!(f, "CRON_TZ={name} ")?;
        }

        let fields = self.fields();
        for (i, (field, bits)) in fields.into_iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write_field(f, field, bits)?;
        }
        Ok(())
    }
}

fn write_field(f: &mut fmt::Formatter<'_>, field: Field, bits: &BitSet) -> fmt::Result {
    let bounds = field.bounds();
    let values: Vec<u32> = bits.values(bounds).collect();

    // A field that can never match has no cron spelling.
    if values.is_empty() {
        return f.write_str("-");
    }

    // Day fields only read as `*` when they carry the flag.
    if bits.covers(bounds) && (!field.is_day() || bits.is_star()) {
        return f.write_str("*");
    }

    if let Some(step) = progression_step(&values, bounds) {
        if values[0] == bounds.min {
            return write!(f, "*/{step}");
        }
        write_value(f, field, values[0])?;
        return write!(f, "/{step}");
    }

    let mut first = true;
    let mut i = 0;
    while i < values.len() {
        let mut j = i;
        while j + 1 < values.len() && values[j + 1] == values[j] + 1 {
            j += 1;
        }
        if j - i >= 2 {
            if !first {
                f.write_str(",")?;
            }
            write_value(f, field, values[i])?;
            f.write_str("-")?;
            write_value(f, field, values[j])?;
            first = false;
        } else {
            for &value in &values[i..=j] {
                if !first {
                    f.write_str(",")?;
                }
                write_value(f, field, value)?;
                first = false;
            }
        }
        i = j + 1;
    }
    Ok(())
}

/// The step of a progression that runs to the end of the field, as produced
/// by `*/n` or `a/n`.
fn progression_step(values: &[u32], bounds: &Bounds) -> Option<u32> {
    let [a, b, ..] = values else {
        return None;
    };
    let step = b - a;
    if step < 2 || values.windows(2).any(|w| w[1] - w[0] != step) {
        return None;
    }
    let last = values[values.len() - 1];
    (last + step > bounds.max).then_some(step)
}

fn write_value(f: &mut fmt::Formatter<'_>, field: Field, value: u32) -> fmt::Result {
    match field.bounds().name_of(value) {
        Some(name) => f.write_str(&name.to_ascii_uppercase()),
        None => write!(f, "{}", value as i32 + field.bias()),
    }
}

#[cfg(test)]
mod tests {
    use crate::bits::BitSet;
    use crate::parser::parse;
    use crate::schedule::Schedule;

    fn render(expr: &str) -> String {
        parse(expr).unwrap().to_string()
    }

    #[test]
    fn test_five_field_expands_to_seven() {
        assert_eq!(render("30 9 * * MON-FRI"), "0 30 9 * * MON-FRI *");
    }

    #[test]
    fn test_every_second() {
        assert_eq!(Schedule::every_second().to_string(), "* * * * * * *");
        assert_eq!(render("* * * * * *"), "* * * * * * *");
    }

    #[test]
    fn test_step_from_minimum() {
        assert_eq!(render("*/15 * * * * *"), "*/15 * * * * * *");
        assert_eq!(render("0 0 0 1 */3 *"), "0 0 0 1 */3 * *");
    }

    #[test]
    fn test_step_from_offset() {
        assert_eq!(render("0 5/20 * * * *"), "0 5/20 * * * * *");
        assert_eq!(render("0 0 0 1 FEB/4 *"), "0 0 0 1 FEB/4 * *");
    }

    #[test]
    fn test_bounded_step_renders_as_list() {
        assert_eq!(render("0 0-30/10 * * * *"), "0 0,10,20,30 * * * * *");
    }

    #[test]
    fn test_runs_and_singles() {
        assert_eq!(render("0 0 0,1 * * 1,2,3,5"), "0 0 0,1 * * MON-WED,FRI *");
        assert_eq!(render("0 0 8-10,12 * * *"), "0 0 8-10,12 * * * *");
    }

    #[test]
    fn test_day_field_without_flag_is_not_star() {
        assert_eq!(render("0 0 0 1-31 * ?"), "0 0 0 1-31 * * *");
        assert_eq!(render("0 0 0 ? * 0-6"), "0 0 0 * * SUN-SAT *");
    }

    #[test]
    fn test_weekday_star_step() {
        assert_eq!(render("0 0 0 * * */2"), "0 0 0 * * */2 *");
    }

    #[test]
    fn test_years() {
        assert_eq!(
            render("0 0 0 1 1 * 2030-2035"),
            "0 0 0 1 JAN * 2030-2035"
        );
        assert_eq!(render("0 0 0 1 1 * 2090/3"), "0 0 0 1 JAN * 2090/3");
    }

    #[test]
    fn test_descriptor() {
        assert_eq!(render("@weekly"), "0 0 0 * * SUN *");
        assert_eq!(render("@yearly"), "0 0 0 1 JAN * *");
    }

    #[test]
    fn test_timezone_prefix() {
        assert_eq!(
            render("TZ=Europe/Paris 0 0 12 * * *"),
            "CRON_TZ=Europe/Paris 0 0 12 * * * *"
        );
    }

    #[test]
    fn test_never_matching_field() {
        let s = Schedule::every_second().with_hour([]);
        assert_eq!(s.to_string(), "* * - * * * *");
    }

    #[test]
    fn test_partial_flagged_day_field_loses_flag() {
        let mut s = parse("0 0 0 15 * *").unwrap();
        s.day_of_week = BitSet::from_values([1]).with_star();
        let rendered = s.to_string();
        assert_eq!(rendered, "0 0 0 15 * MON *");

        let reparsed = parse(&rendered).unwrap();
        assert!(!reparsed.day_of_week.is_star());
        assert_eq!(reparsed.day_of_week, s.day_of_week.without_star());
    }

    #[test]
    fn test_roundtrip() {
        for expr in [
            "0 30 9 * * MON-FRI",
            "*/7 5/11 0-3,22 * * *",
            "0 0 0 15 * *",
            "0 0 0 15 * MON",
            "0 0 */2 1,15 JAN-MAR,OCT ?",
            "CRON_TZ=America/New_York 0 0 2 * * SUN 2024-2026",
            "@hourly",
        ] {
            let rendered = render(expr);
            let reparsed = parse(&rendered).unwrap();
            assert_eq!(reparsed.to_string(), rendered, "round trip of {expr}");
        }
    }
}
