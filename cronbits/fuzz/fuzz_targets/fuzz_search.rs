#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, i64)| {
    let (expr, seconds) = data;
    let Ok(schedule) = cronbits::Schedule::parse(expr) else {
        return;
    };
    // Anywhere between 1970 and 2100.
    let seconds = seconds.rem_euclid(4_102_444_800);
    let Ok(ts) = jiff::Timestamp::from_second(seconds) else {
        return;
    };
    let now = ts.to_zoned(jiff::tz::TimeZone::UTC);

    if let Ok(Some(next)) = schedule.next_from(&now) {
        assert!(next > now);
        assert_eq!(schedule.matches(&next).ok(), Some(true));
    }
    if let Ok(Some(prev)) = schedule.previous_from(&now) {
        assert!(prev < now);
        assert_eq!(schedule.matches(&prev).ok(), Some(true));
    }
});
