use criterion::{black_box, criterion_group, criterion_main, Criterion};
use cronbits::Schedule;

fn fixed_now() -> jiff::Zoned {
    jiff::civil::Date::new(2026, 2, 6)
        .unwrap()
        .to_datetime(jiff::civil::Time::new(12, 0, 0, 0).unwrap())
        .to_zoned(jiff::tz::TimeZone::UTC)
        .unwrap()
}

// ---------------------------------------------------------------------------
// Parse benchmarks
// ---------------------------------------------------------------------------

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("descriptor", |b| {
        b.iter(|| Schedule::parse(black_box("@daily")).unwrap());
    });

    group.bench_function("five_fields", |b| {
        b.iter(|| Schedule::parse(black_box("30 9 * * MON-FRI")).unwrap());
    });

    group.bench_function("complex", |b| {
        b.iter(|| {
            Schedule::parse(black_box(
                "CRON_TZ=America/New_York 0 0,15,30,45 8-18/2 1-7,15 JAN-MAR,OCT-DEC MON-FRI 2026-2030",
            ))
            .unwrap()
        });
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Search benchmarks
// ---------------------------------------------------------------------------

fn bench_next(c: &mut Criterion) {
    let mut group = c.benchmark_group("next");
    let now = fixed_now();

    let every_minute = Schedule::parse("0 * * * * *").unwrap();
    group.bench_function("every_minute", |b| {
        b.iter(|| every_minute.next_from(black_box(&now)).unwrap());
    });

    let weekdays = Schedule::parse("0 30 9 * * MON-FRI").unwrap();
    group.bench_function("weekdays", |b| {
        b.iter(|| weekdays.next_from(black_box(&now)).unwrap());
    });

    let yearly = Schedule::parse("0 0 0 25 DEC *").unwrap();
    group.bench_function("yearly", |b| {
        b.iter(|| yearly.next_from(black_box(&now)).unwrap());
    });

    let leap_day = Schedule::parse("0 0 12 29 FEB *").unwrap();
    group.bench_function("leap_day", |b| {
        b.iter(|| leap_day.next_from(black_box(&now)).unwrap());
    });

    let zoned = Schedule::parse("CRON_TZ=America/New_York 0 30 2 * * *").unwrap();
    group.bench_function("zoned", |b| {
        b.iter(|| zoned.next_from(black_box(&now)).unwrap());
    });

    let unsatisfiable = Schedule::parse("0 0 0 31 FEB *").unwrap();
    group.bench_function("unsatisfiable", |b| {
        b.iter(|| unsatisfiable.next_from(black_box(&now)).unwrap());
    });

    group.finish();
}

fn bench_previous(c: &mut Criterion) {
    let mut group = c.benchmark_group("previous");
    let now = fixed_now();

    let weekdays = Schedule::parse("0 30 9 * * MON-FRI").unwrap();
    group.bench_function("weekdays", |b| {
        b.iter(|| weekdays.previous_from(black_box(&now)).unwrap());
    });

    let end_of_year = Schedule::parse("* * * * DEC *").unwrap();
    group.bench_function("end_of_year", |b| {
        b.iter(|| end_of_year.previous_from(black_box(&now)).unwrap());
    });

    group.finish();
}

// ---------------------------------------------------------------------------
// Iteration and display
// ---------------------------------------------------------------------------

fn bench_iter(c: &mut Criterion) {
    let now = fixed_now();
    let hourly = Schedule::parse("@hourly").unwrap();

    c.bench_function("occurrences_100", |b| {
        b.iter(|| {
            hourly
                .occurrences(black_box(&now))
                .take(100)
                .collect::<Result<Vec<_>, _>>()
                .unwrap()
        });
    });
}

fn bench_display(c: &mut Criterion) {
    let schedule = Schedule::parse("0 */5 9-17 1,15 JAN-JUN MON-FRI 2026,2027,2028").unwrap();
    c.bench_function("display", |b| {
        b.iter(|| black_box(&schedule).to_string());
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_next,
    bench_previous,
    bench_iter,
    bench_display
);
criterion_main!(benches);
