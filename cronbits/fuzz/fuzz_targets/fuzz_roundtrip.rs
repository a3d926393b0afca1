#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(schedule) = cronbits::Schedule::parse(s) {
            let displayed = schedule.to_string();
            let reparsed = cronbits::Schedule::parse(&displayed)
                .expect("display output must be parseable");
            assert_eq!(displayed, reparsed.to_string(), "roundtrip idempotency failed");
        }
    }
});
