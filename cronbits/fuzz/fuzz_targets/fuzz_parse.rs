#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Errors are fine, panics are not. Rendering must not panic either.
        if let Err(e) = cronbits::Schedule::parse(s) {
            let _ = e.display_rich();
        }
    }
});
