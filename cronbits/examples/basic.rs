//! Basic cronbits API walkthrough: parse, search both ways, match, display.

use cronbits::Schedule;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Five, six and seven fields are all accepted.
    let schedule: Schedule = "30 9 * * MON-FRI".parse()?;
    println!("Parsed: {schedule}");

    let now: jiff::Zoned = "2025-06-15T08:00:00+00:00[UTC]".parse()?;
    if let Some(next) = schedule.next_from(&now)? {
        println!("Next activation after {now}: {next}");
    }
    if let Some(prev) = schedule.previous_from(&now)? {
        println!("Previous activation before {now}: {prev}");
    }

    println!("\nNext 5 activations:");
    for dt in schedule.next_n_from(&now, 5)? {
        println!("  {dt}");
    }

    let monday: jiff::Zoned = "2025-06-16T09:30:00+00:00[UTC]".parse()?;
    println!("\n{monday} matches: {}", schedule.matches(&monday)?);
    let sunday: jiff::Zoned = "2025-06-15T09:30:00+00:00[UTC]".parse()?;
    println!("{sunday} matches: {}", schedule.matches(&sunday)?);

    // Errors point at the offending text.
    if let Err(e) = Schedule::parse("0 30 9 * * MONDAY") {
        println!("\n{}", e.display_rich());
    }

    Ok(())
}
