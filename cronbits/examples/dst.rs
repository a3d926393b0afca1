//! Activations around daylight saving transitions.

use cronbits::Schedule;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 02:30 does not exist in New York on 2024-03-10.
    let schedule: Schedule = "CRON_TZ=America/New_York 0 30 2 * * *".parse()?;
    let from: jiff::Zoned = "2024-03-09T00:00:00-05:00[America/New_York]".parse()?;
    println!("{schedule}");
    for dt in schedule.occurrences(&from).take(3) {
        println!("  {}", dt?);
    }

    // 01:30 happens twice on 2024-11-03.
    let schedule: Schedule = "CRON_TZ=America/New_York 0 30 1 * * *".parse()?;
    let from: jiff::Zoned = "2024-11-02T12:00:00-04:00[America/New_York]".parse()?;
    let to: jiff::Zoned = "2024-11-04T12:00:00-05:00[America/New_York]".parse()?;
    println!("\n{schedule}");
    for dt in schedule.between(&from, &to) {
        println!("  {}", dt?);
    }

    // Midnight is skipped in Sao Paulo on 2018-11-04, so that day has no
    // activation at 00:00.
    let schedule: Schedule = "CRON_TZ=America/Sao_Paulo @daily".parse()?;
    let from: jiff::Zoned = "2018-11-03T12:00:00-03:00[America/Sao_Paulo]".parse()?;
    println!("\n{schedule}");
    for dt in schedule.occurrences(&from).take(2) {
        println!("  {}", dt?);
    }

    Ok(())
}
