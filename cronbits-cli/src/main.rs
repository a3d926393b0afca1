use clap::Parser;
use cronbits::Schedule;
use jiff::tz::TimeZone;
use jiff::{Timestamp, Zoned};
use std::{env, process};

mod logger;

/// Occurrences listed for `--from` without `--to`.
const RANGE_LIMIT: usize = 100;

/// Upper bound for `-n`.
const MAX_COUNT: u32 = 1000;

#[derive(Parser)]
#[command(
    name = "cronbits",
    about = "List the next or previous activations of a cron expression",
    version
)]
struct Cli {
    /// Cron expression (e.g., "0 30 9 * * MON-FRI" or "CRON_TZ=UTC @daily")
    expression: Option<String>,

    /// Number of occurrences to show
    #[arg(short, long, default_value = "1")]
    n: u32,

    /// Walk backward in time instead of forward
    #[arg(long)]
    prev: bool,

    /// Start time for iterator query (RFC 9557 datetime, e.g. 2024-01-01T00:00[UTC]). Shows up to 100 occurrences unless --to is specified.
    #[arg(long, conflicts_with = "n")]
    from: Option<String>,

    /// End of range for --from query. When specified, shows all occurrences in (from, to].
    #[arg(long, requires = "from", conflicts_with = "prev")]
    to: Option<String>,

    /// Time zone for "now" (defaults to the system time zone)
    #[arg(long)]
    tz: Option<String>,

    /// Output as JSON
    #[arg(long)]
    json: bool,

    /// Validate expression without computing
    #[arg(long)]
    check: bool,

    /// Show the parsed schedule as JSON
    #[arg(long)]
    parse: bool,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    let expression = match cli.expression {
        Some(ref expr) => expr.as_str(),
        None => {
            eprintln!("error: no expression provided");
            process::exit(2);
        }
    };

    let schedule = match Schedule::parse(expression) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }
    };
    log::debug!("parsed `{expression}` as `{schedule}`");

    if cli.check {
        println!("\u{2713} valid");
        process::exit(0);
    }

    if cli.parse {
        match serde_json::to_string_pretty(&schedule) {
            Ok(json) => {
                println!("{json}");
                process::exit(0);
            }
            Err(e) => {
                eprintln!("error: failed to serialize: {e}");
                process::exit(1);
            }
        }
    }

    // Handle --from/--to range query
    if let Some(ref from_str) = cli.from {
        let from: Zoned = match from_str.parse() {
            Ok(z) => z,
            Err(e) => {
                eprintln!("error: invalid --from datetime: {e}");
                process::exit(1);
            }
        };

        let results = if let Some(ref to_str) = cli.to {
            let to: Zoned = match to_str.parse() {
                Ok(z) => z,
                Err(e) => {
                    eprintln!("error: invalid --to datetime: {e}");
                    process::exit(1);
                }
            };
            schedule.between(&from, &to).collect::<Result<Vec<_>, _>>()
        } else if cli.prev {
            schedule
                .previous_occurrences(&from)
                .take(RANGE_LIMIT)
                .collect()
        } else {
            schedule.occurrences(&from).take(RANGE_LIMIT).collect()
        };

        let results = match results {
            Ok(r) => r,
            Err(e) => {
                eprintln!("{}", e.display_rich());
                process::exit(1);
            }
        };
        if results.is_empty() {
            eprintln!("no occurrences in range");
            process::exit(0);
        }
        print_instants(&results, cli.json);
        process::exit(0);
    }

    // Default: compute next (or previous) N occurrences
    let mut n = cli.n;
    if n > MAX_COUNT {
        eprintln!("warning: capped at {MAX_COUNT} occurrences");
        n = MAX_COUNT;
    }

    let now = current_time(cli.tz.as_deref());
    let results = if cli.prev {
        schedule.previous_n_from(&now, n as usize)
    } else {
        schedule.next_n_from(&now, n as usize)
    };
    let results = match results {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{}", e.display_rich());
            process::exit(1);
        }
    };

    if results.is_empty() {
        if cli.prev {
            eprintln!("no previous occurrences");
        } else {
            eprintln!("no upcoming occurrences");
        }
        process::exit(0);
    }
    print_instants(&results, cli.json);
}

fn print_instants(results: &[Zoned], json: bool) {
    if json {
        let iso_strings: Vec<String> = results.iter().map(|z| z.to_string()).collect();
        match serde_json::to_string(&iso_strings) {
            Ok(out) => println!("{out}"),
            Err(e) => {
                eprintln!("error: failed to serialize: {e}");
                process::exit(1);
            }
        }
    } else {
        for z in results {
            println!("{z}");
        }
    }
}

fn init_logging() {
    let value = env::var("CRONBITS_LOG").unwrap_or_default();
    let Some(level) = logger::level_from_env(&value) else {
        eprintln!("error: unrecognized log level '{value}' in CRONBITS_LOG");
        process::exit(1);
    };
    log::set_max_level(level);
    if let Err(e) = logger::Logger::init() {
        eprintln!("warning: failed to install logger: {e}");
    }
}

/// "Now" in the requested zone, honoring `CRONBITS_NOW` for reproducible
/// output.
fn current_time(tz: Option<&str>) -> Zoned {
    let tz = match tz {
        Some(name) => match TimeZone::get(name) {
            Ok(tz) => tz,
            Err(e) => {
                eprintln!("error: invalid --tz '{name}': {e}");
                process::exit(1);
            }
        },
        None => TimeZone::system(),
    };

    let ts = match env::var("CRONBITS_NOW") {
        Ok(val) => match val.parse::<Timestamp>() {
            Ok(ts) => {
                log::trace!("setting current time to `{ts}` from `CRONBITS_NOW`");
                ts
            }
            Err(e) => {
                eprintln!("error: CRONBITS_NOW is not a valid RFC 3339 timestamp: {e}");
                process::exit(1);
            }
        },
        Err(_) => Timestamp::now(),
    };
    ts.to_zoned(tz)
}
