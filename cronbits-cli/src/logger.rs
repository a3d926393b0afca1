// A minimal stderr logger for the `log` facade. Filtering is left to
// `log::set_max_level`, which `main` sets from `CRONBITS_LOG`.

use log::Log;

#[derive(Debug)]
pub struct Logger(());

impl Logger {
    /// Install the logger as the global `log` backend.
    pub fn init() -> Result<&'static Logger, log::SetLoggerError> {
        let logger = Box::leak(Box::new(Logger(())));
        log::set_logger(logger)?;
        Ok(logger)
    }
}

impl Log for Logger {
    fn enabled(&self, _: &log::Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &log::Record<'_>) {
        let now = jiff::Timestamp::now();
        match record.line() {
            Some(line) => {
                eprintln!(
                    "{now}|{}|{}:{line}: {}",
                    record.level(),
                    record.target(),
                    record.args()
                );
            }
            None => {
                eprintln!("{now}|{}|{}: {}", record.level(), record.target(), record.args());
            }
        }
    }

    fn flush(&self) {}
}

/// Parse a `CRONBITS_LOG` value into a level filter.
pub fn level_from_env(value: &str) -> Option<log::LevelFilter> {
    let level = match value {
        "" | "off" => log::LevelFilter::Off,
        "error" => log::LevelFilter::Error,
        "warn" => log::LevelFilter::Warn,
        "info" => log::LevelFilter::Info,
        "debug" => log::LevelFilter::Debug,
        "trace" => log::LevelFilter::Trace,
        _ => return None,
    };
    Some(level)
}
