use log::{Level, LevelFilter, Log, Metadata, Record};
use std::io::Write;

/// Writes log records to standard output, next to the benchmark's own output.
pub struct Console;

static LOGGER: Console = Console;

impl Log for Console {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let mut stdout = std::io::stdout().lock();
        // Nowhere left to report a failing stdout
        let _ = match record.level() {
            Level::Error | Level::Warn => writeln!(stdout, "{}", record.args()),
            level => writeln!(stdout, "[{level:<5} {}] {}", record.target(), record.args()),
        };
    }

    fn flush(&self) {
        let _ = std::io::stdout().flush();
    }
}

pub fn init(level: LevelFilter) {
    // Only fails when a logger is already installed, which then stays in charge
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

pub fn level_for(verbosity: u8) -> LevelFilter {
    match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_levels() {
        assert_eq!(level_for(0), LevelFilter::Warn);
        assert_eq!(level_for(1), LevelFilter::Info);
        assert_eq!(level_for(2), LevelFilter::Debug);
        assert_eq!(level_for(9), LevelFilter::Trace);
    }
}
