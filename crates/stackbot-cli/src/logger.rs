use anyhow::Context as _;
use log::{LevelFilter, Log, Metadata, Record};

/// Writes log records to stderr, next to the progress messages.
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!(
                "[{:<5} {}] {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {}
}

pub(crate) fn init(level: LevelFilter) -> anyhow::Result<()> {
    log::set_logger(&LOGGER).context("Failed to install logger")?;
    log::set_max_level(level);
    Ok(())
}
