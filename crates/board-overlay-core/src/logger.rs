//! Stderr logger for the overlay pipeline.
//!
//! Each line carries the time elapsed since the logger was installed
//! plus the emitting module, so a slow calibration or a frame path
//! that starts reporting errors is easy to spot in a live capture
//! session. Install once at startup with `init_with_level`.

use std::io::Write;
use std::sync::OnceLock;
use std::time::Instant;

use log::{LevelFilter, Log, Metadata, Record};

struct OverlayLogger {
    level: LevelFilter,
    started: Instant,
}

impl Log for OverlayLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let elapsed = self.started.elapsed().as_secs_f64();
        let level = record.level();
        let target = record.target();
        let mut stderr = std::io::stderr();
        let _ = writeln!(stderr, "[{elapsed:8.3}s {level:5} {target}] {}", record.args());
    }

    fn flush(&self) {}
}

static LOGGER: OnceLock<OverlayLogger> = OnceLock::new();

/// Install the logger with the provided level filter.
///
/// Calling this more than once is a no-op after the first successful
/// initialization.
pub fn init_with_level(level: LevelFilter) -> Result<(), log::SetLoggerError> {
    if LOGGER.get().is_none() {
        let logger = LOGGER.get_or_init(|| OverlayLogger {
            level,
            started: Instant::now(),
        });
        log::set_logger(logger)?;
        log::set_max_level(level);
    }
    Ok(())
}
