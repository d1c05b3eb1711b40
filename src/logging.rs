use std::{
    io::{self, Write},
    sync::{OnceLock, PoisonError, RwLock},
};

use log::{Log, Metadata, Record};

static LOGGER: OnceLock<AppLogger> = OnceLock::new();

pub fn get_logger() -> &'static AppLogger {
    LOGGER.get_or_init(|| AppLogger::new(log::Level::Warn))
}

/// Installs the stderr logger, `verbosity` is the number of `-v` flags.
pub fn init(verbosity: u8) -> Result<(), log::SetLoggerError> {
    let logger = get_logger();
    logger.set_min_level(level_for(verbosity));

    log::set_logger(logger)?;
    log::set_max_level(log::LevelFilter::Trace);
    Ok(())
}

pub fn level_for(verbosity: u8) -> log::Level {
    match verbosity {
        0 => log::Level::Warn,
        1 => log::Level::Info,
        2 => log::Level::Debug,
        _ => log::Level::Trace,
    }
}

pub struct AppLogger {
    min_level: RwLock<log::Level>,
}

impl AppLogger {
    fn new(min_level: log::Level) -> Self {
        Self {
            min_level: RwLock::new(min_level),
        }
    }

    pub fn min_level(&self) -> log::Level {
        *self.min_level.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn set_min_level(&self, level: log::Level) {
        *self.min_level.write().unwrap_or_else(PoisonError::into_inner) = level;
    }

    fn format(level: log::Level, source: &str, message: &str) -> String {
        format!("[{:<5} {}] {}", level, source, message)
    }
}

impl Log for AppLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.min_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let line = Self::format(
                record.level(),
                record.module_path().unwrap_or("unknown"),
                &record.args().to_string(),
            );
            // nowhere to report a failing stderr
            let _ = writeln!(io::stderr().lock(), "{}", line);
        }
    }

    fn flush(&self) {
        let _ = io::stderr().flush();
    }
}
