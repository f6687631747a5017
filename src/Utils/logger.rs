//! Terminal logging backend for the `log` facade.
use crate::quiz::errors::QuizError;
use log::info;
use simplelog::{ColorChoice, CombinedLogger, Config, LevelFilter, TermLogger, TerminalMode};

/// Maps a level name to a filter; `None` means logging is switched off.
pub fn level_filter(loglevel: &str) -> Result<Option<LevelFilter>, QuizError> {
    match loglevel.trim().to_lowercase().as_str() {
        "debug" => Ok(Some(LevelFilter::Debug)),
        "info" => Ok(Some(LevelFilter::Info)),
        "warn" => Ok(Some(LevelFilter::Warn)),
        "error" => Ok(Some(LevelFilter::Error)),
        "off" | "none" => Ok(None),
        other => Err(QuizError::Config(format!(
            "loglevel must be debug, info, warn, error or off, got {}",
            other
        ))),
    }
}

/// Installs a terminal logger. A logger can only be set once per process, later calls are no-ops.
pub fn init_logger(loglevel: &str) -> Result<(), QuizError> {
    let Some(filter) = level_filter(loglevel)? else {
        return Ok(());
    };
    let logger_instance = CombinedLogger::init(vec![TermLogger::new(
        filter,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
    if logger_instance.is_ok() {
        info!("logger initialised at level {}", filter);
    }
    Ok(())
}
