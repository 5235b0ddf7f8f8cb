//! Logging setup for the swerve executables
//!
//! Records from the swerve crates are logged down to the level chosen on the
//! command line. Records from third party crates are capped at `Info`, so a
//! `--log-level trace` run only traces swerve code.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use log::{self, info, Record};
use fern;
use colored::{ColoredString, Colorize};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Log targets which follow the chosen minimum level.
pub const SWERVE_TARGETS: [&str; 3] = ["swerve_lib", "swerve_exec", "util"];

/// Level that every other target is capped at.
const DEPENDENCY_LEVEL: LevelFilter = LevelFilter::Info;

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("Expected a log level of at least `INFO`, found `{0}`")]
    InvalidMinLogLevel(log::LevelFilter),

    #[error("Error initialising the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("An error occured while setting up the logger: {0}")]
    FernInitError(log::SetLoggerError)
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Initialise the logger for this execution, writing to stdout and the
/// session's log file.
///
/// `min_level` applies to [`SWERVE_TARGETS`] and must be `Info` or more
/// verbose. Must only be called once per process.
pub fn logger_init(
    min_level: LevelFilter,
    session: &Session
) -> Result<(), LoggerInitError> {

    if min_level < log::Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level))
    }

    let log_file = fern::log_file(&session.log_file_path)
        .map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| out.finish(format_args!(
            "[{:10.6} {}] {}{}",
            session::get_elapsed_seconds(),
            level_to_str(record.level()),
            target_prefix(record),
            message
        )))
        .level(DEPENDENCY_LEVEL);

    for target in SWERVE_TARGETS.iter() {
        dispatch = dispatch.level_for(*target, min_level);
    }

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging to {:?} at {:?}", session.log_file_path, min_level);
    if let Some(epoch) = session::get_epoch() {
        info!("Session epoch {}", epoch);
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Debug and trace lines name the module they came from.
fn target_prefix(record: &Record) -> String {
    if record.level() > log::Level::Info {
        format!("{}: ", record.target())
    }
    else {
        String::new()
    }
}

/// Three letter tag for a level
fn level_to_str(level: log::Level) -> ColoredString {
    match level {
        log::Level::Trace => "TRC".dimmed().italic(),
        log::Level::Debug => "DBG".dimmed(),
        log::Level::Info  => "INF".normal(),
        log::Level::Warn  => "WRN".yellow(),
        log::Level::Error => "ERR".red().bold()
    }
}
