//! `dsomig_log`:
//! Console logging for the migrator.
//!
//! Every line reads `[HH:MM:SS] [CODE] - message`. Lines are `tracing`
//! events; the severity travels as a `severity` field and the
//! [`ConsoleFormat`] event formatter turns it into the three-letter code.
//!
//! - `severity` : severity enum and the read-only code table
//! - `console`  : event formatter, subscriber setup, convenience functions
//! - `capture`  : in-memory writer for asserting on emitted lines

pub mod capture;
pub mod console;
pub mod severity;

pub use capture::LogCapture;
pub use console::{
    ConsoleFormat, TARGET_CONSOLE, build_env_filter, client, console_subscriber, debug, error,
    exception, info, init_console_logger, log, log_named,
};
pub use severity::{CODE_FALLBACK, LogSeverity, code_for_name};
