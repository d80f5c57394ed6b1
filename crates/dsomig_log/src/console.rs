//! Console event formatter and the logging entry points.

use std::fmt;
use std::fmt::Write as _;

use chrono::Local;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::{self, FormatEvent, FormatFields};
use tracing_subscriber::fmt::{FmtContext, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};

use crate::severity::{CODE_FALLBACK, LogSeverity, code_for_name};

/// Target attached to every line emitted through this module.
pub const TARGET_CONSOLE: &str = "dsomig";

const FIELD_SEVERITY: &str = "severity";
const FIELD_MESSAGE: &str = "message";

////////////////////////////////////////////////////////////////////////////////
// #region Formatter

/// Renders `[HH:MM:SS] [CODE] - message`.
///
/// The code comes from the event's `severity` field. Events without one
/// (dependencies logging through plain `tracing` macros) get a code from
/// their level instead.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleFormat;

impl<S, N> FormatEvent<S, N> for ConsoleFormat
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &FmtContext<'_, S, N>,
        mut writer: format::Writer<'_>,
        event: &Event<'_>,
    ) -> fmt::Result {
        let mut visitor = VisitorConsoleFields::default();
        event.record(&mut visitor);

        let c_code = match visitor.severity.as_deref() {
            Some(name) => code_for_name(name),
            None => code_for_level(event.metadata().level()),
        };
        let c_time = Local::now().format("%H:%M:%S");
        writeln!(writer, "[{c_time}] [{c_code}] - {}", visitor.message)
    }
}

fn code_for_level(level: &Level) -> &'static str {
    if *level == Level::ERROR {
        LogSeverity::Error.code()
    } else if *level == Level::INFO {
        LogSeverity::Info.code()
    } else if *level == Level::DEBUG {
        LogSeverity::Debug.code()
    } else {
        CODE_FALLBACK
    }
}

#[derive(Debug, Default)]
struct VisitorConsoleFields {
    message: String,
    severity: Option<String>,
}

impl Visit for VisitorConsoleFields {
    fn record_str(&mut self, field: &Field, value: &str) {
        match field.name() {
            FIELD_MESSAGE => self.message = value.to_string(),
            FIELD_SEVERITY => self.severity = Some(value.to_string()),
            _ => {}
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        match field.name() {
            FIELD_MESSAGE => self.message = format!("{value:?}"),
            FIELD_SEVERITY => self.severity = Some(format!("{value:?}")),
            _ => {}
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region SubscriberSetup

/// `RUST_LOG` when set, otherwise `filter_default`.
pub fn build_env_filter(filter_default: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_default))
}

/// Subscriber that writes console lines to `make_writer`.
pub fn console_subscriber<W>(make_writer: W, filter: EnvFilter) -> impl Subscriber + Send + Sync
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(make_writer)
            .event_format(ConsoleFormat),
    )
}

/// Install the stdout console subscriber for the whole process.
pub fn init_console_logger(filter_default: &str) -> Result<(), TryInitError> {
    console_subscriber(std::io::stdout, build_env_filter(filter_default)).try_init()
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Emitters

pub fn log(severity: LogSeverity, message: &str) {
    let c_name = severity.name();
    match severity {
        LogSeverity::Debug => {
            tracing::debug!(target: TARGET_CONSOLE, severity = c_name, "{message}")
        }
        LogSeverity::Error | LogSeverity::Exception => {
            tracing::error!(target: TARGET_CONSOLE, severity = c_name, "{message}")
        }
        LogSeverity::Info | LogSeverity::Client => {
            tracing::info!(target: TARGET_CONSOLE, severity = c_name, "{message}")
        }
    }
}

/// Log with a severity given by name; unknown names print with the `LOG` code.
pub fn log_named(name: &str, message: &str) {
    match LogSeverity::from_name(name) {
        Some(severity) => log(severity, message),
        None => tracing::info!(target: TARGET_CONSOLE, severity = name, "{message}"),
    }
}

pub fn info(message: &str) {
    log(LogSeverity::Info, message);
}

pub fn debug(message: &str) {
    log(LogSeverity::Debug, message);
}

pub fn error(message: &str) {
    log(LogSeverity::Error, message);
}

pub fn client(message: &str) {
    log(LogSeverity::Client, message);
}

pub fn exception(message: &str) {
    log(LogSeverity::Exception, message);
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
