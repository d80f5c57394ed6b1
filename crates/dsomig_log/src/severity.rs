//! Severity tags and their display codes.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Code used for any severity name outside the table.
pub const CODE_FALLBACK: &str = "LOG";

static MAP_SEVERITY_CODES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("INFO", "INF"),
        ("DEBUG", "DBG"),
        ("ERROR", "ERR"),
        ("CLIENT", "CLT"),
        ("EXCEPTION", "EXE"),
    ])
});

/// Display code for a severity name, case-insensitive.
pub fn code_for_name(name: &str) -> &'static str {
    MAP_SEVERITY_CODES
        .get(name.to_ascii_uppercase().as_str())
        .copied()
        .unwrap_or(CODE_FALLBACK)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogSeverity {
    Info,
    Debug,
    Error,
    /// Messages addressed to the person running the tool.
    Client,
    /// Failures caught at the top level.
    Exception,
}

impl LogSeverity {
    pub const ALL: [LogSeverity; 5] = [
        LogSeverity::Info,
        LogSeverity::Debug,
        LogSeverity::Error,
        LogSeverity::Client,
        LogSeverity::Exception,
    ];

    pub fn name(self) -> &'static str {
        match self {
            LogSeverity::Info => "INFO",
            LogSeverity::Debug => "DEBUG",
            LogSeverity::Error => "ERROR",
            LogSeverity::Client => "CLIENT",
            LogSeverity::Exception => "EXCEPTION",
        }
    }

    pub fn code(self) -> &'static str {
        code_for_name(self.name())
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|severity| severity.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for LogSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
