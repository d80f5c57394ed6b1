//! `dsomig`:
//! Moves a standalone Drakensang Online installation into the Steam library.
//!
//! Modules:
//! - `operation` : copy/delete operations and their reports
//! - `task`      : named, ordered groups of operations
//! - `migrator`  : precondition checks and the fixed task plan
//! - `config`    : defaults, TOML file and CLI flags
//! - `paths`     : default install locations and shortcut lookup
//! - `banner`    : instructions, confirmation prompt, title
//! - `error`     : crate error type

pub mod banner;
pub mod config;
pub mod error;
pub mod migrator;
pub mod operation;
pub mod paths;
pub mod task;

pub use banner::{AutoConfirm, Confirm, TermConfirm, confirm_start, run_banner};
pub use config::{CliArgs, FileConfig, MigrateConfig, SymlinkMode, resolve_log_filter};
pub use error::{MigrateError, Result};
pub use migrator::{MigrationOptions, MigrationState, Migrator};
pub use operation::{CopyOperation, DeleteOperation, Operation, ReportOperation};
pub use task::MigrationTask;
