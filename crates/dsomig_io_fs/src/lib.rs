//! `dsomig_io_fs`:
//! Filesystem engine used by the installation migrator.
//!
//! Modules:
//! - `copy`   : depth-first tree copy with per-entry failure reporting
//! - `remove` : single-entry and recursive removal
//! - `spec`   : enums/options/errors
//! - `report` : run-time report model
//! - `util`   : shared helper functions

pub mod copy;
pub mod remove;
pub mod report;
pub mod spec;
mod util;

pub use copy::copy_tree;
pub use remove::remove_path;
pub use report::{ReportCopy, ReportCopyBuilder};
pub use spec::{
    CopyTreeError, EnumCopySymlinkStrategy, EnumRemoveOutcome, RemovePathError, SpecCopyError,
    SpecCopyOptions,
};
