//! Filesystem operations a migration task is made of.
//!
//! `execute` never fails: every filesystem error is logged where it happens
//! and counted in the returned [`ReportOperation`].

use std::path::PathBuf;

use dsomig_io_fs::{EnumRemoveOutcome, SpecCopyOptions, copy_tree, remove_path};
use dsomig_log as logger;

/// What one operation (or a whole task) did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOperation {
    pub cnt_copied: u64,
    pub cnt_removed: u64,
    pub cnt_skipped: u64,
    pub cnt_errors: u64,
    /// The operation stopped before doing any work (a copy that failed setup).
    pub if_aborted: bool,
}

impl ReportOperation {
    pub fn merge(&mut self, other: &ReportOperation) {
        self.cnt_copied += other.cnt_copied;
        self.cnt_removed += other.cnt_removed;
        self.cnt_skipped += other.cnt_skipped;
        self.cnt_errors += other.cnt_errors;
        self.if_aborted |= other.if_aborted;
    }

    pub fn has_errors(&self) -> bool {
        self.cnt_errors > 0
    }

    fn failed() -> Self {
        Self {
            cnt_errors: 1,
            ..Self::default()
        }
    }

    fn aborted() -> Self {
        Self {
            if_aborted: true,
            ..Self::failed()
        }
    }
}

#[derive(Debug, Clone)]
pub enum Operation {
    Copy(CopyOperation),
    Delete(DeleteOperation),
}

impl Operation {
    pub fn execute(&self) -> ReportOperation {
        match self {
            Operation::Copy(op) => op.execute(),
            Operation::Delete(op) => op.execute(),
        }
    }
}

impl From<CopyOperation> for Operation {
    fn from(op: CopyOperation) -> Self {
        Operation::Copy(op)
    }
}

impl From<DeleteOperation> for Operation {
    fn from(op: DeleteOperation) -> Self {
        Operation::Delete(op)
    }
}

////////////////////////////////////////////////////////////////////////////////
// #region Copy

/// Recursively copy `src` into `dst`.
#[derive(Debug, Clone)]
pub struct CopyOperation {
    pub src: PathBuf,
    pub dst: PathBuf,
    pub spec_cp_options: SpecCopyOptions,
}

impl CopyOperation {
    pub fn new(src: impl Into<PathBuf>, dst: impl Into<PathBuf>) -> Self {
        Self {
            src: src.into(),
            dst: dst.into(),
            spec_cp_options: SpecCopyOptions::default(),
        }
    }

    pub fn with_options(mut self, spec_cp_options: SpecCopyOptions) -> Self {
        self.spec_cp_options = spec_cp_options;
        self
    }

    pub fn execute(&self) -> ReportOperation {
        if !self.src.exists() {
            logger::error(&format!("Source path not found: {}", self.src.display()));
            return ReportOperation::default();
        }

        let report_cp = match copy_tree(&self.src, &self.dst, self.spec_cp_options.clone()) {
            Ok(v) => v,
            Err(e) => {
                logger::error(&format!(
                    "Copy from {} to {} failed: {e}",
                    self.src.display(),
                    self.dst.display()
                ));
                return ReportOperation::aborted();
            }
        };

        for spec_err in &report_cp.errors {
            logger::error(&format!(
                "Failed to copy '{}': {}",
                spec_err.path.display(),
                spec_err.exception
            ));
        }
        for warning in &report_cp.warnings {
            logger::debug(warning);
        }

        logger::info("Copy operation completed successfully.");
        logger::debug(&report_cp.format("Copy summary:"));

        ReportOperation {
            cnt_copied: report_cp.cnt_copied,
            cnt_skipped: report_cp.cnt_skipped,
            cnt_errors: report_cp.error_count() as u64,
            ..ReportOperation::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region Delete

/// Delete a file, or a whole directory when `recursive` is set.
#[derive(Debug, Clone)]
pub struct DeleteOperation {
    pub target: PathBuf,
    pub recursive: bool,
    pub if_dry_run: bool,
}

impl DeleteOperation {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
            recursive: true,
            if_dry_run: false,
        }
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn dry_run(mut self, if_dry_run: bool) -> Self {
        self.if_dry_run = if_dry_run;
        self
    }

    pub fn execute(&self) -> ReportOperation {
        if self.if_dry_run {
            return self.preview();
        }

        match remove_path(&self.target, self.recursive) {
            Ok(EnumRemoveOutcome::Missing) => {
                logger::info(&format!(
                    "Target not found, skipping: {}",
                    self.target.display()
                ));
                ReportOperation::default()
            }
            Ok(EnumRemoveOutcome::RemovedDirectory) => {
                logger::info(&format!("Deleted directory: {}", self.target.display()));
                ReportOperation {
                    cnt_removed: 1,
                    ..ReportOperation::default()
                }
            }
            Ok(EnumRemoveOutcome::RemovedEntry) => {
                logger::info(&format!("Deleted file: {}", self.target.display()));
                ReportOperation {
                    cnt_removed: 1,
                    ..ReportOperation::default()
                }
            }
            Err(e) => {
                logger::error(&format!(
                    "Failed to delete '{}': {}",
                    e.path.display(),
                    e.source
                ));
                ReportOperation::failed()
            }
        }
    }

    fn preview(&self) -> ReportOperation {
        if self.target.symlink_metadata().is_err() {
            logger::info(&format!(
                "Target not found, skipping: {}",
                self.target.display()
            ));
            return ReportOperation::default();
        }
        logger::info(&format!("Dry run, would delete: {}", self.target.display()));
        ReportOperation {
            cnt_skipped: 1,
            ..ReportOperation::default()
        }
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
