//! Copy/remove specification models and top-level error types.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

////////////////////////////////////////////////////////////////////////////////
// #region EnumsInit

/// Symlink handling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EnumCopySymlinkStrategy {
    /// Follow the link and copy the target bytes/entries.
    #[default]
    Dereference,
    /// Create a symbolic link at destination (do not copy target bytes).
    CopySymlinks,
    /// Ignore symlink entries.
    SkipSymlinks,
}

/// What `remove_path` ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnumRemoveOutcome {
    /// Nothing existed at the target path.
    Missing,
    /// A directory and everything below it was removed.
    RemovedDirectory,
    /// Exactly one entry (file, symlink or empty directory) was removed.
    RemovedEntry,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region StructsAndErrors

/// Input options for `copy_tree`.
///
/// Destination conflicts are fixed: existing directories are merged into and
/// existing files are overwritten.
#[derive(Debug, Clone, Default)]
pub struct SpecCopyOptions {
    /// Glob patterns applied to file and directory basenames; matches are skipped.
    pub patterns_exclude: Option<Vec<String>>,
    /// Symlink handling behavior.
    pub rule_symlink: EnumCopySymlinkStrategy,
    /// Do not mutate filesystem; record what would happen.
    pub if_dry_run: bool,
}

/// One copy failure item with path + error text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpecCopyError {
    /// Source path of the entry that failed.
    pub path: PathBuf,
    /// User-facing error text.
    pub exception: String,
}

/// "Top-level call failed" errors (input validation / setup stage).
#[derive(Debug, Error)]
pub enum CopyTreeError {
    /// Invalid exclude pattern.
    #[error("Invalid exclude pattern: {0}")]
    InvalidPattern(String),
    /// Source path is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    SourceNotDirectory(PathBuf),
    /// Destination lies inside the source (or is the source itself).
    #[error(
        "Source and destination directories overlap: {} <-> {}",
        source_dir.display(),
        destination_dir.display()
    )]
    SourceDestinationOverlap {
        /// Source directory as given.
        source_dir: PathBuf,
        /// Destination directory as given.
        destination_dir: PathBuf,
    },
    /// Destination directory initialization failed.
    #[error("Failed to initialize destination {}: {message}", path.display())]
    DestinationInitFailed {
        /// Destination path that failed initialization.
        path: PathBuf,
        /// Underlying IO error text.
        message: String,
    },
}

/// Removal failed for a reason other than the target being absent.
#[derive(Debug, Error)]
#[error("Failed to remove {}: {source}", path.display())]
pub struct RemovePathError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
