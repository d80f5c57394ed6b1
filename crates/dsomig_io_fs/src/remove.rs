//! Single-entry and recursive removal.

use std::fs;
use std::io;
use std::path::Path;

use crate::spec::{EnumRemoveOutcome, RemovePathError};

/// Remove `target`.
///
/// - absent target: `Ok(Missing)`, nothing touched;
/// - directory with `if_recursive`: the whole subtree goes;
/// - anything else: exactly one entry goes (file, symlink, or an empty
///   directory when not recursive).
///
/// A target that vanishes between the existence check and the removal still
/// counts as removed.
pub fn remove_path<P: AsRef<Path>>(
    target: P,
    if_recursive: bool,
) -> Result<EnumRemoveOutcome, RemovePathError> {
    let path_target = target.as_ref();
    let map_remove_err = |source: io::Error| RemovePathError {
        path: path_target.to_path_buf(),
        source,
    };

    // Symlinks are inspected, not followed: a dangling link still exists.
    let meta_target = match fs::symlink_metadata(path_target) {
        Ok(v) => v,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(EnumRemoveOutcome::Missing),
        Err(e) => return Err(map_remove_err(e)),
    };
    let cfg_file_type = meta_target.file_type();

    if cfg_file_type.is_dir() && if_recursive {
        return match fs::remove_dir_all(path_target) {
            Ok(()) => Ok(EnumRemoveOutcome::RemovedDirectory),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Ok(EnumRemoveOutcome::RemovedDirectory)
            }
            Err(e) => Err(map_remove_err(e)),
        };
    }

    match remove_single_entry(path_target, &cfg_file_type) {
        Ok(()) => Ok(EnumRemoveOutcome::RemovedEntry),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(EnumRemoveOutcome::RemovedEntry),
        Err(e) => Err(map_remove_err(e)),
    }
}

fn remove_single_entry(path_target: &Path, cfg_file_type: &fs::FileType) -> io::Result<()> {
    #[cfg(windows)]
    {
        use std::os::windows::fs::FileTypeExt;
        if cfg_file_type.is_symlink_dir() {
            return fs::remove_dir(path_target);
        }
    }

    if cfg_file_type.is_dir() {
        fs::remove_dir(path_target)
    } else {
        fs::remove_file(path_target)
    }
}
