use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobMatcher};

use crate::spec::CopyTreeError;

////////////////////////////////////////////////////////////////////////////////
// #region PatternMatching

#[derive(Debug, Clone, Default)]
pub(crate) struct SpecExcludePatterns {
    l_matchers: Vec<GlobMatcher>,
}

impl SpecExcludePatterns {
    pub(crate) fn compile(patterns: Option<&[String]>) -> Result<Self, CopyTreeError> {
        let Some(patterns) = patterns else {
            return Ok(Self::default());
        };

        let mut l_matchers = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            let matcher = Glob::new(pattern)
                .map_err(|e| CopyTreeError::InvalidPattern(format!("{pattern} ({e})")))?
                .compile_matcher();
            l_matchers.push(matcher);
        }
        Ok(Self { l_matchers })
    }

    pub(crate) fn is_excluded(&self, name: &str) -> bool {
        self.l_matchers.iter().any(|m| m.is_match(name))
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region PathUtilities

fn _normalize_path(path: &Path) -> PathBuf {
    if let Ok(resolved) = fs::canonicalize(path) {
        return resolved;
    }
    // A missing leaf cannot be canonicalized; resolve its parent instead.
    if let (Some(parent), Some(name)) = (path.parent(), path.file_name())
        && let Ok(parent_resolved) = fs::canonicalize(parent)
    {
        return parent_resolved.join(name);
    }
    _absolutize_path(path)
}

fn _absolutize_path(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(path)
}

/// `true` when `dst` is `src` itself or lies somewhere below it. Both paths
/// are resolved first, so links on either side are followed.
pub(crate) fn is_destination_inside_source(src: &Path, dst: &Path) -> bool {
    _normalize_path(dst).starts_with(_normalize_path(src))
}

/// Map a source entry below `path_dir_src` onto the same relative path below
/// `path_dir_dst`.
pub(crate) fn derive_destination_path(
    path_src: &Path,
    path_item_name: &str,
    path_dir_src: &Path,
    path_dir_dst: &Path,
) -> PathBuf {
    path_dir_dst.join(
        path_src
            .strip_prefix(path_dir_src)
            .unwrap_or(Path::new(path_item_name)),
    )
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
// #region EntryWrites

pub(crate) fn create_symbolic_link(path_src: &Path, path_dst: &Path) -> Result<(), io::Error> {
    let target = fs::read_link(path_src)?;

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(&target, path_dst)
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::{symlink_dir, symlink_file};
        if path_src.is_dir() {
            symlink_dir(&target, path_dst)
        } else {
            symlink_file(&target, path_dst)
        }
    }
    #[cfg(not(any(unix, windows)))]
    {
        let _ = (target, path_dst);
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "Symbolic links are unsupported on this platform",
        ))
    }
}

/// Copy bytes, then carry permissions, access/modify times and (Linux)
/// extended attributes over to the destination.
pub(crate) fn copy_file_with_metadata(
    path_file_src: &Path,
    path_file_dst: &Path,
) -> Result<(), io::Error> {
    use filetime::{FileTime, set_file_times};

    fs::copy(path_file_src, path_file_dst)?;

    let stat_src = fs::metadata(path_file_src)?;
    let file_time_access = FileTime::from_last_access_time(&stat_src);
    let file_time_modify = FileTime::from_last_modification_time(&stat_src);
    set_file_times(path_file_dst, file_time_access, file_time_modify)?;
    fs::set_permissions(path_file_dst, stat_src.permissions())?;

    #[cfg(target_os = "linux")]
    copy_xattrs_linux(path_file_src, path_file_dst);
    Ok(())
}

#[cfg(target_os = "linux")]
fn copy_xattrs_linux(path_file_src: &Path, path_file_dst: &Path) {
    let Ok(iter_xattr_names) = xattr::list(path_file_src) else {
        return;
    };

    for name in iter_xattr_names {
        let Some(raw_value) = xattr::get(path_file_src, &name).ok().flatten() else {
            continue;
        };
        let _ = xattr::set(path_file_dst, &name, &raw_value);
    }
}

// #endregion
////////////////////////////////////////////////////////////////////////////////
