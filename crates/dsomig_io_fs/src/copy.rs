//! Filesystem tree traversal and copy orchestration.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::report::{ReportCopy, ReportCopyBuilder};
use crate::spec::{CopyTreeError, EnumCopySymlinkStrategy, SpecCopyOptions};
use crate::util::{
    SpecExcludePatterns, copy_file_with_metadata, create_symbolic_link, derive_destination_path,
    is_destination_inside_source,
};

#[derive(Debug, Clone)]
struct SpecDirEntry {
    path_dir_src_sub: PathBuf,
    name_dir: String,
    if_is_symlink: bool,
}

#[derive(Debug, Clone)]
struct SpecFileEntry {
    path_file_src: PathBuf,
    name_file: String,
    if_is_symlink: bool,
}

#[derive(Debug)]
struct SpecCopyContext {
    path_dir_src: PathBuf,
    path_dir_dst: PathBuf,
    spec_cp_options: SpecCopyOptions,
    spec_ex_pats: SpecExcludePatterns,
    builder_cp_report: ReportCopyBuilder,
    set_visited_dirs: HashSet<(u64, u64)>,
}

/// Copy a directory tree from `dir_source` to `dir_destination`.
///
/// The destination (and its missing ancestors) is created first. The walk is
/// depth-first and top-down: the files of a directory are copied before its
/// subdirectories are entered, and entries are visited in name order.
/// Existing destination directories are merged into; existing files are
/// overwritten. Every copied file keeps its permissions and timestamps.
/// Links on the destination side (a symlinked or junctioned library folder,
/// or a linked directory inside it) are followed.
///
/// Copying is best-effort. A failure on one entry is recorded in the
/// returned [`ReportCopy`] and the walk continues. [`CopyTreeError`] is only
/// returned for setup failures, before anything is written.
pub fn copy_tree<P, Q>(
    dir_source: P,
    dir_destination: Q,
    spec_cp_options: SpecCopyOptions,
) -> Result<ReportCopy, CopyTreeError>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
{
    let path_dir_src = dir_source.as_ref().to_path_buf();
    let path_dir_dst = dir_destination.as_ref().to_path_buf();

    if !path_dir_src.is_dir() {
        return Err(CopyTreeError::SourceNotDirectory(path_dir_src));
    }
    if is_destination_inside_source(&path_dir_src, &path_dir_dst) {
        return Err(CopyTreeError::SourceDestinationOverlap {
            source_dir: path_dir_src,
            destination_dir: path_dir_dst,
        });
    }
    let spec_ex_pats = SpecExcludePatterns::compile(spec_cp_options.patterns_exclude.as_deref())?;

    if !spec_cp_options.if_dry_run {
        init_destination_root(&path_dir_dst)?;
    }

    let mut spec_cp_ctx = SpecCopyContext {
        path_dir_src: path_dir_src.clone(),
        path_dir_dst,
        spec_cp_options,
        spec_ex_pats,
        builder_cp_report: ReportCopyBuilder::default(),
        set_visited_dirs: HashSet::new(),
    };

    walk_directory(&path_dir_src, &mut spec_cp_ctx);
    Ok(spec_cp_ctx.builder_cp_report.build())
}

fn init_destination_root(path_dir_dst: &Path) -> Result<(), CopyTreeError> {
    fs::create_dir_all(path_dir_dst).map_err(|e| CopyTreeError::DestinationInitFailed {
        path: path_dir_dst.to_path_buf(),
        message: e.to_string(),
    })
}

/// Loop guard for dereferenced directory symlinks.
fn should_skip_visited_directory(path_root: &Path, spec_cp_ctx: &mut SpecCopyContext) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::MetadataExt;

        let Ok(stat_root) = fs::metadata(path_root) else {
            spec_cp_ctx
                .builder_cp_report
                .add_warning(format!("Failed to stat directory: {}", path_root.display()));
            return true;
        };
        if !spec_cp_ctx
            .set_visited_dirs
            .insert((stat_root.dev(), stat_root.ino()))
        {
            spec_cp_ctx
                .builder_cp_report
                .add_warning(format!("Symlink loop detected: {}", path_root.display()));
            return true;
        }
    }
    #[cfg(not(unix))]
    {
        let _ = (path_root, &spec_cp_ctx.set_visited_dirs);
    }
    false
}

fn walk_directory(path_root: &Path, spec_cp_ctx: &mut SpecCopyContext) {
    if spec_cp_ctx.spec_cp_options.rule_symlink == EnumCopySymlinkStrategy::Dereference
        && should_skip_visited_directory(path_root, spec_cp_ctx)
    {
        return;
    }

    let iter_entries = match fs::read_dir(path_root) {
        Ok(iter) => iter,
        Err(e) => {
            spec_cp_ctx
                .builder_cp_report
                .add_error(path_root.to_path_buf(), format!("Failed to read directory ({e})"));
            return;
        }
    };

    let mut l_dirs: Vec<SpecDirEntry> = Vec::new();
    let mut l_files: Vec<SpecFileEntry> = Vec::new();

    for entry_res in iter_entries {
        let entry = match entry_res {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx.builder_cp_report.add_error(
                    path_root.to_path_buf(),
                    format!("Failed to read directory entry ({e})"),
                );
                continue;
            }
        };

        let path_entry = entry.path();
        let c_name = entry.file_name().to_string_lossy().to_string();
        let cfg_file_type = match entry.file_type() {
            Ok(v) => v,
            Err(e) => {
                spec_cp_ctx
                    .builder_cp_report
                    .add_error(path_entry, format!("Failed to inspect entry ({e})"));
                continue;
            }
        };

        let b_is_symlink = cfg_file_type.is_symlink();
        let b_is_dir = cfg_file_type.is_dir() || (b_is_symlink && path_entry.is_dir());
        if b_is_dir {
            l_dirs.push(SpecDirEntry {
                path_dir_src_sub: path_entry,
                name_dir: c_name,
                if_is_symlink: b_is_symlink,
            });
        } else if cfg_file_type.is_file() || b_is_symlink {
            l_files.push(SpecFileEntry {
                path_file_src: path_entry,
                name_file: c_name,
                if_is_symlink: b_is_symlink,
            });
        } else {
            spec_cp_ctx.builder_cp_report.add_scanned();
            spec_cp_ctx.builder_cp_report.add_skipped();
            spec_cp_ctx
                .builder_cp_report
                .add_warning(format!("Special file skipped: {}", path_entry.display()));
        }
    }

    l_dirs.sort_by(|a, b| a.name_dir.cmp(&b.name_dir));
    l_files.sort_by(|a, b| a.name_file.cmp(&b.name_file));

    for file_entry in l_files {
        handle_file_entry(file_entry, spec_cp_ctx);
    }

    for dir_entry in l_dirs {
        let path_next = dir_entry.path_dir_src_sub.clone();
        if handle_dir_entry(dir_entry, spec_cp_ctx) {
            walk_directory(&path_next, spec_cp_ctx);
        }
    }
}

/// Returns `true` when the walk should descend into this directory.
fn handle_dir_entry(spec_dir_entry: SpecDirEntry, spec_cp_ctx: &mut SpecCopyContext) -> bool {
    spec_cp_ctx.builder_cp_report.add_scanned();

    if spec_cp_ctx.spec_ex_pats.is_excluded(&spec_dir_entry.name_dir) {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return false;
    }

    let enum_rule_symlink = spec_cp_ctx.spec_cp_options.rule_symlink;
    let if_dry_run = spec_cp_ctx.spec_cp_options.if_dry_run;
    let path_dir_dst_sub = derive_destination_path(
        &spec_dir_entry.path_dir_src_sub,
        &spec_dir_entry.name_dir,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );

    if spec_dir_entry.if_is_symlink {
        match enum_rule_symlink {
            EnumCopySymlinkStrategy::SkipSymlinks => {
                spec_cp_ctx.builder_cp_report.add_skipped();
                return false;
            }
            EnumCopySymlinkStrategy::CopySymlinks => {
                link_entry(
                    &spec_dir_entry.path_dir_src_sub,
                    &path_dir_dst_sub,
                    spec_cp_ctx,
                );
                return false;
            }
            EnumCopySymlinkStrategy::Dereference => {}
        }
    }

    if path_dir_dst_sub.is_file() {
        spec_cp_ctx.builder_cp_report.add_error(
            spec_dir_entry.path_dir_src_sub,
            format!(
                "Destination is a file, expected directory: {}",
                path_dir_dst_sub.display()
            ),
        );
        return false;
    }

    if if_dry_run {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return true;
    }

    match fs::create_dir_all(&path_dir_dst_sub) {
        Ok(()) => {
            spec_cp_ctx.builder_cp_report.add_copied();
            true
        }
        Err(e) => {
            spec_cp_ctx
                .builder_cp_report
                .add_error(spec_dir_entry.path_dir_src_sub, e.to_string());
            false
        }
    }
}

fn handle_file_entry(spec_file_entry: SpecFileEntry, spec_cp_ctx: &mut SpecCopyContext) {
    spec_cp_ctx.builder_cp_report.add_scanned();

    if spec_cp_ctx.spec_ex_pats.is_excluded(&spec_file_entry.name_file) {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return;
    }

    let enum_rule_symlink = spec_cp_ctx.spec_cp_options.rule_symlink;
    let path_file_dst = derive_destination_path(
        &spec_file_entry.path_file_src,
        &spec_file_entry.name_file,
        &spec_cp_ctx.path_dir_src,
        &spec_cp_ctx.path_dir_dst,
    );

    if spec_file_entry.if_is_symlink {
        match enum_rule_symlink {
            EnumCopySymlinkStrategy::SkipSymlinks => {
                spec_cp_ctx.builder_cp_report.add_skipped();
                return;
            }
            EnumCopySymlinkStrategy::CopySymlinks => {
                link_entry(&spec_file_entry.path_file_src, &path_file_dst, spec_cp_ctx);
                return;
            }
            EnumCopySymlinkStrategy::Dereference => {
                match fs::metadata(&spec_file_entry.path_file_src) {
                    Ok(meta_target) if meta_target.is_file() => {}
                    Ok(_) => {
                        spec_cp_ctx.builder_cp_report.add_skipped();
                        spec_cp_ctx.builder_cp_report.add_warning(format!(
                            "Special file target skipped: {}",
                            spec_file_entry.path_file_src.display()
                        ));
                        return;
                    }
                    Err(_) => {
                        spec_cp_ctx.builder_cp_report.add_error(
                            spec_file_entry.path_file_src.clone(),
                            format!(
                                "Broken symlink: {}",
                                spec_file_entry.path_file_src.display()
                            ),
                        );
                        return;
                    }
                }
            }
        }
    }

    if path_file_dst.is_dir() {
        spec_cp_ctx.builder_cp_report.add_error(
            spec_file_entry.path_file_src,
            format!("Destination is a directory: {}", path_file_dst.display()),
        );
        return;
    }

    if spec_cp_ctx.spec_cp_options.if_dry_run {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return;
    }

    match copy_file_with_metadata(&spec_file_entry.path_file_src, &path_file_dst) {
        Ok(()) => spec_cp_ctx.builder_cp_report.add_copied(),
        Err(e) => spec_cp_ctx
            .builder_cp_report
            .add_error(spec_file_entry.path_file_src, e.to_string()),
    }
}

/// Recreate a symlink entry at the destination, replacing whatever link was
/// left there by an earlier run.
fn link_entry(path_src: &Path, path_dst: &Path, spec_cp_ctx: &mut SpecCopyContext) {
    match fs::symlink_metadata(path_dst) {
        Ok(meta_dst) if !meta_dst.file_type().is_symlink() => {
            spec_cp_ctx.builder_cp_report.add_error(
                path_src.to_path_buf(),
                format!(
                    "Destination exists and is not a symlink: {}",
                    path_dst.display()
                ),
            );
            return;
        }
        Ok(_) if spec_cp_ctx.spec_cp_options.if_dry_run => {}
        Ok(_) => {
            if let Err(e) = fs::remove_file(path_dst) {
                spec_cp_ctx
                    .builder_cp_report
                    .add_error(path_src.to_path_buf(), e.to_string());
                return;
            }
        }
        Err(_) => {}
    }

    if spec_cp_ctx.spec_cp_options.if_dry_run {
        spec_cp_ctx.builder_cp_report.add_skipped();
        return;
    }

    match create_symbolic_link(path_src, path_dst) {
        Ok(()) => spec_cp_ctx.builder_cp_report.add_copied(),
        Err(e) => spec_cp_ctx
            .builder_cp_report
            .add_error(path_src.to_path_buf(), e.to_string()),
    }
}
