use std::fs;
use std::path::{Path, PathBuf};

use dsomig::migrator::{MigrationOptions, MigrationState, Migrator};
use dsomig_io_fs::SpecCopyOptions;
use dsomig_log::LogCapture;

fn write_text(path: &Path, txt: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent");
    }
    fs::write(path, txt).expect("write text");
}

struct Layout {
    _tmp: tempfile::TempDir,
    src: PathBuf,
    dst: PathBuf,
    shortcut: PathBuf,
}

fn standard_layout() -> Layout {
    let tmp = tempfile::tempdir().expect("tempdir");
    let src = tmp.path().join("src");
    let dst = tmp.path().join("dst");
    let shortcut = tmp.path().join("menu/Drakensang Online.lnk");
    write_text(&src.join("a.txt"), "alpha");
    write_text(&src.join("sub/b.txt"), "beta");
    write_text(&shortcut, "lnk");
    Layout {
        _tmp: tmp,
        src,
        dst,
        shortcut,
    }
}

#[test]
fn full_migration_moves_tree_and_removes_shortcut() {
    let layout = standard_layout();
    let migrator = Migrator::new(&layout.src, &layout.dst, Some(layout.shortcut.clone()));

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| migrator.perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert_eq!(fs::read_to_string(layout.dst.join("a.txt")).expect("read"), "alpha");
    assert_eq!(fs::read_to_string(layout.dst.join("sub/b.txt")).expect("read"), "beta");
    assert!(!layout.src.exists());
    assert!(!layout.shortcut.exists());
    assert_eq!(log_capture.count_code("ERR"), 0);

    let l_lines = log_capture.lines();
    let idx_of = |msg: &str| {
        l_lines
            .iter()
            .position(|l| l.ends_with(msg))
            .unwrap_or_else(|| panic!("missing line: {msg}"))
    };
    let l_order = [
        idx_of("Migration process initiated."),
        idx_of("Starting task: Copy Game Files"),
        idx_of("Completed task: Copy Game Files"),
        idx_of("Starting task: Delete Shortcut"),
        idx_of("Starting task: Remove Old Installation"),
        idx_of("All migration tasks completed successfully."),
    ];
    assert!(l_order.windows(2).all(|w| w[0] < w[1]), "{l_lines:#?}");
}

#[test]
fn second_run_aborts_without_touching_anything() {
    let layout = standard_layout();
    let migrator = Migrator::new(&layout.src, &layout.dst, Some(layout.shortcut.clone()));
    LogCapture::new().run(|| migrator.perform_migration());

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| migrator.perform_migration());

    assert_eq!(state, MigrationState::Aborted);
    assert_eq!(log_capture.count_code("ERR"), 1);
    assert!(log_capture.contains_message(&format!(
        "Source directory not found: {}",
        layout.src.display()
    )));
    assert_eq!(fs::read_to_string(layout.dst.join("a.txt")).expect("read"), "alpha");
}

#[test]
fn missing_shortcut_does_not_block_completion() {
    let layout = standard_layout();
    fs::remove_file(&layout.shortcut).expect("remove shortcut");
    let migrator = Migrator::new(&layout.src, &layout.dst, Some(layout.shortcut.clone()));

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| migrator.perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert_eq!(log_capture.count_code("ERR"), 0);
    assert!(log_capture.contains_message(&format!(
        "Target not found, skipping: {}",
        layout.shortcut.display()
    )));
    assert!(!layout.src.exists());
}

#[test]
fn dry_run_leaves_filesystem_unchanged() {
    let layout = standard_layout();
    let migrator = Migrator::new(&layout.src, &layout.dst, Some(layout.shortcut.clone()))
        .with_options(MigrationOptions {
            spec_cp_options: SpecCopyOptions {
                if_dry_run: true,
                ..SpecCopyOptions::default()
            },
            require_complete_copy: false,
        });

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| migrator.perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert!(!layout.dst.exists());
    assert!(layout.src.join("sub/b.txt").exists());
    assert!(layout.shortcut.exists());
    assert!(log_capture.contains_message(&format!(
        "Dry run, would delete: {}",
        layout.src.display()
    )));
}

fn has_line_containing(log_capture: &LogCapture, needle: &str) -> bool {
    log_capture.lines().iter().any(|l| l.contains(needle))
}

#[cfg(unix)]
#[test]
fn incomplete_copy_keeps_source_when_required() {
    let layout = standard_layout();
    std::os::unix::fs::symlink(layout.src.join("gone.pak"), layout.src.join("dangling.pak"))
        .expect("symlink");

    let migrator = Migrator::new(&layout.src, &layout.dst, None).with_options(MigrationOptions {
        require_complete_copy: true,
        ..MigrationOptions::default()
    });

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| migrator.perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert!(layout.src.join("a.txt").exists());
    assert_eq!(fs::read_to_string(layout.dst.join("a.txt")).expect("read"), "alpha");
    assert_eq!(fs::read_to_string(layout.dst.join("sub/b.txt")).expect("read"), "beta");
    assert!(!has_line_containing(&log_capture, "Starting task: Remove Old Installation"));
    assert!(log_capture.contains_message(&format!(
        "Copy reported 1 error(s); keeping old installation at {}",
        layout.src.display()
    )));
}

#[cfg(unix)]
#[test]
fn incomplete_copy_still_removes_source_by_default() {
    let layout = standard_layout();
    std::os::unix::fs::symlink(layout.src.join("gone.pak"), layout.src.join("dangling.pak"))
        .expect("symlink");

    let log_capture = LogCapture::new();
    let state =
        log_capture.run(|| Migrator::new(&layout.src, &layout.dst, None).perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert_eq!(log_capture.count_code("ERR"), 1);
    assert!(layout.dst.join("sub/b.txt").exists());
    assert!(!layout.src.exists());
}

#[cfg(unix)]
#[test]
fn symlinked_library_folder_receives_the_files() {
    let layout = standard_layout();
    let path_dir_real = layout.src.with_file_name("library_real");
    fs::create_dir_all(&path_dir_real).expect("mkdir real");
    std::os::unix::fs::symlink(&path_dir_real, &layout.dst).expect("symlink");

    let log_capture = LogCapture::new();
    let state =
        log_capture.run(|| Migrator::new(&layout.src, &layout.dst, None).perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert_eq!(log_capture.count_code("ERR"), 0);
    assert_eq!(fs::read_to_string(path_dir_real.join("a.txt")).expect("read"), "alpha");
    assert_eq!(fs::read_to_string(path_dir_real.join("sub/b.txt")).expect("read"), "beta");
    assert!(!layout.src.exists());
}

#[test]
fn destination_above_source_keeps_the_copied_files() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let dst = tmp.path().join("games");
    let src = dst.join("old");
    write_text(&src.join("a.txt"), "alpha");

    let state = LogCapture::new().run(|| Migrator::new(&src, &dst, None).perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert_eq!(fs::read_to_string(dst.join("a.txt")).expect("read"), "alpha");
    assert!(!src.exists());
}

#[test]
fn copy_setup_failure_never_removes_source() {
    let layout = standard_layout();
    let dst = layout.src.join("steam/game");

    let log_capture = LogCapture::new();
    let state = log_capture.run(|| Migrator::new(&layout.src, &dst, None).perform_migration());

    assert_eq!(state, MigrationState::Done);
    assert!(layout.src.join("a.txt").exists());
    assert!(layout.src.join("sub/b.txt").exists());
    assert!(!has_line_containing(&log_capture, "Starting task: Remove Old Installation"));
    assert!(log_capture.contains_message(&format!(
        "Copy did not run; keeping old installation at {}",
        layout.src.display()
    )));
}
