//! Top-level coordinator: precondition checks, task plan, sequential run.

use std::fs;
use std::path::{Path, PathBuf};

use dsomig_io_fs::SpecCopyOptions;
use dsomig_log as logger;

use crate::error::{MigrateError, Result};
use crate::operation::{CopyOperation, DeleteOperation, ReportOperation};
use crate::task::MigrationTask;

pub const TASK_COPY_GAME_FILES: &str = "Copy Game Files";
pub const TASK_DELETE_SHORTCUT: &str = "Delete Shortcut";
pub const TASK_REMOVE_OLD_INSTALLATION: &str = "Remove Old Installation";

/// Progress of one migration run. Only ever moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationState {
    NotStarted,
    Validated,
    Copying,
    DeletingShortcut,
    DeletingSource,
    Done,
    /// Preconditions failed; nothing was touched.
    Aborted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnumTaskKind {
    CopyGameFiles,
    DeleteShortcut,
    RemoveOldInstallation,
}

impl EnumTaskKind {
    fn state(self) -> MigrationState {
        match self {
            EnumTaskKind::CopyGameFiles => MigrationState::Copying,
            EnumTaskKind::DeleteShortcut => MigrationState::DeletingShortcut,
            EnumTaskKind::RemoveOldInstallation => MigrationState::DeletingSource,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MigrationOptions {
    /// Forwarded to the copy step; `if_dry_run` also applies to deletes.
    pub spec_cp_options: SpecCopyOptions,
    /// Keep the old installation when the copy step reported any error.
    pub require_complete_copy: bool,
}

#[derive(Debug, Clone)]
pub struct Migrator {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub shortcut: Option<PathBuf>,
    pub options: MigrationOptions,
}

impl Migrator {
    pub fn new(
        source: impl Into<PathBuf>,
        destination: impl Into<PathBuf>,
        shortcut: Option<PathBuf>,
    ) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            shortcut,
            options: MigrationOptions::default(),
        }
    }

    pub fn with_options(mut self, options: MigrationOptions) -> Self {
        self.options = options;
        self
    }

    /// Ordered task list for this run. The shortcut task is only present when
    /// a shortcut path is configured.
    pub fn build_tasks(&self) -> Vec<MigrationTask> {
        self.build_plan().into_iter().map(|(_, task)| task).collect()
    }

    fn build_plan(&self) -> Vec<(EnumTaskKind, MigrationTask)> {
        let if_dry_run = self.options.spec_cp_options.if_dry_run;

        let mut l_plan = vec![(
            EnumTaskKind::CopyGameFiles,
            MigrationTask::new(
                TASK_COPY_GAME_FILES,
                vec![
                    CopyOperation::new(&self.source, &self.destination)
                        .with_options(self.options.spec_cp_options.clone())
                        .into(),
                ],
            ),
        )];
        if let Some(shortcut) = &self.shortcut {
            l_plan.push((
                EnumTaskKind::DeleteShortcut,
                MigrationTask::new(
                    TASK_DELETE_SHORTCUT,
                    vec![
                        DeleteOperation::new(shortcut)
                            .recursive(false)
                            .dry_run(if_dry_run)
                            .into(),
                    ],
                ),
            ));
        }
        l_plan.push((
            EnumTaskKind::RemoveOldInstallation,
            MigrationTask::new(
                TASK_REMOVE_OLD_INSTALLATION,
                vec![
                    DeleteOperation::new(&self.source)
                        .recursive(true)
                        .dry_run(if_dry_run)
                        .into(),
                ],
            ),
        ));
        l_plan
    }

    /// Run the whole migration and return the terminal state
    /// ([`MigrationState::Done`] or [`MigrationState::Aborted`]).
    pub fn perform_migration(&self) -> MigrationState {
        let mut state = MigrationState::NotStarted;
        logger::info("Migration process initiated.");

        if !self.source.exists() {
            logger::error(&format!(
                "Source directory not found: {}",
                self.source.display()
            ));
            return advance(state, MigrationState::Aborted);
        }
        if let Err(e) = self.ensure_destination_parent() {
            logger::error(&e.to_string());
            return advance(state, MigrationState::Aborted);
        }
        state = advance(state, MigrationState::Validated);

        let mut report_copy = ReportOperation::default();
        for (enum_task_kind, task) in self.build_plan() {
            if enum_task_kind == EnumTaskKind::RemoveOldInstallation
                && !self.should_remove_source(&report_copy)
            {
                continue;
            }

            state = advance(state, enum_task_kind.state());
            let report_task = task.run();
            if enum_task_kind == EnumTaskKind::CopyGameFiles {
                report_copy = report_task;
            }
        }

        logger::info("All migration tasks completed successfully.");
        advance(state, MigrationState::Done)
    }

    /// The source is never removed after a copy that did not run at all. With
    /// `require_complete_copy`, any per-entry copy error also keeps it.
    fn should_remove_source(&self, report_copy: &ReportOperation) -> bool {
        if report_copy.if_aborted {
            logger::error(&format!(
                "Copy did not run; keeping old installation at {}",
                self.source.display()
            ));
            return false;
        }
        if self.options.require_complete_copy && report_copy.has_errors() {
            logger::error(&format!(
                "Copy reported {} error(s); keeping old installation at {}",
                report_copy.cnt_errors,
                self.source.display()
            ));
            return false;
        }
        true
    }

    fn ensure_destination_parent(&self) -> Result<()> {
        let Some(path_parent) = self.destination.parent() else {
            return Ok(());
        };
        if path_parent.as_os_str().is_empty() || path_parent.exists() {
            return Ok(());
        }

        if self.options.spec_cp_options.if_dry_run {
            logger::info(&format!(
                "Dry run, would create destination parent: {}",
                path_parent.display()
            ));
            return Ok(());
        }

        logger::info(&format!(
            "Destination parent missing, creating: {}",
            path_parent.display()
        ));
        create_parent(path_parent)
    }
}

fn create_parent(path_parent: &Path) -> Result<()> {
    fs::create_dir_all(path_parent).map_err(|source| MigrateError::DestinationParent {
        path: path_parent.to_path_buf(),
        source,
    })
}

fn advance(from: MigrationState, to: MigrationState) -> MigrationState {
    logger::debug(&format!("Migration state: {from:?} -> {to:?}"));
    to
}
