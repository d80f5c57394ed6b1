use dsomig_log as logger;

use crate::operation::{Operation, ReportOperation};

/// Named, ordered group of operations run as one migration phase.
#[derive(Debug, Clone)]
pub struct MigrationTask {
    pub name: String,
    pub operations: Vec<Operation>,
}

impl MigrationTask {
    pub fn new(name: impl Into<String>, operations: Vec<Operation>) -> Self {
        Self {
            name: name.into(),
            operations,
        }
    }

    /// Execute every operation in order. Always reaches the completion line.
    pub fn run(&self) -> ReportOperation {
        logger::info(&format!("Starting task: {}", self.name));

        let mut report_task = ReportOperation::default();
        for op in &self.operations {
            report_task.merge(&op.execute());
        }

        logger::info(&format!("Completed task: {}", self.name));
        report_task
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use dsomig_log::LogCapture;

    use super::MigrationTask;
    use crate::operation::{CopyOperation, DeleteOperation};

    #[test]
    fn task_runs_operations_in_order() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let src = tmp.path().join("src");
        let dst = tmp.path().join("dst");
        fs::create_dir_all(&src).expect("mkdir");
        fs::write(src.join("a.txt"), "a").expect("write");

        // Copy first, then delete the source: reversing the order would lose a.txt.
        let task = MigrationTask::new(
            "Move",
            vec![
                CopyOperation::new(&src, &dst).into(),
                DeleteOperation::new(&src).into(),
            ],
        );
        let report = LogCapture::new().run(|| task.run());

        assert_eq!(report.cnt_copied, 1);
        assert_eq!(report.cnt_removed, 1);
        assert!(dst.join("a.txt").exists());
        assert!(!src.exists());
    }

    #[test]
    fn task_logs_start_and_completion_even_when_operations_fail() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let task = MigrationTask::new(
            "Copy Game Files",
            vec![CopyOperation::new(tmp.path().join("missing"), tmp.path().join("dst")).into()],
        );

        let log_capture = LogCapture::new();
        log_capture.run(|| task.run());

        let l_lines = log_capture.lines();
        assert_eq!(l_lines.len(), 3);
        assert!(l_lines[0].ends_with("[INF] - Starting task: Copy Game Files"));
        assert!(l_lines[1].contains("[ERR]"));
        assert!(l_lines[2].ends_with("[INF] - Completed task: Copy Game Files"));
    }

    #[test]
    fn empty_task_still_logs_both_lines() {
        let log_capture = LogCapture::new();
        let report = log_capture.run(|| MigrationTask::new("Nothing", Vec::new()).run());

        assert!(!report.has_errors());
        assert_eq!(log_capture.count_code("INF"), 2);
    }
}
