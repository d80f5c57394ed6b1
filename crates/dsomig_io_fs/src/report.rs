//! Copy report models and mutable report builder.

use std::fmt;
use std::path::PathBuf;

use crate::spec::SpecCopyError;

/// Aggregate counters and diagnostics for one `copy_tree` run.
#[derive(Debug, Default, Clone)]
pub struct ReportCopy {
    /// Total scanned directory/file entries (excluded ones included).
    pub cnt_scanned: u64,
    /// Directories created/merged plus files and links written.
    pub cnt_copied: u64,
    /// Entries skipped by exclude patterns, symlink policy or dry-run.
    pub cnt_skipped: u64,
    /// Non-fatal warnings collected during traversal/copy.
    pub warnings: Vec<String>,
    /// Per-entry failures.
    pub errors: Vec<SpecCopyError>,
}

impl ReportCopy {
    /// Number of collected hard errors.
    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Number of collected warnings.
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// Human-readable one-line summary.
    pub fn format(&self, prefix: &str) -> String {
        format!(
            "{prefix} scanned={} copied={} skipped={} errors={} warnings={}",
            self.cnt_scanned,
            self.cnt_copied,
            self.cnt_skipped,
            self.error_count(),
            self.warning_count()
        )
    }
}

impl fmt::Display for ReportCopy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

/// Mutable accumulator for copy statistics.
#[derive(Debug, Default, Clone)]
pub struct ReportCopyBuilder {
    cnt_scanned: u64,
    cnt_copied: u64,
    cnt_skipped: u64,
    errors: Vec<SpecCopyError>,
    warnings: Vec<String>,
}

impl ReportCopyBuilder {
    pub fn add_scanned(&mut self) {
        self.cnt_scanned += 1;
    }

    pub fn add_copied(&mut self) {
        self.cnt_copied += 1;
    }

    pub fn add_skipped(&mut self) {
        self.cnt_skipped += 1;
    }

    pub fn add_warning(&mut self, warning: String) {
        self.warnings.push(warning);
    }

    /// Add one path-scoped error.
    pub fn add_error(&mut self, path: PathBuf, exception: String) {
        self.errors.push(SpecCopyError { path, exception });
    }

    /// Finalize builder into immutable report.
    pub fn build(self) -> ReportCopy {
        ReportCopy {
            cnt_scanned: self.cnt_scanned,
            cnt_copied: self.cnt_copied,
            cnt_skipped: self.cnt_skipped,
            errors: self.errors,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{ReportCopy, ReportCopyBuilder};

    #[test]
    fn report_copy_format_lists_every_counter() {
        let report = ReportCopy {
            cnt_scanned: 8,
            cnt_copied: 3,
            cnt_skipped: 2,
            warnings: vec!["w".to_string()],
            errors: vec![],
        };

        let txt = report.format("[COPY]");
        assert_eq!(txt, "[COPY] scanned=8 copied=3 skipped=2 errors=0 warnings=1");
        assert_eq!(report.to_string(), txt);
    }

    #[test]
    fn builder_keeps_errors_in_insertion_order() {
        let mut builder = ReportCopyBuilder::default();
        builder.add_scanned();
        builder.add_error(PathBuf::from("a.pak"), "denied".to_string());
        builder.add_error(PathBuf::from("b.pak"), "locked".to_string());

        let report = builder.build();
        assert_eq!(report.cnt_scanned, 1);
        assert_eq!(report.error_count(), 2);
        assert_eq!(report.errors[0].path, PathBuf::from("a.pak"));
        assert_eq!(report.errors[1].exception, "locked");
    }
}
