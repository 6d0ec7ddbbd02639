//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use super::formatter::ScannedResource;
use anyhow::Result;
use jarshift_core::BatchReport;
use jarshift_core::RewriteReport;
use jarshift_core::ScanReport;
use jarshift_core::batch::FileStatus;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct MigrationOutput {
    source: String,
    dest: String,
    changed: bool,
    entries_written: usize,
    entries_changed: usize,
    entries_renamed: usize,
    entries_excluded: usize,
    directories_skipped: usize,
    nested_archives_rewritten: usize,
    bytes_read: u64,
    bytes_written: u64,
    duration_ms: u128,
}

impl MigrationOutput {
    fn new(source: &Path, dest: &Path, report: &RewriteReport) -> Self {
        Self {
            source: source.display().to_string(),
            dest: dest.display().to_string(),
            changed: report.any_changed,
            entries_written: report.entries_written,
            entries_changed: report.entries_changed,
            entries_renamed: report.entries_renamed,
            entries_excluded: report.entries_excluded,
            directories_skipped: report.directories_skipped,
            nested_archives_rewritten: report.nested_archives_rewritten,
            bytes_read: report.bytes_read,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        }
    }
}

impl OutputFormatter for JsonFormatter {
    fn format_migration_result(
        &self,
        source: &Path,
        dest: &Path,
        report: &RewriteReport,
    ) -> Result<()> {
        let output = JsonOutput::success("migrate", MigrationOutput::new(source, dest, report));
        Self::output(&output)
    }

    fn format_batch_result(&self, source: &Path, dest: &Path, report: &BatchReport) -> Result<()> {
        #[derive(Serialize)]
        struct FileOutput {
            source: String,
            dest: String,
            status: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }

        #[derive(Serialize)]
        struct BatchOutput {
            source: String,
            dest: String,
            files_changed: usize,
            files_unchanged: usize,
            files_failed: usize,
            directories_created: usize,
            files: Vec<FileOutput>,
            duration_ms: u128,
        }

        let files = report
            .files
            .iter()
            .map(|outcome| {
                let (status, error) = match &outcome.status {
                    FileStatus::Changed => ("changed", None),
                    FileStatus::Unchanged => ("unchanged", None),
                    FileStatus::Failed(message) => ("failed", Some(message.clone())),
                };
                FileOutput {
                    source: outcome.source.display().to_string(),
                    dest: outcome.dest.display().to_string(),
                    status,
                    error,
                }
            })
            .collect();

        let data = BatchOutput {
            source: source.display().to_string(),
            dest: dest.display().to_string(),
            files_changed: report.files_changed(),
            files_unchanged: report.files_unchanged(),
            files_failed: report.files_failed(),
            directories_created: report.directories_created,
            files,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("migrate-tree", data))
    }

    fn format_scan_result(
        &self,
        archive: &Path,
        resources: &[ScannedResource],
        report: &ScanReport,
        _human_readable: bool,
    ) -> Result<()> {
        #[derive(Serialize)]
        struct ScanOutput<'a> {
            archive: String,
            resources: &'a [ScannedResource],
            resources_collected: usize,
            nested_archives: usize,
            nested_extracted: usize,
            nested_reused: usize,
            entries_ignored: usize,
            bytes_read: u64,
            duration_ms: u128,
        }

        let data = ScanOutput {
            archive: archive.display().to_string(),
            resources,
            resources_collected: report.resources_collected,
            nested_archives: report.nested_archives,
            nested_extracted: report.nested_extracted,
            nested_reused: report.nested_reused,
            entries_ignored: report.entries_ignored,
            bytes_read: report.bytes_read,
            duration_ms: report.duration.as_millis(),
        };

        Self::output(&JsonOutput::success("scan", data))
    }

    fn format_warning(&self, message: &str) {
        #[derive(Serialize)]
        struct Warning<'a> {
            warning: &'a str,
        }

        if let Ok(json) = serde_json::to_string(&Warning { warning: message }) {
            let _ = writeln!(io::stderr(), "{json}");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_migration_output_fields() {
        let mut report = RewriteReport::new();
        report.any_changed = true;
        report.entries_written = 3;
        report.entries_renamed = 1;
        report.duration = Duration::from_millis(42);

        let output = JsonOutput::success(
            "migrate",
            MigrationOutput::new(Path::new("in.jar"), Path::new("out.jar"), &report),
        );
        let value = serde_json::to_value(&output).unwrap();

        assert_eq!(value["operation"], "migrate");
        assert_eq!(value["status"], "success");
        assert_eq!(value["data"]["changed"], true);
        assert_eq!(value["data"]["entries_written"], 3);
        assert_eq!(value["data"]["entries_renamed"], 1);
        assert_eq!(value["data"]["duration_ms"], 42);
    }
}
