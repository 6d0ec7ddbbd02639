//! Output formatter trait for CLI results.

use anyhow::Result;
use jarshift_core::BatchReport;
use jarshift_core::RewriteReport;
use jarshift_core::ScanReport;
use serde::Serialize;
use std::path::Path;

/// Common output formatter trait
pub trait OutputFormatter {
    /// Format the result of migrating a single file
    fn format_migration_result(
        &self,
        source: &Path,
        dest: &Path,
        report: &RewriteReport,
    ) -> Result<()>;

    /// Format the result of migrating a directory tree
    fn format_batch_result(&self, source: &Path, dest: &Path, report: &BatchReport) -> Result<()>;

    /// Format the resources collected by a scan
    fn format_scan_result(
        &self,
        archive: &Path,
        resources: &[ScannedResource],
        report: &ScanReport,
        human_readable: bool,
    ) -> Result<()>;

    /// Format warning message
    fn format_warning(&self, message: &str);
}

/// A class file seen by the scan command.
#[derive(Debug, Clone, Serialize)]
pub struct ScannedResource {
    /// Location inside the archive, nested archives joined with `!/`
    pub name: String,
    /// Size in bytes
    pub size: u64,
}

/// Generic JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput<T> {
    pub operation: String,
    pub status: Status,
    pub data: T,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
}

impl<T: Serialize> JsonOutput<T> {
    pub fn success(operation: impl Into<String>, data: T) -> Self {
        Self {
            operation: operation.into(),
            status: Status::Success,
            data,
        }
    }
}
