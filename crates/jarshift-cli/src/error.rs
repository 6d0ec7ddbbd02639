//! Error conversion utilities for CLI.
//!
//! Converts jarshift-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use jarshift_core::MigrationError;
use std::path::Path;

/// Converts `MigrationError` to user-friendly anyhow error with context
pub fn convert_migration_error(err: MigrationError, archive: &Path) -> anyhow::Error {
    match err {
        MigrationError::SizeUnknown { entry, size } => {
            anyhow!(
                "Entry '{entry}' in '{}' does not declare its size ({size})\n\
                 HINT: The archive may have been written by a streaming tool. Repack it and retry.",
                archive.display()
            )
        }
        MigrationError::SizeTooLarge { entry, size, max } => {
            anyhow!(
                "Entry '{entry}' in '{}' is too large: {size} bytes (limit {max} bytes)\n\
                 HINT: Use --max-entry-size to raise the limit.",
                archive.display()
            )
        }
        MigrationError::TruncatedRead {
            entry,
            expected,
            actual,
        } => {
            anyhow!(
                "Entry '{entry}' in '{}' is truncated: expected {expected} bytes, got {actual}\n\
                 HINT: The archive may be corrupted or was modified while being read.",
                archive.display()
            )
        }
        MigrationError::NestedExtraction { path, source } => {
            anyhow!(
                "Failed to extract nested archive of '{}' to '{}': {source}\n\
                 HINT: Check write permissions next to the archive, or use --in-memory.",
                archive.display(),
                path.display()
            )
        }
        MigrationError::NestingTooDeep { entry, max_depth } => {
            anyhow!(
                "Nested archive '{entry}' in '{}' is nested deeper than {max_depth} levels\n\
                 HINT: The archive may contain itself.",
                archive.display()
            )
        }
        MigrationError::Transform { entry, source } => {
            anyhow!(
                "Failed to transform '{entry}' in '{}': {source}",
                archive.display()
            )
        }
        MigrationError::Collect { entry, source } => {
            anyhow!(
                "Failed to collect '{entry}' in '{}': {source}",
                archive.display()
            )
        }
        MigrationError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {io_err}",
                archive.display()
            )
        }
        MigrationError::InvalidArchive(reason) => {
            anyhow!(
                "Invalid archive '{}': {reason}\n\
                 HINT: The archive may be corrupted or is not a JAR/WAR file.",
                archive.display()
            )
        }
        MigrationError::InvalidConfig(reason) => {
            anyhow!("Invalid options for '{}': {reason}", archive.display())
        }
    }
}

/// Adds context to a core result about the archive being processed
pub fn add_archive_context<T>(
    result: Result<T, MigrationError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_migration_error(e, archive))
}
