//! Directory tree migration.
//!
//! Applies [`migrate_path`] to every file below a source directory,
//! mirroring the directory layout under a destination directory.

use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;
use std::time::Instant;

use tracing::debug;
use tracing::info;
use tracing::warn;
use walkdir::WalkDir;

use crate::MigrationConfig;
use crate::MigrationError;
use crate::Result;
use crate::api::migrate_path;
use crate::transform::Transformer;

/// Result of migrating one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// At least one entry or the file itself was changed.
    Changed,
    /// The file was copied without changes.
    Unchanged,
    /// Migration failed with this message.
    Failed(String),
}

/// Outcome for one file of a tree migration.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Source file.
    pub source: PathBuf,
    /// Destination file.
    pub dest: PathBuf,
    /// What happened.
    pub status: FileStatus,
}

/// Report of a directory tree migration.
#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// Per-file outcomes in walk order.
    pub files: Vec<FileOutcome>,

    /// Number of directories created under the destination.
    pub directories_created: usize,

    /// Duration of the operation.
    pub duration: Duration,
}

impl BatchReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files that changed.
    #[must_use]
    pub fn files_changed(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Changed))
    }

    /// Number of files copied unchanged.
    #[must_use]
    pub fn files_unchanged(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Unchanged))
    }

    /// Number of files that failed.
    #[must_use]
    pub fn files_failed(&self) -> usize {
        self.count(|status| matches!(status, FileStatus::Failed(_)))
    }

    /// Returns `true` if any file changed.
    #[must_use]
    pub fn any_changed(&self) -> bool {
        self.files_changed() > 0
    }

    fn count(&self, pred: impl Fn(&FileStatus) -> bool) -> usize {
        self.files.iter().filter(|f| pred(&f.status)).count()
    }
}

/// Migrates every file below `source_dir` into `dest_dir`.
///
/// Files are visited in sorted order. Archives are rewritten, other files go
/// through the transformer as single resources. Symbolic links are skipped.
///
/// With `continue_on_error` unset the first failure is returned. Otherwise
/// failures are logged, recorded as [`FileStatus::Failed`], and the walk
/// goes on.
///
/// # Errors
///
/// Returns an error if:
/// - `source_dir` is not a directory
/// - `dest_dir` lies inside `source_dir`
/// - The walk or directory creation fails
/// - A file fails and `continue_on_error` is unset
///
/// # Examples
///
/// ```no_run
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::batch::migrate_tree;
/// use jarshift_core::transform::PrefixRenamer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let renamer = PrefixRenamer::new().with_rule("javax", "jakarta");
/// let config = MigrationConfig::default().with_continue_on_error(true);
/// let report = migrate_tree("webapps", "webapps-jakarta", &renamer, &config)?;
/// println!("{} changed, {} failed", report.files_changed(), report.files_failed());
/// # Ok(())
/// # }
/// ```
pub fn migrate_tree<P, Q, T>(
    source_dir: P,
    dest_dir: Q,
    transformer: &T,
    config: &MigrationConfig,
) -> Result<BatchReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transformer + ?Sized,
{
    let source_dir = source_dir.as_ref();
    let dest_dir = dest_dir.as_ref();
    let start = Instant::now();

    config.validate()?;
    if !source_dir.is_dir() {
        return Err(MigrationError::InvalidConfig(format!(
            "not a directory: {}",
            source_dir.display()
        )));
    }
    ensure_outside(source_dir, dest_dir)?;

    let mut report = BatchReport::new();
    let walker = WalkDir::new(source_dir).sort_by_file_name();

    for entry in walker {
        let entry = entry.map_err(|e| {
            MigrationError::Io(std::io::Error::other(format!("walkdir error: {e}")))
        })?;
        let relative = entry
            .path()
            .strip_prefix(source_dir)
            .map_err(|e| MigrationError::Io(std::io::Error::other(e.to_string())))?;
        let target = dest_dir.join(relative);
        let file_type = entry.file_type();

        if file_type.is_dir() {
            if !target.is_dir() {
                fs::create_dir_all(&target)?;
                report.directories_created += 1;
            }
            continue;
        }
        if !file_type.is_file() {
            debug!(path = %entry.path().display(), "skipping non-regular file");
            continue;
        }

        let status = match migrate_path(entry.path(), &target, transformer, config) {
            Ok(file_report) if file_report.any_changed => FileStatus::Changed,
            Ok(_) => FileStatus::Unchanged,
            Err(err) if config.continue_on_error => {
                warn!(path = %entry.path().display(), error = %err, "migration failed, continuing");
                FileStatus::Failed(err.to_string())
            }
            Err(err) => return Err(err),
        };
        info!(path = %entry.path().display(), status = ?status, "migrated file");

        report.files.push(FileOutcome {
            source: entry.path().to_path_buf(),
            dest: target,
            status,
        });
    }

    report.duration = start.elapsed();
    Ok(report)
}

/// Rejects a destination inside the source tree, which the walk would
/// otherwise pick up again.
fn ensure_outside(source_dir: &Path, dest_dir: &Path) -> Result<()> {
    let source = source_dir.canonicalize()?;
    let dest = existing_ancestor(dest_dir)
        .and_then(|(base, rest)| base.canonicalize().ok().map(|b| b.join(rest)))
        .unwrap_or_else(|| dest_dir.to_path_buf());

    if dest.starts_with(&source) {
        return Err(MigrationError::InvalidConfig(format!(
            "destination {} is inside source {}",
            dest_dir.display(),
            source_dir.display()
        )));
    }
    Ok(())
}

/// Splits `path` into its deepest existing ancestor and the remainder.
fn existing_ancestor(path: &Path) -> Option<(PathBuf, PathBuf)> {
    path.ancestors()
        .find(|a| !a.as_os_str().is_empty() && a.exists())
        .and_then(|base| {
            path.strip_prefix(base)
                .ok()
                .map(|rest| (base.to_path_buf(), rest.to_path_buf()))
        })
}
