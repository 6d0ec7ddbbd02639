//! High-level public API for migrating and scanning archives on disk.

use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use crate::MigrationConfig;
use crate::MigrationError;
use crate::Resource;
use crate::Result;
use crate::RewriteReport;
use crate::ScanReport;
use crate::formats::ZipContainer;
use crate::io::read_entry_bytes;
use crate::pipeline::Collector;
use crate::pipeline::rewrite_container_with_progress;
use crate::pipeline::scan_container;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::transform::Transformer;
use crate::types::is_class_name;
use crate::types::is_container_name;

/// Rewrites the archive at `source` into a new archive at `dest`.
///
/// Every entry except zero-size directory markers is offered to
/// `transformer`; the output keeps the source entry order.
///
/// # Arguments
///
/// * `source` - Path to the JAR or WAR file to read
/// * `dest` - Path of the archive to create (truncated if it exists)
/// * `transformer` - Transformation applied to each entry
/// * `config` - Migration configuration
///
/// # Errors
///
/// Returns an error if:
/// - `source` and `dest` are the same file
/// - The source cannot be opened or is not a ZIP archive
/// - An entry's declared size is unknown or above the ceiling
/// - The transformer fails
/// - I/O operations fail
///
/// A failure leaves `dest` as far as it was written.
///
/// # Examples
///
/// ```no_run
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::rewrite_archive;
/// use jarshift_core::transform::PrefixRenamer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let renamer = PrefixRenamer::new().with_rule("javax.servlet", "jakarta.servlet");
/// let report = rewrite_archive("app.war", "app-jakarta.war", &renamer, &MigrationConfig::default())?;
/// if report.any_changed {
///     println!("{} entries changed", report.entries_changed);
/// }
/// # Ok(())
/// # }
/// ```
pub fn rewrite_archive<P, Q, T>(
    source: P,
    dest: Q,
    transformer: &T,
    config: &MigrationConfig,
) -> Result<RewriteReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transformer + ?Sized,
{
    rewrite_archive_with_progress(source, dest, transformer, config, &mut NoopProgress)
}

/// Rewrites an archive with progress reporting.
///
/// Same as [`rewrite_archive`], with `progress` called for every entry of
/// the outer archive.
///
/// # Errors
///
/// Same as [`rewrite_archive`].
pub fn rewrite_archive_with_progress<P, Q, T>(
    source: P,
    dest: Q,
    transformer: &T,
    config: &MigrationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RewriteReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transformer + ?Sized,
{
    let source = source.as_ref();
    let dest = dest.as_ref();

    config.validate()?;
    ensure_distinct(source, dest)?;

    let mut container = ZipContainer::open(source)?;
    let mut writer = BufWriter::new(File::create(dest)?);

    info!(source = %source.display(), dest = %dest.display(), "rewriting archive");
    let report =
        rewrite_container_with_progress(&mut container, &mut writer, transformer, config, progress)?;
    writer.flush()?;

    Ok(report)
}

/// Scans the archive at `path`, handing every class resource to `collector`.
///
/// A path ending in `.class` is read as a single resource. Anything else is
/// opened as a ZIP archive and walked recursively; with
/// [`NestedMode::OnDisk`](crate::config::NestedMode::OnDisk) nested archives
/// are extracted next to `path` and reused by later scans.
///
/// # Errors
///
/// Returns an error if the file cannot be read, an entry violates the size
/// limits, the collector fails, or a nested archive cannot be extracted.
///
/// # Examples
///
/// ```no_run
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::TransformError;
/// use jarshift_core::scan_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut names = Vec::new();
/// let mut collect = |_: &[u8], name: &str| -> Result<(), TransformError> {
///     names.push(name.to_string());
///     Ok(())
/// };
/// let report = scan_archive("app.war", &mut collect, &MigrationConfig::default())?;
/// println!("{} classes", report.resources_collected);
/// # Ok(())
/// # }
/// ```
pub fn scan_archive<P, K>(path: P, collector: &mut K, config: &MigrationConfig) -> Result<ScanReport>
where
    P: AsRef<Path>,
    K: Collector + ?Sized,
{
    let path = path.as_ref();
    config.validate()?;

    if is_class_name(&path.to_string_lossy()) {
        let start = Instant::now();
        let resource = read_resource_file(path, config)?;
        collector
            .collect(resource.data(), resource.name())
            .map_err(|source| MigrationError::Collect {
                entry: resource.name().to_string(),
                source,
            })?;

        return Ok(ScanReport {
            resources_collected: 1,
            bytes_read: resource.len() as u64,
            duration: start.elapsed(),
            ..ScanReport::default()
        });
    }

    let mut container = ZipContainer::open(path)?;
    info!(path = %path.display(), "scanning archive");
    scan_container(&mut container, path.parent(), collector, config)
}

/// Migrates a single file: archives are rewritten, anything else is passed
/// to `transformer` as one resource.
///
/// A non-archive file is written to `dest` with the transformer's bytes if
/// it changed, or copied as-is otherwise. The resource is named after the
/// file name of `source`.
///
/// # Errors
///
/// Returns an error if reading, transforming, or writing fails.
///
/// # Examples
///
/// ```no_run
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::migrate_path;
/// use jarshift_core::transform::PrefixRenamer;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let renamer = PrefixRenamer::new().with_rule("javax", "jakarta");
/// let report = migrate_path("web.xml", "out/web.xml", &renamer, &MigrationConfig::default())?;
/// println!("changed: {}", report.any_changed);
/// # Ok(())
/// # }
/// ```
pub fn migrate_path<P, Q, T>(
    source: P,
    dest: Q,
    transformer: &T,
    config: &MigrationConfig,
) -> Result<RewriteReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transformer + ?Sized,
{
    migrate_path_with_progress(source, dest, transformer, config, &mut NoopProgress)
}

/// Migrates a single file with progress reporting for archives.
///
/// # Errors
///
/// Same as [`migrate_path`].
pub fn migrate_path_with_progress<P, Q, T>(
    source: P,
    dest: Q,
    transformer: &T,
    config: &MigrationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RewriteReport>
where
    P: AsRef<Path>,
    Q: AsRef<Path>,
    T: Transformer + ?Sized,
{
    let source = source.as_ref();
    let dest = dest.as_ref();

    if is_container_name(&source.to_string_lossy()) {
        return rewrite_archive_with_progress(source, dest, transformer, config, progress);
    }

    config.validate()?;
    ensure_distinct(source, dest)?;

    let start = Instant::now();
    let input = read_resource_file(source, config)?;
    let mut report = RewriteReport::new();
    report.bytes_read = input.len() as u64;

    let output = match transformer.transform(&input) {
        Ok(Some(replacement)) => {
            report.any_changed = true;
            report.entries_changed = 1;
            if replacement.name() != input.name() {
                report.entries_renamed = 1;
            }
            replacement
        }
        Ok(None) => input,
        Err(source) => {
            return Err(MigrationError::Transform {
                entry: input.name().to_string(),
                source,
            });
        }
    };

    std::fs::write(dest, output.data())?;
    debug!(dest = %dest.display(), changed = report.any_changed, "wrote single resource");

    report.entries_written = 1;
    report.bytes_written = output.len() as u64;
    report.duration = start.elapsed();
    Ok(report)
}

/// Reads a standalone file through the bounded reader.
fn read_resource_file(path: &Path, config: &MigrationConfig) -> Result<Resource> {
    let name = path
        .file_name()
        .map_or_else(|| path.to_string_lossy(), |n| n.to_string_lossy())
        .into_owned();

    let mut file = File::open(path)?;
    let declared_size = i64::try_from(file.metadata()?.len()).unwrap_or(i64::MAX);
    let data = read_entry_bytes(&mut file, &name, declared_size, config.max_entry_size)?;

    Ok(Resource::new(name, data))
}

/// Refuses to write over the file being read.
fn ensure_distinct(source: &Path, dest: &Path) -> Result<()> {
    if let (Ok(src), Ok(dst)) = (source.canonicalize(), dest.canonicalize())
        && src == dst
    {
        return Err(MigrationError::InvalidConfig(format!(
            "source and destination are the same file: {}",
            source.display()
        )));
    }
    Ok(())
}
