//! Collection walk over a container.
//!
//! Class files are read and handed to a [`Collector`]. Nested archives are
//! recursed into, either from a file extracted next to the outer archive or
//! straight from memory, depending on [`NestedMode`]. Directories are
//! skipped, everything else is noted and ignored.

use std::path::Path;
use std::time::Instant;

use tracing::debug;
use tracing::info;

use crate::MigrationConfig;
use crate::MigrationError;
use crate::Result;
use crate::TransformError;
use crate::config::NestedMode;
use crate::formats::ContainerReader;
use crate::formats::ZipContainer;
use crate::io::read_entry_bytes;
use crate::report::ScanReport;
use crate::types::EntryClass;
use crate::types::classify;

use super::entry_location;
use super::extract::Extraction;
use super::extract::extraction_target;
use super::extract::materialize;
use super::in_nested;
use super::open_nested;

/// Receives the class resources found by a scan.
///
/// Any error aborts the scan. Closures taking `(&[u8], &str)` implement this
/// trait.
pub trait Collector {
    /// Collects the bytes of one class resource named `name`.
    ///
    /// # Errors
    ///
    /// Returns an error to abort the scan.
    fn collect(&mut self, data: &[u8], name: &str) -> std::result::Result<(), TransformError>;
}

impl<F> Collector for F
where
    F: FnMut(&[u8], &str) -> std::result::Result<(), TransformError>,
{
    fn collect(&mut self, data: &[u8], name: &str) -> std::result::Result<(), TransformError> {
        self(data, name)
    }
}

/// Scans `source`, handing each class resource to `collector`.
///
/// In [`NestedMode::OnDisk`] nested archives are extracted below
/// `extract_dir`, normally the directory holding the outer archive. Without
/// an `extract_dir` they are opened in memory regardless of the mode.
///
/// # Errors
///
/// Returns an error if an entry violates the size limits, the collector
/// fails, a nested archive cannot be extracted or opened, or nesting goes
/// deeper than configured.
pub fn scan_container<C, K>(
    source: &mut C,
    extract_dir: Option<&Path>,
    collector: &mut K,
    config: &MigrationConfig,
) -> Result<ScanReport>
where
    C: ContainerReader + ?Sized,
    K: Collector + ?Sized,
{
    config.validate()?;

    let start = Instant::now();
    let mut scanner = Scanner {
        collector,
        config,
        report: ScanReport::new(),
    };
    scanner.scan(source, extract_dir, "", 0)?;

    let mut report = scanner.report;
    report.duration = start.elapsed();
    Ok(report)
}

struct Scanner<'a, K: ?Sized> {
    collector: &'a mut K,
    config: &'a MigrationConfig,
    report: ScanReport,
}

impl<K: Collector + ?Sized> Scanner<'_, K> {
    fn scan<C>(
        &mut self,
        source: &mut C,
        extract_dir: Option<&Path>,
        prefix: &str,
        depth: usize,
    ) -> Result<()>
    where
        C: ContainerReader + ?Sized,
    {
        for index in 0..source.entry_count() {
            let (meta, mut reader) = source.entry(index)?;
            let location = entry_location(prefix, &meta.name);

            let class = classify(&meta.name, meta.declared_size);
            match class {
                EntryClass::Directory => {
                    self.report.directories_skipped += 1;
                    continue;
                }
                EntryClass::Ignored => {
                    info!(entry = %location, "ignoring entry that is neither a class nor an archive");
                    self.report.entries_ignored += 1;
                    continue;
                }
                EntryClass::TransformableLeaf | EntryClass::NestedArchive => {}
            }

            if self.config.is_excluded(&meta.name) {
                debug!(entry = %location, "skipping excluded entry");
                self.report.entries_ignored += 1;
                continue;
            }

            let data = read_entry_bytes(
                &mut reader,
                &location,
                meta.declared_size,
                self.config.max_entry_size,
            )?;
            drop(reader);
            self.report.bytes_read += data.len() as u64;

            if class.is_leaf() {
                self.collector
                    .collect(&data, &meta.name)
                    .map_err(|source| MigrationError::Collect {
                        entry: location.clone(),
                        source,
                    })?;
                self.report.resources_collected += 1;
                debug!(entry = %location, bytes = data.len(), "collected class");
            } else {
                self.scan_nested(&data, &meta.name, &location, extract_dir, depth + 1)?;
            }
        }

        Ok(())
    }

    fn scan_nested(
        &mut self,
        data: &[u8],
        name: &str,
        location: &str,
        extract_dir: Option<&Path>,
        depth: usize,
    ) -> Result<()> {
        if depth > self.config.max_nesting_depth {
            return Err(MigrationError::NestingTooDeep {
                entry: location.to_string(),
                max_depth: self.config.max_nesting_depth,
            });
        }

        self.report.nested_archives += 1;
        let prefix = format!("{location}!/");

        match (self.config.nested_mode, extract_dir) {
            (NestedMode::OnDisk, Some(dir)) => {
                let target = extraction_target(dir, name)?;
                match materialize(&target, data)? {
                    Extraction::Created => {
                        info!(entry = %location, path = %target.display(), "extracted nested archive");
                        self.report.nested_extracted += 1;
                    }
                    Extraction::Reused => {
                        info!(entry = %location, path = %target.display(), "reusing extracted nested archive");
                        self.report.nested_reused += 1;
                    }
                }

                let mut container =
                    ZipContainer::open(&target).map_err(|e| in_nested(e, location))?;
                self.scan(&mut container, target.parent(), &prefix, depth)
            }
            _ => {
                let mut container = open_nested(data, location)?;
                self.scan(&mut container, None, &prefix, depth)
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::test_utils::MemoryContainer;
    use crate::test_utils::ZipTestBuilder;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn in_memory() -> MigrationConfig {
        MigrationConfig::default().with_nested_mode(NestedMode::InMemory)
    }

    fn scan_bytes(
        input: Vec<u8>,
        extract_dir: Option<&Path>,
        config: &MigrationConfig,
    ) -> Result<(ScanReport, Vec<(String, Vec<u8>)>)> {
        let mut source = ZipContainer::new(Cursor::new(input))?;
        let mut seen = Vec::new();
        let mut collect = |data: &[u8], name: &str| -> std::result::Result<(), TransformError> {
            seen.push((name.to_string(), data.to_vec()));
            Ok(())
        };
        let report = scan_container(&mut source, extract_dir, &mut collect, config)?;
        Ok((report, seen))
    }

    #[test]
    fn test_collects_only_classes() {
        let input = ZipTestBuilder::new()
            .add_directory("com/")
            .add_file("com/A.class", b"A")
            .add_file("readme.txt", b"text")
            .add_file("com/B.class", b"B")
            .build();

        let (report, seen) = scan_bytes(input, None, &in_memory()).unwrap();
        assert_eq!(
            seen,
            vec![
                ("com/A.class".to_string(), b"A".to_vec()),
                ("com/B.class".to_string(), b"B".to_vec()),
            ]
        );
        assert_eq!(report.resources_collected, 2);
        assert_eq!(report.entries_ignored, 1);
        assert_eq!(report.directories_skipped, 1);
    }

    #[test]
    fn test_zero_size_class_never_collected() {
        let mut source = MemoryContainer::new()
            .with_entry("Empty.class", b"")
            .with_entry("Full.class", b"x");
        let mut names = Vec::new();
        let mut collect = |_: &[u8], name: &str| -> std::result::Result<(), TransformError> {
            names.push(name.to_string());
            Ok(())
        };

        scan_container(&mut source, None, &mut collect, &in_memory()).unwrap();
        assert_eq!(names, vec!["Full.class"]);
    }

    #[test]
    fn test_in_memory_nested_scan_writes_nothing() {
        let temp = TempDir::new().unwrap();
        let inner = ZipTestBuilder::new().add_file("com/Foo.class", b"foo").build();
        let outer = ZipTestBuilder::new().add_file("lib/inner.jar", &inner).build();

        let (report, seen) = scan_bytes(outer, Some(temp.path()), &in_memory()).unwrap();
        assert_eq!(seen, vec![("com/Foo.class".to_string(), b"foo".to_vec())]);
        assert_eq!(report.nested_archives, 1);
        assert_eq!(report.nested_extracted, 0);
        assert!(!temp.path().join("lib").exists());
    }

    #[test]
    fn test_on_disk_nested_scan_extracts_once() {
        let temp = TempDir::new().unwrap();
        let inner = ZipTestBuilder::new().add_file("com/Foo.class", b"foo").build();
        let outer = ZipTestBuilder::new().add_file("lib/inner.jar", &inner).build();
        let config = MigrationConfig::default();

        let (first, seen) = scan_bytes(outer.clone(), Some(temp.path()), &config).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(first.nested_extracted, 1);
        assert_eq!(first.nested_reused, 0);
        assert_eq!(std::fs::read(temp.path().join("lib/inner.jar")).unwrap(), inner);

        let (second, seen) = scan_bytes(outer, Some(temp.path()), &config).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(second.nested_extracted, 0);
        assert_eq!(second.nested_reused, 1);
    }

    #[test]
    fn test_doubly_nested_extracts_relative_to_parent() {
        let temp = TempDir::new().unwrap();
        let deepest = ZipTestBuilder::new().add_file("Deep.class", b"d").build();
        let middle = ZipTestBuilder::new().add_file("inner/deep.jar", &deepest).build();
        let outer = ZipTestBuilder::new().add_file("lib/middle.jar", &middle).build();

        let (report, seen) =
            scan_bytes(outer, Some(temp.path()), &MigrationConfig::default()).unwrap();
        assert_eq!(seen[0].0, "Deep.class");
        assert_eq!(report.nested_archives, 2);
        assert!(temp.path().join("lib/middle.jar").is_file());
        assert!(temp.path().join("lib/inner/deep.jar").is_file());
    }

    #[test]
    fn test_collector_failure_names_nested_entry() {
        let inner = ZipTestBuilder::new().add_file("com/Foo.class", b"foo").build();
        let outer = ZipTestBuilder::new().add_file("lib/inner.jar", &inner).build();
        let mut source = ZipContainer::new(Cursor::new(outer)).unwrap();
        let mut failing =
            |_: &[u8], _: &str| -> std::result::Result<(), TransformError> { Err(TransformError::new("full")) };

        let err = scan_container(&mut source, None, &mut failing, &in_memory()).unwrap_err();
        assert!(matches!(err, MigrationError::Collect { .. }));
        assert_eq!(err.entry(), Some("lib/inner.jar!/com/Foo.class"));
    }

    #[test]
    fn test_unknown_size_aborts_scan() {
        let mut source = MemoryContainer::new().with_declared_size("A.class", b"abc", -1);
        let mut collect = |_: &[u8], _: &str| -> std::result::Result<(), TransformError> { Ok(()) };

        let err = scan_container(&mut source, None, &mut collect, &in_memory()).unwrap_err();
        assert!(matches!(err, MigrationError::SizeUnknown { size: -1, .. }));
    }

    #[test]
    fn test_truncated_entry_aborts_scan() {
        let mut source = MemoryContainer::new().with_declared_size("A.class", b"abc", 10);
        let mut collect = |_: &[u8], _: &str| -> std::result::Result<(), TransformError> { Ok(()) };

        let err = scan_container(&mut source, None, &mut collect, &in_memory()).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::TruncatedRead { expected: 10, actual: 3, .. }
        ));
    }

    #[test]
    fn test_excluded_classes_skipped() {
        let input = ZipTestBuilder::new()
            .add_file("module-info.class", b"m")
            .add_file("A.class", b"a")
            .build();
        let config = in_memory().with_exclude_patterns(vec!["module-info.class".into()]);

        let (report, seen) = scan_bytes(input, None, &config).unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(report.entries_ignored, 1);
    }

    #[test]
    fn test_nesting_depth_limit() {
        let inner = ZipTestBuilder::new().add_file("A.class", b"a").build();
        let outer = ZipTestBuilder::new().add_file("lib/inner.jar", &inner).build();
        let config = in_memory().with_max_nesting_depth(0);

        let err = scan_bytes(outer, None, &config).unwrap_err();
        assert!(matches!(err, MigrationError::NestingTooDeep { max_depth: 0, .. }));
    }

    #[test]
    fn test_invalid_nested_archive() {
        let outer = ZipTestBuilder::new()
            .add_file("lib/broken.jar", b"not a zip at all")
            .build();

        let err = scan_bytes(outer, None, &in_memory()).unwrap_err();
        assert!(matches!(err, MigrationError::InvalidArchive(ref msg) if msg.contains("lib/broken.jar")));
    }
}
