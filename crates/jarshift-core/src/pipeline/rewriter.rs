//! Transform-and-rebuild walk over a container.
//!
//! Every non-directory entry is read in full, offered to the
//! [`Transformer`], and written to a fresh ZIP in source order. Entries with
//! a declared size of zero are dropped. All output entries of one run share
//! a single fresh timestamp.
//!
//! Declared sizes are checked for the whole container before the first byte
//! is written. Any later failure leaves the output as written so far;
//! cleaning it up is the caller's decision.

use std::io::Cursor;
use std::io::Seek;
use std::io::Write;
use std::time::Instant;

use tracing::debug;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::MigrationConfig;
use crate::MigrationError;
use crate::Resource;
use crate::Result;
use crate::formats::ContainerReader;
use crate::formats::zip::current_timestamp;
use crate::formats::zip::entry_options;
use crate::formats::zip::sized_options;
use crate::formats::zip::zip_error;
use crate::io::check_declared_size;
use crate::io::read_entry_bytes;
use crate::report::NoopProgress;
use crate::report::ProgressCallback;
use crate::report::RewriteReport;
use crate::transform::Transformer;
use crate::types::EntryClass;
use crate::types::classify;

use super::ChangeTracker;
use super::entry_location;
use super::open_nested;

/// Rewrites `source` into `dest`.
///
/// `dest` receives a complete ZIP when this returns `Ok`. Pass `&mut` to a
/// writer to keep ownership of it.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, an entry violates the
/// size limits, the transformer fails, or reading or writing fails.
///
/// # Examples
///
/// ```
/// use std::io::Cursor;
///
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::formats::ZipContainer;
/// use jarshift_core::pipeline::rewrite_container;
/// use jarshift_core::test_utils::create_test_zip;
/// use jarshift_core::transform::IdentityTransformer;
///
/// let input = create_test_zip(vec![("a/B.class", &b"\xCA\xFE"[..])]);
/// let mut source = ZipContainer::new(Cursor::new(input)).unwrap();
/// let mut output = Cursor::new(Vec::new());
///
/// let report = rewrite_container(
///     &mut source,
///     &mut output,
///     &IdentityTransformer,
///     &MigrationConfig::default(),
/// )
/// .unwrap();
/// assert!(!report.any_changed);
/// assert_eq!(report.entries_written, 1);
/// ```
pub fn rewrite_container<C, W, T>(
    source: &mut C,
    dest: W,
    transformer: &T,
    config: &MigrationConfig,
) -> Result<RewriteReport>
where
    C: ContainerReader + ?Sized,
    W: Write + Seek,
    T: Transformer + ?Sized,
{
    rewrite_container_with_progress(source, dest, transformer, config, &mut NoopProgress)
}

/// Rewrites `source` into `dest`, reporting progress for each entry of the
/// outer container.
///
/// # Errors
///
/// Same as [`rewrite_container`].
pub fn rewrite_container_with_progress<C, W, T>(
    source: &mut C,
    dest: W,
    transformer: &T,
    config: &MigrationConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<RewriteReport>
where
    C: ContainerReader + ?Sized,
    W: Write + Seek,
    T: Transformer + ?Sized,
{
    config.validate()?;

    let rewriter = Rewriter {
        transformer,
        config,
        options: entry_options(config, current_timestamp()),
    };
    rewriter.preflight(source, "", 0)?;
    let report = rewriter.rewrite(source, dest, "", 0, progress)?;
    progress.on_complete();

    Ok(report)
}

struct Rewriter<'a, T: ?Sized> {
    transformer: &'a T,
    config: &'a MigrationConfig,
    options: SimpleFileOptions,
}

impl<T: Transformer + ?Sized> Rewriter<'_, T> {
    fn rewrite<C, W>(
        &self,
        source: &mut C,
        dest: W,
        prefix: &str,
        depth: usize,
        progress: &mut dyn ProgressCallback,
    ) -> Result<RewriteReport>
    where
        C: ContainerReader + ?Sized,
        W: Write + Seek,
    {
        let start = Instant::now();

        let mut report = RewriteReport::new();
        let mut tracker = ChangeTracker::new();
        let mut zip = ZipWriter::new(dest);

        let total = source.entry_count();
        for index in 0..total {
            let (meta, mut reader) = source.entry(index)?;
            let location = entry_location(prefix, &meta.name);
            progress.on_entry_start(&meta.name, total, index + 1);

            let class = classify(&meta.name, meta.declared_size);
            if class.is_directory() {
                debug!(entry = %location, "skipping zero-size entry");
                report.directories_skipped += 1;
                progress.on_entry_complete(&meta.name, false);
                continue;
            }

            let data = read_entry_bytes(
                &mut reader,
                &location,
                meta.declared_size,
                self.config.max_entry_size,
            )?;
            drop(reader);
            report.bytes_read += data.len() as u64;

            let original_name = meta.name;
            let input = Resource::new(original_name.as_str(), data);
            let (output, changed) = self.process(input, class, &location, depth, &mut report)?;

            tracker.record(changed);
            if changed {
                report.entries_changed += 1;
                if output.name() == original_name {
                    debug!(entry = %location, "rewrote entry");
                } else {
                    report.entries_renamed += 1;
                    debug!(entry = %location, renamed = output.name(), "renamed entry");
                }
            }

            zip.start_file(output.name(), sized_options(self.options, output.len()))
                .map_err(|e| zip_error("failed to start output entry", e))?;
            zip.write_all(output.data())?;

            report.entries_written += 1;
            report.bytes_written += output.len() as u64;
            progress.on_entry_complete(&original_name, changed);
        }

        zip.finish()
            .map_err(|e| zip_error("failed to finish output archive", e))?;

        report.any_changed = tracker.any_changed();
        report.duration = start.elapsed();
        Ok(report)
    }

    /// Checks every declared size before the output is touched, including
    /// the entries of nested archives that will be rewritten.
    ///
    /// The ZIP writer finalizes on drop, so a size violation found halfway
    /// through would still leave a readable, incomplete archive behind.
    fn preflight<C>(&self, source: &mut C, prefix: &str, depth: usize) -> Result<()>
    where
        C: ContainerReader + ?Sized,
    {
        for index in 0..source.entry_count() {
            let (meta, mut reader) = source.entry(index)?;
            if meta.declared_size == 0 {
                continue;
            }

            let location = entry_location(prefix, &meta.name);
            check_declared_size(&location, meta.declared_size, self.config.max_entry_size)?;
            if !self.descends_into(&meta.name, meta.declared_size) {
                continue;
            }

            let nested_depth = depth + 1;
            if nested_depth > self.config.max_nesting_depth {
                return Err(MigrationError::NestingTooDeep {
                    entry: location,
                    max_depth: self.config.max_nesting_depth,
                });
            }

            let data = read_entry_bytes(
                &mut reader,
                &location,
                meta.declared_size,
                self.config.max_entry_size,
            )?;
            drop(reader);

            let mut nested = open_nested(&data, &location)?;
            self.preflight(&mut nested, &format!("{location}!/"), nested_depth)?;
        }
        Ok(())
    }

    /// Returns `true` if the entry is a nested archive that `process` will
    /// rewrite rather than hand to the transformer.
    fn descends_into(&self, name: &str, declared_size: i64) -> bool {
        self.config.rewrite_nested
            && classify(name, declared_size).is_nested_archive()
            && !self.config.is_excluded(name)
    }

    /// Decides the output resource for one entry.
    fn process(
        &self,
        input: Resource,
        class: EntryClass,
        location: &str,
        depth: usize,
        report: &mut RewriteReport,
    ) -> Result<(Resource, bool)> {
        if self.config.is_excluded(input.name()) {
            debug!(entry = %location, "copying excluded entry");
            report.entries_excluded += 1;
            return Ok((input, false));
        }

        if class.is_nested_archive() && self.config.rewrite_nested {
            return self.rewrite_nested(input, location, depth + 1, report);
        }

        match self.transformer.transform(&input) {
            Ok(Some(replacement)) => Ok((replacement, true)),
            Ok(None) => Ok((input, false)),
            Err(source) => Err(MigrationError::Transform {
                entry: location.to_string(),
                source,
            }),
        }
    }

    /// Rewrites a nested archive in memory.
    ///
    /// The original bytes are kept when nothing inside changed, so an
    /// untouched nested archive is copied verbatim.
    fn rewrite_nested(
        &self,
        input: Resource,
        location: &str,
        depth: usize,
        report: &mut RewriteReport,
    ) -> Result<(Resource, bool)> {
        if depth > self.config.max_nesting_depth {
            return Err(MigrationError::NestingTooDeep {
                entry: location.to_string(),
                max_depth: self.config.max_nesting_depth,
            });
        }

        let mut output = Cursor::new(Vec::new());
        let nested = {
            let mut container = open_nested(input.data(), location)?;
            let prefix = format!("{location}!/");
            self.rewrite(&mut container, &mut output, &prefix, depth, &mut NoopProgress)?
        };
        report.absorb_nested(&nested);

        if nested.any_changed {
            debug!(entry = %location, changed = nested.entries_changed, "rewrote nested archive");
            Ok((Resource::new(input.name(), output.into_inner()), true))
        } else {
            Ok((input, false))
        }
    }
}
