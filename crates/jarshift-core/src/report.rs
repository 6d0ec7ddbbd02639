//! Migration operation reporting.

use std::time::Duration;

/// Report of an archive rewrite.
///
/// `any_changed` is the caller-facing signal: `true` if at least one entry,
/// in the archive or any archive nested inside it that was rewritten, came
/// back from the transformer as a replacement.
#[derive(Debug, Clone, Default)]
pub struct RewriteReport {
    /// Whether any entry was changed by the transformer.
    pub any_changed: bool,

    /// Number of entries written to the output archive.
    pub entries_written: usize,

    /// Number of entries replaced by the transformer.
    pub entries_changed: usize,

    /// Number of replaced entries that also received a new name.
    pub entries_renamed: usize,

    /// Number of zero-size entries dropped.
    pub directories_skipped: usize,

    /// Number of entries copied without consulting the transformer because
    /// they matched an exclude pattern.
    pub entries_excluded: usize,

    /// Number of nested archives rewritten recursively.
    pub nested_archives_rewritten: usize,

    /// Total entry bytes read from the source.
    pub bytes_read: u64,

    /// Total entry bytes written to the output (uncompressed).
    pub bytes_written: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl RewriteReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds the counters of a nested archive's rewrite into this report.
    ///
    /// Byte counters and the change flag stay with the outer entry, which is
    /// accounted for separately.
    pub fn absorb_nested(&mut self, nested: &Self) {
        self.entries_changed += nested.entries_changed;
        self.entries_renamed += nested.entries_renamed;
        self.directories_skipped += nested.directories_skipped;
        self.entries_excluded += nested.entries_excluded;
        self.nested_archives_rewritten += nested.nested_archives_rewritten + 1;
    }
}

/// Report of an archive scan.
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// Number of class resources handed to the collector.
    pub resources_collected: usize,

    /// Number of nested archives recursed into.
    pub nested_archives: usize,

    /// Number of nested archives written to disk by this scan.
    pub nested_extracted: usize,

    /// Number of nested archives found already extracted and reused.
    pub nested_reused: usize,

    /// Number of entries neither collected nor recursed into.
    pub entries_ignored: usize,

    /// Number of zero-size entries skipped.
    pub directories_skipped: usize,

    /// Total bytes read for collected resources and nested archives.
    pub bytes_read: u64,

    /// Duration of the operation.
    pub duration: Duration,
}

impl ScanReport {
    /// Creates a new empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// Callback trait for progress reporting during a rewrite.
///
/// The trait requires `Send` to allow use in multi-threaded contexts.
///
/// # Examples
///
/// ```
/// use jarshift_core::ProgressCallback;
///
/// struct Printer;
///
/// impl ProgressCallback for Printer {
///     fn on_entry_start(&mut self, name: &str, total: usize, current: usize) {
///         println!("[{current}/{total}] {name}");
///     }
///
///     fn on_entry_complete(&mut self, name: &str, changed: bool) {
///         if changed {
///             println!("  changed: {name}");
///         }
///     }
///
///     fn on_complete(&mut self) {}
/// }
/// ```
pub trait ProgressCallback: Send {
    /// Called before an entry of the outer archive is processed.
    ///
    /// # Arguments
    ///
    /// * `name` - Entry name
    /// * `total` - Number of entries in the archive
    /// * `current` - Current entry number (1-indexed)
    fn on_entry_start(&mut self, name: &str, total: usize, current: usize);

    /// Called after an entry has been written or skipped.
    fn on_entry_complete(&mut self, name: &str, changed: bool);

    /// Called once when the output archive is complete.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _name: &str, _total: usize, _current: usize) {}

    fn on_entry_complete(&mut self, _name: &str, _changed: bool) {}

    fn on_complete(&mut self) {}
}
