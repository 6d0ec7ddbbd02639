//! Configuration for archive migration.

use crate::MigrationError;
use crate::Result;
use crate::io::MAX_ENTRY_SIZE;

/// Where nested archives are opened from while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedMode {
    /// Write each nested archive next to the outer one and recurse into the
    /// file. Existing files are reused, so repeated scans extract once.
    #[default]
    OnDisk,

    /// Open nested archives straight from their bytes. Nothing is written.
    InMemory,
}

/// Settings shared by the scanner, the rewriter and the batch driver.
///
/// # Examples
///
/// ```
/// use jarshift_core::MigrationConfig;
/// use jarshift_core::config::NestedMode;
///
/// // Defaults
/// let config = MigrationConfig::default();
/// assert_eq!(config.nested_mode, NestedMode::OnDisk);
///
/// // Customize for specific needs
/// let custom = MigrationConfig::default()
///     .with_nested_mode(NestedMode::InMemory)
///     .with_rewrite_nested(true)
///     .with_compression_level(Some(9));
/// assert!(custom.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct MigrationConfig {
    /// Largest entry, in bytes, read into memory.
    ///
    /// Default: [`MAX_ENTRY_SIZE`].
    pub max_entry_size: u64,

    /// Deepest archive-in-archive nesting followed. The outer archive is
    /// depth 0.
    ///
    /// Default: `16`.
    pub max_nesting_depth: usize,

    /// How the scanner opens nested archives.
    ///
    /// Default: [`NestedMode::OnDisk`].
    pub nested_mode: NestedMode,

    /// Rewrite nested archives recursively instead of offering their bytes
    /// to the transformer as a single resource.
    ///
    /// Default: `false`.
    pub rewrite_nested: bool,

    /// Output compression level. `Some(0)` stores entries uncompressed,
    /// `Some(1..=9)` deflates at that level, `None` deflates at level 6.
    ///
    /// Default: `None`.
    pub compression_level: Option<u8>,

    /// Entry name patterns passed through untouched by the rewriter and
    /// skipped by the scanner.
    ///
    /// Supports exact component (`"module-info.class"`), suffix (`"*.SF"`)
    /// and prefix (`"META-INF*"`) forms.
    ///
    /// Default: empty.
    pub exclude_patterns: Vec<String>,

    /// Keep migrating the remaining files of a directory tree after one
    /// fails.
    ///
    /// Default: `false`.
    pub continue_on_error: bool,
}

impl Default for MigrationConfig {
    /// Default values:
    /// - `max_entry_size`: 2 147 483 647 bytes
    /// - `max_nesting_depth`: 16
    /// - `nested_mode`: `OnDisk`
    /// - `rewrite_nested`: `false`
    /// - `compression_level`: `None` (deflate, level 6)
    /// - `exclude_patterns`: empty
    /// - `continue_on_error`: `false`
    fn default() -> Self {
        Self {
            max_entry_size: MAX_ENTRY_SIZE,
            max_nesting_depth: 16,
            nested_mode: NestedMode::OnDisk,
            rewrite_nested: false,
            compression_level: None,
            exclude_patterns: Vec::new(),
            continue_on_error: false,
        }
    }
}

impl MigrationConfig {
    /// Creates a new `MigrationConfig` with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the per-entry size ceiling.
    #[must_use]
    pub fn with_max_entry_size(mut self, max: u64) -> Self {
        self.max_entry_size = max;
        self
    }

    /// Sets the maximum nesting depth.
    #[must_use]
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }

    /// Sets how nested archives are opened while scanning.
    #[must_use]
    pub fn with_nested_mode(mut self, mode: NestedMode) -> Self {
        self.nested_mode = mode;
        self
    }

    /// Sets whether the rewriter recurses into nested archives.
    #[must_use]
    pub fn with_rewrite_nested(mut self, rewrite: bool) -> Self {
        self.rewrite_nested = rewrite;
        self
    }

    /// Sets the output compression level.
    #[must_use]
    pub fn with_compression_level(mut self, level: Option<u8>) -> Self {
        self.compression_level = level;
        self
    }

    /// Sets the exclude patterns.
    #[must_use]
    pub fn with_exclude_patterns(mut self, patterns: Vec<String>) -> Self {
        self.exclude_patterns = patterns;
        self
    }

    /// Sets whether batch migration continues after a failure.
    #[must_use]
    pub fn with_continue_on_error(mut self, keep_going: bool) -> Self {
        self.continue_on_error = keep_going;
        self
    }

    /// Returns `true` if `name` matches any exclude pattern.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarshift_core::MigrationConfig;
    ///
    /// let config = MigrationConfig::default()
    ///     .with_exclude_patterns(vec!["*.SF".into(), "module-info.class".into()]);
    /// assert!(config.is_excluded("META-INF/SIGNER.SF"));
    /// assert!(config.is_excluded("module-info.class"));
    /// assert!(!config.is_excluded("com/Foo.class"));
    /// ```
    #[must_use]
    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_patterns
            .iter()
            .any(|pattern| matches_pattern(name, pattern))
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - `max_entry_size` is zero
    /// - `compression_level` is above 9
    pub fn validate(&self) -> Result<()> {
        if self.max_entry_size == 0 {
            return Err(MigrationError::InvalidConfig(
                "max_entry_size must be greater than zero".into(),
            ));
        }
        if let Some(level) = self.compression_level
            && level > 9
        {
            return Err(MigrationError::InvalidConfig(format!(
                "compression level must be 0-9, got {level}"
            )));
        }
        Ok(())
    }
}

/// Matches an entry name against a simple glob pattern.
///
/// The pattern is tried against the whole name and against every
/// `/`-separated component.
fn matches_pattern(name: &str, pattern: &str) -> bool {
    pattern_matches(name, pattern)
        || name
            .split('/')
            .any(|component| pattern_matches(component, pattern))
}

fn pattern_matches(s: &str, pattern: &str) -> bool {
    if pattern == s {
        return true;
    }

    if let Some(prefix) = pattern.strip_suffix('*') {
        return s.starts_with(prefix);
    }

    if let Some(suffix) = pattern.strip_prefix('*') {
        return s.ends_with(suffix);
    }

    false
}
