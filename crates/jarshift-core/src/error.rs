//! Error types for archive migration operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MigrationError`.
pub type Result<T> = std::result::Result<T, MigrationError>;

/// Boxed error carried as the cause of a [`TransformError`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failure raised by a transform or collector implementation.
///
/// The pipeline never inspects this error; it attaches the entry location and
/// hands it back to the caller inside [`MigrationError::Transform`] or
/// [`MigrationError::Collect`].
///
/// # Examples
///
/// ```
/// use jarshift_core::TransformError;
///
/// let err = TransformError::new("constant pool is corrupt");
/// assert_eq!(err.to_string(), "constant pool is corrupt");
/// ```
#[derive(Error, Debug)]
#[error("{message}")]
pub struct TransformError {
    message: String,
    #[source]
    source: Option<BoxError>,
}

impl TransformError {
    /// Creates a transform error with a message and no underlying cause.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    /// Creates a transform error wrapping an underlying cause.
    pub fn with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Returns the error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for TransformError {
    fn from(err: std::io::Error) -> Self {
        Self::with_source(format!("I/O error: {err}"), err)
    }
}

/// Errors that can occur while scanning or rewriting an archive.
///
/// Every variant aborts the pipeline run for the archive being processed.
/// Variants that concern a single entry carry its location; entries inside
/// nested archives are reported as `outer.jar!/inner/Entry.class`.
#[derive(Error, Debug)]
pub enum MigrationError {
    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container directory or entry could not be read.
    #[error("invalid archive: {0}")]
    InvalidArchive(String),

    /// An entry reported a negative declared size.
    #[error("size of entry {entry} is unknown (declared {size})")]
    SizeUnknown {
        /// Entry location.
        entry: String,
        /// Declared size as reported by the container.
        size: i64,
    },

    /// An entry's declared size exceeds the configured ceiling.
    #[error("entry {entry} is too large: {size} bytes (limit {max} bytes)")]
    SizeTooLarge {
        /// Entry location.
        entry: String,
        /// Declared size in bytes.
        size: u64,
        /// Configured ceiling in bytes.
        max: u64,
    },

    /// The entry data ended before the declared size was read.
    #[error("truncated entry {entry}: expected {expected} bytes, read {actual}")]
    TruncatedRead {
        /// Entry location.
        entry: String,
        /// Declared size in bytes.
        expected: u64,
        /// Bytes actually available.
        actual: u64,
    },

    /// A nested archive could not be materialized on disk.
    #[error("failed to extract nested archive to {}: {source}", path.display())]
    NestedExtraction {
        /// Target path of the extracted archive.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },

    /// Nested archives go deeper than the configured limit.
    #[error("nested archive {entry} exceeds maximum nesting depth of {max_depth}")]
    NestingTooDeep {
        /// Entry location of the archive that would exceed the limit.
        entry: String,
        /// Configured maximum depth.
        max_depth: usize,
    },

    /// The transform capability failed for an entry.
    #[error("transform failed for {entry}: {source}")]
    Transform {
        /// Entry location.
        entry: String,
        /// Error raised by the transformer.
        #[source]
        source: TransformError,
    },

    /// The collector capability failed for an entry.
    #[error("collector failed for {entry}: {source}")]
    Collect {
        /// Entry location.
        entry: String,
        /// Error raised by the collector.
        #[source]
        source: TransformError,
    },

    /// Configuration values are out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MigrationError {
    /// Returns `true` if this error was raised by the bounded byte reader.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarshift_core::MigrationError;
    ///
    /// let err = MigrationError::SizeUnknown {
    ///     entry: "a.class".into(),
    ///     size: -1,
    /// };
    /// assert!(err.is_size_violation());
    ///
    /// let err = MigrationError::InvalidArchive("bad directory".into());
    /// assert!(!err.is_size_violation());
    /// ```
    #[must_use]
    pub const fn is_size_violation(&self) -> bool {
        matches!(
            self,
            Self::SizeUnknown { .. } | Self::SizeTooLarge { .. } | Self::TruncatedRead { .. }
        )
    }

    /// Returns the entry location this error refers to, if any.
    ///
    /// # Examples
    ///
    /// ```
    /// use jarshift_core::MigrationError;
    ///
    /// let err = MigrationError::TruncatedRead {
    ///     entry: "lib/a.jar!/A.class".into(),
    ///     expected: 10,
    ///     actual: 4,
    /// };
    /// assert_eq!(err.entry(), Some("lib/a.jar!/A.class"));
    ///
    /// let err = MigrationError::InvalidConfig("zero ceiling".into());
    /// assert_eq!(err.entry(), None);
    /// ```
    #[must_use]
    pub fn entry(&self) -> Option<&str> {
        match self {
            Self::SizeUnknown { entry, .. }
            | Self::SizeTooLarge { entry, .. }
            | Self::TruncatedRead { entry, .. }
            | Self::NestingTooDeep { entry, .. }
            | Self::Transform { entry, .. }
            | Self::Collect { entry, .. } => Some(entry),
            _ => None,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_size_unknown_display() {
        let err = MigrationError::SizeUnknown {
            entry: "com/Foo.class".into(),
            size: -1,
        };
        let display = err.to_string();
        assert!(display.contains("com/Foo.class"));
        assert!(display.contains("-1"));
    }

    #[test]
    fn test_size_too_large_display() {
        let err = MigrationError::SizeTooLarge {
            entry: "big.bin".into(),
            size: 5_000_000_000,
            max: 2_147_483_647,
        };
        let display = err.to_string();
        assert!(display.contains("too large"));
        assert!(display.contains("5000000000"));
        assert!(display.contains("2147483647"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: MigrationError = io_err.into();
        assert!(matches!(err, MigrationError::Io(_)));
        assert!(!err.is_size_violation());
    }

    #[test]
    fn test_size_violations() {
        assert!(
            MigrationError::TruncatedRead {
                entry: "x".into(),
                expected: 2,
                actual: 1,
            }
            .is_size_violation()
        );
        assert!(
            !MigrationError::NestingTooDeep {
                entry: "x.jar".into(),
                max_depth: 4,
            }
            .is_size_violation()
        );
    }

    #[test]
    fn test_transform_error_source_chain() {
        let inner = TransformError::with_source(
            "rewrite failed",
            std::io::Error::other("disk gone"),
        );
        let err = MigrationError::Transform {
            entry: "a/B.class".into(),
            source: inner,
        };

        assert_eq!(err.entry(), Some("a/B.class"));
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "rewrite failed");
        assert!(source.source().is_some());
    }

    #[test]
    fn test_nested_extraction_display() {
        let err = MigrationError::NestedExtraction {
            path: PathBuf::from("/tmp/lib/inner.jar"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        };
        let display = err.to_string();
        assert!(display.contains("/tmp/lib/inner.jar"));
        assert!(display.contains("denied"));
        assert_eq!(err.entry(), None);
    }

    #[test]
    fn test_transform_error_from_io() {
        let err: TransformError = std::io::Error::other("boom").into();
        assert!(err.message().contains("boom"));
        assert!(err.source().is_some());
    }
}
