//! Archive entry classification.

/// File-name suffix of compiled class files.
pub const CLASS_SUFFIX: &str = ".class";

/// File-name suffixes recognized as nested containers.
pub const CONTAINER_SUFFIXES: [&str; 2] = [".jar", ".war"];

/// How the pipelines treat an archive entry.
///
/// Computed purely from the entry name and its declared size by
/// [`classify`]. The walk components match on this value instead of
/// comparing suffixes themselves.
///
/// # Examples
///
/// ```
/// use jarshift_core::types::EntryClass;
/// use jarshift_core::types::classify;
///
/// assert_eq!(classify("com/Foo.class", 120), EntryClass::TransformableLeaf);
/// assert_eq!(classify("WEB-INF/lib/a.jar", 4096), EntryClass::NestedArchive);
/// assert_eq!(classify("com/", 0), EntryClass::Directory);
/// assert_eq!(classify("README.txt", 12), EntryClass::Ignored);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryClass {
    /// Zero-size entry, skipped entirely.
    Directory,

    /// Compiled class file.
    TransformableLeaf,

    /// JAR or WAR stored inside the archive.
    NestedArchive,

    /// Anything else.
    Ignored,
}

impl EntryClass {
    /// Returns `true` if this is a directory marker.
    #[must_use]
    pub const fn is_directory(self) -> bool {
        matches!(self, Self::Directory)
    }

    /// Returns `true` if this is a class file.
    #[must_use]
    pub const fn is_leaf(self) -> bool {
        matches!(self, Self::TransformableLeaf)
    }

    /// Returns `true` if this is a nested container.
    #[must_use]
    pub const fn is_nested_archive(self) -> bool {
        matches!(self, Self::NestedArchive)
    }
}

/// Classifies an entry from its name and declared size.
///
/// A declared size of zero wins over every name-based rule. Suffix matching
/// is exact and case-sensitive.
#[must_use]
pub fn classify(name: &str, declared_size: i64) -> EntryClass {
    if declared_size == 0 {
        EntryClass::Directory
    } else if is_class_name(name) {
        EntryClass::TransformableLeaf
    } else if is_container_name(name) {
        EntryClass::NestedArchive
    } else {
        EntryClass::Ignored
    }
}

/// Returns `true` if `name` ends with the class-file suffix.
#[must_use]
pub fn is_class_name(name: &str) -> bool {
    name.ends_with(CLASS_SUFFIX)
}

/// Returns `true` if `name` ends with a recognized container suffix.
#[must_use]
pub fn is_container_name(name: &str) -> bool {
    CONTAINER_SUFFIXES
        .iter()
        .any(|suffix| name.ends_with(suffix))
}
