//! Common traits for container readers.

use std::io::Read;

use crate::Result;

/// Directory metadata of one container entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryMeta {
    /// Entry name as stored in the container.
    pub name: String,

    /// Uncompressed size declared by the container directory.
    ///
    /// Signed so that readers can report an unknown size as a negative
    /// value; the bounded reader rejects it.
    pub declared_size: i64,
}

impl EntryMeta {
    /// Creates entry metadata.
    pub fn new(name: impl Into<String>, declared_size: i64) -> Self {
        Self {
            name: name.into(),
            declared_size,
        }
    }
}

/// Read side of a container, walked entry by entry in native order.
///
/// The pipelines are generic over this trait; [`super::ZipContainer`] is the
/// production implementation.
pub trait ContainerReader {
    /// Returns the number of entries in the container directory.
    fn entry_count(&self) -> usize;

    /// Opens the entry at `index`, returning its metadata and a reader over
    /// its uncompressed bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry header cannot be read.
    fn entry(&mut self, index: usize) -> Result<(EntryMeta, Box<dyn Read + '_>)>;

    /// Returns the container format name.
    fn format_name(&self) -> &str;
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    struct SingleEntry;

    impl ContainerReader for SingleEntry {
        fn entry_count(&self) -> usize {
            1
        }

        fn entry(&mut self, _index: usize) -> Result<(EntryMeta, Box<dyn Read + '_>)> {
            Ok((
                EntryMeta::new("only.txt", 2),
                Box::new(Cursor::new(b"hi".to_vec())),
            ))
        }

        fn format_name(&self) -> &str {
            "test"
        }
    }

    #[test]
    fn test_trait_implementation() {
        let mut container = SingleEntry;
        assert_eq!(container.format_name(), "test");
        assert_eq!(container.entry_count(), 1);

        let (meta, mut reader) = container.entry(0).unwrap();
        assert_eq!(meta, EntryMeta::new("only.txt", 2));
        let mut data = String::new();
        reader.read_to_string(&mut data).unwrap();
        assert_eq!(data, "hi");
    }
}
