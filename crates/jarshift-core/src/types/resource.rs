//! Named byte payload passed between reader, transformer and writer.

/// An archive entry's name and full contents.
///
/// Immutable once constructed. A transformer that wants a different name or
/// payload builds a new `Resource`.
///
/// # Examples
///
/// ```
/// use jarshift_core::Resource;
///
/// let res = Resource::new("com/example/Foo.class", vec![0xCA, 0xFE, 0xBA, 0xBE]);
/// assert_eq!(res.name(), "com/example/Foo.class");
/// assert_eq!(res.len(), 4);
///
/// let renamed = res.with_name("org/example/Foo.class");
/// assert_eq!(renamed.data(), &[0xCA, 0xFE, 0xBA, 0xBE]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Resource {
    name: String,
    data: Vec<u8>,
}

impl Resource {
    /// Creates a resource from a name and payload.
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    /// Returns the entry name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the payload.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Returns the payload length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns a resource with the same payload under a new name.
    #[must_use]
    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: self.data,
        }
    }

    /// Consumes the resource, returning its name and payload.
    #[must_use]
    pub fn into_parts(self) -> (String, Vec<u8>) {
        (self.name, self.data)
    }
}
