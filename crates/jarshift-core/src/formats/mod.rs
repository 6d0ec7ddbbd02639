//! Container format implementations.

pub mod traits;
pub mod zip;

// Re-export main types for convenience
pub use traits::ContainerReader;
pub use traits::EntryMeta;
pub use zip::ZipContainer;
