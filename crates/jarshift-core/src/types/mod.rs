//! Value types shared by the scanning and rewriting pipelines.

pub mod entry_class;
pub mod resource;

pub use entry_class::EntryClass;
pub use entry_class::classify;
pub use entry_class::is_class_name;
pub use entry_class::is_container_name;
pub use resource::Resource;
