//! Entry walks over containers.
//!
//! Two walks share the bounded reader and the entry classifier:
//!
//! - [`rewriter`] rebuilds a container through a
//!   [`Transformer`](crate::transform::Transformer)
//! - [`scanner`] hands every class resource, including those inside nested
//!   archives, to a [`Collector`]
//!
//! Entries inside nested archives are located as `outer/path.jar!/inner`.

pub mod extract;
pub mod rewriter;
pub mod scanner;
pub mod tracker;

pub use rewriter::rewrite_container;
pub use rewriter::rewrite_container_with_progress;
pub use scanner::Collector;
pub use scanner::scan_container;
pub use tracker::ChangeTracker;

use std::io::Cursor;

use crate::MigrationError;
use crate::Result;
use crate::formats::ZipContainer;

/// Joins the location prefix of the enclosing archive with an entry name.
pub(crate) fn entry_location(prefix: &str, name: &str) -> String {
    format!("{prefix}{name}")
}

/// Opens the bytes of a nested archive.
pub(crate) fn open_nested<'a>(
    data: &'a [u8],
    location: &str,
) -> Result<ZipContainer<Cursor<&'a [u8]>>> {
    ZipContainer::new(Cursor::new(data)).map_err(|e| in_nested(e, location))
}

/// Prefixes archive format errors with the nested archive's location.
pub(crate) fn in_nested(err: MigrationError, location: &str) -> MigrationError {
    match err {
        MigrationError::InvalidArchive(msg) => {
            MigrationError::InvalidArchive(format!("{location}: {msg}"))
        }
        other => other,
    }
}
