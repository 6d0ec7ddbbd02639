//! On-disk materialization of nested archives.
//!
//! A nested archive found while scanning is written next to the archive it
//! came from, at `<outer parent dir>/<entry path>`. Files already present are
//! reused, which makes repeated scans of the same outer archive extract each
//! nested archive once.

use std::fs;
use std::io;
use std::io::Write;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

use tracing::debug;

use crate::MigrationError;
use crate::Result;

/// Suffix of the scratch file a nested archive is written to before it is
/// moved into place.
const PARTIAL_SUFFIX: &str = ".partial";

/// What [`materialize`] did with the target path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extraction {
    /// The file was written by this call.
    Created,
    /// A file already existed and was left untouched.
    Reused,
}

/// Returns the on-disk path for nested entry `name` under `base`.
///
/// # Errors
///
/// Returns [`MigrationError::NestedExtraction`] if `name` is absolute or
/// climbs out of `base` with `..`.
pub fn extraction_target(base: &Path, name: &str) -> Result<PathBuf> {
    let mut target = base.to_path_buf();

    for component in Path::new(name).components() {
        match component {
            Component::Normal(part) => target.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(MigrationError::NestedExtraction {
                    path: base.join(name),
                    source: io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "nested archive path escapes the extraction directory",
                    ),
                });
            }
        }
    }

    if target == base {
        return Err(MigrationError::NestedExtraction {
            path: target,
            source: io::Error::new(io::ErrorKind::InvalidInput, "empty nested archive path"),
        });
    }

    Ok(target)
}

/// Writes `data` to `target` unless a file already exists there.
///
/// Intermediate directories are created as needed. The bytes go to a
/// sibling scratch file first and are renamed into place, so a failed write
/// never leaves a truncated archive behind to be reused later.
///
/// # Errors
///
/// Returns [`MigrationError::NestedExtraction`] if a directory or the file
/// cannot be created.
pub fn materialize(target: &Path, data: &[u8]) -> Result<Extraction> {
    let wrap = |source: io::Error| MigrationError::NestedExtraction {
        path: target.to_path_buf(),
        source,
    };

    if target.is_file() {
        debug!(path = %target.display(), "target already on disk");
        return Ok(Extraction::Reused);
    }

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent).map_err(wrap)?;
    }

    let mut partial = target.as_os_str().to_owned();
    partial.push(PARTIAL_SUFFIX);
    let partial = PathBuf::from(partial);

    let written = fs::File::create(&partial).and_then(|mut file| {
        file.write_all(data)?;
        file.sync_all()
    });
    if let Err(err) = written {
        let _ = fs::remove_file(&partial);
        return Err(wrap(err));
    }

    fs::rename(&partial, target).map_err(wrap)?;
    debug!(path = %target.display(), bytes = data.len(), "renamed scratch file into place");

    Ok(Extraction::Created)
}
