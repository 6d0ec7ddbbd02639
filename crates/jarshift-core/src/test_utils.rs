//! Test utilities for building archives and fake containers.
//!
//! This module provides reusable helpers for creating in-memory JAR-like
//! archives and a [`MemoryContainer`] whose declared sizes can disagree with
//! its data, which a real ZIP cannot express.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Cursor;
use std::io::Read;
use std::io::Write;

use zip::write::SimpleFileOptions;

use crate::Result;
use crate::formats::ContainerReader;
use crate::formats::EntryMeta;

fn stored() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(zip::CompressionMethod::Stored)
        .unix_permissions(0o644)
}

/// Creates an in-memory ZIP archive from a list of entries.
///
/// Each entry is a tuple of (path, content). Files are stored uncompressed.
///
/// # Examples
///
/// ```
/// use jarshift_core::test_utils::create_test_zip;
///
/// let zip_data = create_test_zip(vec![("com/A.class", &b"\xCA\xFE"[..]), ("a.txt", &b"text"[..])]);
/// ```
#[must_use]
pub fn create_test_zip(entries: Vec<(&str, &[u8])>) -> Vec<u8> {
    entries
        .into_iter()
        .fold(ZipTestBuilder::new(), |builder, (path, data)| {
            builder.add_file(path, data)
        })
        .build()
}

/// Reads every entry of a ZIP archive, in order, as (name, content).
#[must_use]
pub fn read_zip_entries(data: &[u8]) -> Vec<(String, Vec<u8>)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut content = Vec::new();
            file.read_to_end(&mut content).unwrap();
            (file.name().to_string(), content)
        })
        .collect()
}

/// Builder for creating ZIP test archives with files and directories.
///
/// # Examples
///
/// ```
/// use jarshift_core::test_utils::ZipTestBuilder;
///
/// let jar = ZipTestBuilder::new()
///     .add_directory("com/")
///     .add_file("com/A.class", b"\xCA\xFE\xBA\xBE")
///     .build();
/// ```
pub struct ZipTestBuilder {
    zip: zip::ZipWriter<Cursor<Vec<u8>>>,
}

impl ZipTestBuilder {
    /// Creates a new ZIP test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            zip: zip::ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(mut self, path: &str, data: &[u8]) -> Self {
        self.zip.start_file(path, stored()).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a deflated file to the archive.
    #[must_use]
    pub fn add_deflated_file(mut self, path: &str, data: &[u8]) -> Self {
        let options = SimpleFileOptions::default()
            .compression_method(zip::CompressionMethod::Deflated);
        self.zip.start_file(path, options).unwrap();
        self.zip.write_all(data).unwrap();
        self
    }

    /// Adds a directory entry to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let options = SimpleFileOptions::default().unix_permissions(0o755);
        self.zip.add_directory(path, options).unwrap();
        self
    }

    /// Builds and returns the ZIP archive data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.zip.finish().unwrap().into_inner()
    }
}

impl Default for ZipTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Container held entirely in memory with freely chosen declared sizes.
///
/// # Examples
///
/// ```
/// use jarshift_core::formats::ContainerReader;
/// use jarshift_core::test_utils::MemoryContainer;
///
/// let container = MemoryContainer::new()
///     .with_entry("A.class", b"abc")
///     .with_declared_size("Broken.class", b"abc", -1);
/// assert_eq!(container.entry_count(), 2);
/// ```
#[derive(Debug, Default)]
pub struct MemoryContainer {
    entries: Vec<(EntryMeta, Vec<u8>)>,
}

impl MemoryContainer {
    /// Creates an empty container.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an entry whose declared size matches its data.
    #[must_use]
    pub fn with_entry(self, name: &str, data: &[u8]) -> Self {
        let size = i64::try_from(data.len()).unwrap();
        self.with_declared_size(name, data, size)
    }

    /// Adds an entry that declares `declared_size` regardless of its data.
    #[must_use]
    pub fn with_declared_size(mut self, name: &str, data: &[u8], declared_size: i64) -> Self {
        self.entries
            .push((EntryMeta::new(name, declared_size), data.to_vec()));
        self
    }
}

impl ContainerReader for MemoryContainer {
    fn entry_count(&self) -> usize {
        self.entries.len()
    }

    fn entry(&mut self, index: usize) -> Result<(EntryMeta, Box<dyn Read + '_>)> {
        let (meta, data) = self.entries.get(index).ok_or_else(|| {
            crate::MigrationError::InvalidArchive(format!("no entry at index {index}"))
        })?;
        Ok((meta.clone(), Box::new(data.as_slice())))
    }

    fn format_name(&self) -> &str {
        "memory"
    }
}
