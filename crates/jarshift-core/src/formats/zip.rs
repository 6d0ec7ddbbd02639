//! ZIP container handling (JAR/WAR are ZIP files).

use std::fs::File;
use std::io::BufReader;
use std::io::Read;
use std::io::Seek;
use std::path::Path;

use chrono::Datelike;
use chrono::Timelike;
use zip::CompressionMethod;
use zip::DateTime;
use zip::ZipArchive;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

use crate::MigrationConfig;
use crate::MigrationError;
use crate::Result;

use super::traits::ContainerReader;
use super::traits::EntryMeta;

/// Deflate level used when the configuration does not set one.
const DEFAULT_COMPRESSION_LEVEL: u8 = 6;

/// ZIP container reader.
pub struct ZipContainer<R: Read + Seek> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> ZipContainer<R> {
    /// Reads the central directory from `reader`.
    ///
    /// # Errors
    ///
    /// Returns [`MigrationError::InvalidArchive`] if the data is not a ZIP
    /// file.
    pub fn new(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| zip_error("failed to read ZIP directory", e))?;
        Ok(Self { archive })
    }
}

impl ZipContainer<BufReader<File>> {
    /// Opens a ZIP file from disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or is not a ZIP file.
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Self::new(BufReader::new(file))
    }
}

impl<R: Read + Seek> ContainerReader for ZipContainer<R> {
    fn entry_count(&self) -> usize {
        self.archive.len()
    }

    fn entry(&mut self, index: usize) -> Result<(EntryMeta, Box<dyn Read + '_>)> {
        let file = self
            .archive
            .by_index(index)
            .map_err(|e| zip_error("failed to read ZIP entry", e))?;

        // Sizes beyond i64 cannot be held anyway; saturate so the bounded
        // reader reports them as too large.
        let declared_size = i64::try_from(file.size()).unwrap_or(i64::MAX);
        let meta = EntryMeta::new(file.name(), declared_size);

        Ok((meta, Box::new(file)))
    }

    fn format_name(&self) -> &str {
        "zip"
    }
}

/// Converts a zip-crate error, keeping I/O failures as I/O errors.
pub(crate) fn zip_error(context: &str, err: ZipError) -> MigrationError {
    match err {
        ZipError::Io(io_err) => MigrationError::Io(io_err),
        other => MigrationError::InvalidArchive(format!("{context}: {other}")),
    }
}

/// Builds the entry options for one rewrite run.
///
/// All entries written in the run share `timestamp`.
pub(crate) fn entry_options(config: &MigrationConfig, timestamp: DateTime) -> SimpleFileOptions {
    let options = SimpleFileOptions::default().last_modified_time(timestamp);

    if config.compression_level == Some(0) {
        options.compression_method(CompressionMethod::Stored)
    } else {
        let level = config
            .compression_level
            .unwrap_or(DEFAULT_COMPRESSION_LEVEL);
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(i64::from(level)))
    }
}

/// Marks `options` for ZIP64 when an entry of `len` bytes does not fit the
/// 32-bit size fields.
pub(crate) fn sized_options(options: SimpleFileOptions, len: usize) -> SimpleFileOptions {
    if needs_zip64(len as u64) {
        options.large_file(true)
    } else {
        options
    }
}

fn needs_zip64(len: u64) -> bool {
    len > u64::from(u32::MAX)
}

/// Returns the current local time as a ZIP timestamp.
///
/// Falls back to the ZIP epoch (1980-01-01) when the clock is outside the
/// range a ZIP entry can store.
pub(crate) fn current_timestamp() -> DateTime {
    let now = chrono::Local::now();

    let converted = u16::try_from(now.year()).ok().and_then(|year| {
        DateTime::from_date_and_time(
            year,
            u8::try_from(now.month()).ok()?,
            u8::try_from(now.day()).ok()?,
            u8::try_from(now.hour()).ok()?,
            u8::try_from(now.minute()).ok()?,
            u8::try_from(now.second()).ok()?,
        )
        .ok()
    });

    converted.unwrap_or_default()
}
