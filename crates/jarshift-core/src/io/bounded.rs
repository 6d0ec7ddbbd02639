//! Reads an entry's full payload against its declared size.
//!
//! Every entry handed to a transformer or collector goes through
//! [`read_entry_bytes`]. The caller either gets exactly `declared_size`
//! bytes or an error; a partially filled buffer is never returned.

use std::io::Read;

use crate::MigrationError;
use crate::Result;

/// Default ceiling for a single entry held in memory.
///
/// Matches the largest buffer addressable with a signed 32-bit length
/// (2 147 483 647 bytes). `MigrationConfig::max_entry_size` may lower or
/// raise it.
pub const MAX_ENTRY_SIZE: u64 = i32::MAX as u64;

/// Upper bound on the up-front allocation; larger entries grow as read.
const PREALLOC_LIMIT: u64 = 1024 * 1024;

/// Validates a declared entry size against the ceiling.
///
/// # Errors
///
/// - [`MigrationError::SizeUnknown`] if `declared_size` is negative
/// - [`MigrationError::SizeTooLarge`] if it exceeds `max_size`
///
/// # Examples
///
/// ```
/// use jarshift_core::io::check_declared_size;
///
/// assert_eq!(check_declared_size("a.class", 42, 100).unwrap(), 42);
/// assert!(check_declared_size("a.class", -1, 100).is_err());
/// assert!(check_declared_size("a.class", 101, 100).is_err());
/// ```
pub fn check_declared_size(entry: &str, declared_size: i64, max_size: u64) -> Result<u64> {
    let size = u64::try_from(declared_size).map_err(|_| MigrationError::SizeUnknown {
        entry: entry.to_string(),
        size: declared_size,
    })?;

    if size > max_size {
        return Err(MigrationError::SizeTooLarge {
            entry: entry.to_string(),
            size,
            max: max_size,
        });
    }

    Ok(size)
}

/// Reads exactly `declared_size` bytes from `reader`.
///
/// Partial reads are retried until the declared length is reached or the
/// source reports end of data.
///
/// # Errors
///
/// - [`MigrationError::SizeUnknown`] / [`MigrationError::SizeTooLarge`] from
///   [`check_declared_size`], before anything is read
/// - [`MigrationError::TruncatedRead`] if the source ends early
/// - [`MigrationError::Io`] if the source fails
///
/// # Examples
///
/// ```
/// use jarshift_core::io::read_entry_bytes;
/// use std::io::Cursor;
///
/// let mut source = Cursor::new(b"cafebabe".to_vec());
/// let data = read_entry_bytes(&mut source, "Foo.class", 4, 1024)?;
/// assert_eq!(data, b"cafe");
/// # Ok::<(), jarshift_core::MigrationError>(())
/// ```
pub fn read_entry_bytes<R: Read>(
    reader: &mut R,
    entry: &str,
    declared_size: i64,
    max_size: u64,
) -> Result<Vec<u8>> {
    let expected = check_declared_size(entry, declared_size, max_size)?;

    let capacity = usize::try_from(expected.min(PREALLOC_LIMIT)).unwrap_or(0);
    let mut data = Vec::with_capacity(capacity);

    let read = reader.take(expected).read_to_end(&mut data)? as u64;
    if read < expected {
        return Err(MigrationError::TruncatedRead {
            entry: entry.to_string(),
            expected,
            actual: read,
        });
    }

    Ok(data)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Reader that hands out at most `chunk` bytes per call.
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        chunk: usize,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            let remaining = self.data.len() - self.pos;
            let n = remaining.min(self.chunk).min(buf.len());
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    /// Reader that fails with `Interrupted` once before yielding data.
    struct InterruptOnce {
        inner: Cursor<Vec<u8>>,
        interrupted: bool,
    }

    impl Read for InterruptOnce {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(std::io::ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    #[test]
    fn test_reads_exact_length() {
        let mut src = Cursor::new(vec![1u8, 2, 3, 4, 5]);
        let data = read_entry_bytes(&mut src, "e", 5, MAX_ENTRY_SIZE).unwrap();
        assert_eq!(data, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_stops_at_declared_length() {
        let mut src = Cursor::new(vec![9u8; 10]);
        let data = read_entry_bytes(&mut src, "e", 3, MAX_ENTRY_SIZE).unwrap();
        assert_eq!(data.len(), 3);
    }

    #[test]
    fn test_loops_over_partial_reads() {
        let payload: Vec<u8> = (0..=255).collect();
        let mut src = Trickle {
            data: payload.clone(),
            pos: 0,
            chunk: 7,
        };
        let data = read_entry_bytes(&mut src, "e", 256, MAX_ENTRY_SIZE).unwrap();
        assert_eq!(data, payload);
    }

    #[test]
    fn test_retries_interrupted() {
        let mut src = InterruptOnce {
            inner: Cursor::new(b"abc".to_vec()),
            interrupted: false,
        };
        let data = read_entry_bytes(&mut src, "e", 3, MAX_ENTRY_SIZE).unwrap();
        assert_eq!(data, b"abc");
    }

    #[test]
    fn test_negative_size_is_unknown() {
        let mut src = Cursor::new(vec![1u8]);
        let err = read_entry_bytes(&mut src, "neg.class", -1, MAX_ENTRY_SIZE).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::SizeUnknown { ref entry, size: -1 } if entry == "neg.class"
        ));
        // Nothing consumed from the source
        assert_eq!(src.position(), 0);
    }

    #[test]
    fn test_over_ceiling_is_too_large() {
        let mut src = Cursor::new(vec![0u8; 16]);
        let err = read_entry_bytes(&mut src, "big", 16, 15).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::SizeTooLarge { size: 16, max: 15, .. }
        ));
    }

    #[test]
    fn test_ceiling_is_inclusive() {
        let mut src = Cursor::new(vec![0u8; 16]);
        assert_eq!(read_entry_bytes(&mut src, "e", 16, 16).unwrap().len(), 16);
    }

    #[test]
    fn test_short_source_is_truncated() {
        let mut src = Cursor::new(vec![0u8; 4]);
        let err = read_entry_bytes(&mut src, "short", 10, MAX_ENTRY_SIZE).unwrap_err();
        assert!(matches!(
            err,
            MigrationError::TruncatedRead {
                expected: 10,
                actual: 4,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_length_read() {
        let mut src = Cursor::new(Vec::new());
        assert!(read_entry_bytes(&mut src, "e", 0, MAX_ENTRY_SIZE).unwrap().is_empty());
    }

    #[test]
    fn test_default_ceiling_value() {
        assert_eq!(MAX_ENTRY_SIZE, 2_147_483_647);
    }
}
