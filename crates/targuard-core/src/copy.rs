//! Entry content copying with a reusable buffer.
//!
//! Reading and writing fail differently: a read error means the archive
//! stream is broken (truncated gzip member, short tar block) and is reported
//! as `MalformedArchive`, while a write error is a filesystem problem on the
//! extraction side and stays `Io`.

use std::io;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ExtractionError;

/// Buffer size for entry copies (64KB).
const COPY_BUFFER_SIZE: usize = 64 * 1024;

/// Heap buffer reused for every entry of one extraction.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use targuard_core::copy::CopyBuffer;
/// use targuard_core::copy::copy_entry;
///
/// # fn main() -> Result<(), targuard_core::ExtractionError> {
/// let mut buffer = CopyBuffer::new();
/// let mut output = Vec::new();
///
/// let copied = copy_entry(
///     &mut &b"<course/>"[..],
///     &mut output,
///     &mut buffer,
///     Path::new("course.xml"),
/// )?;
/// assert_eq!(copied, 9);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CopyBuffer {
    buf: Box<[u8]>,
}

impl CopyBuffer {
    /// Creates a new zeroed copy buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: vec![0u8; COPY_BUFFER_SIZE].into_boxed_slice(),
        }
    }

    /// Returns the buffer size in bytes.
    #[inline]
    #[must_use]
    pub fn size(&self) -> usize {
        self.buf.len()
    }
}

impl Default for CopyBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Copies one entry's content from the archive stream into `writer`.
///
/// Returns the number of bytes copied.
///
/// # Errors
///
/// - `MalformedArchive` naming `entry` if reading fails
/// - `Io` if writing fails
/// - `QuotaExceeded` if the byte count overflows
pub fn copy_entry<R: Read, W: Write>(
    reader: &mut R,
    writer: &mut W,
    buffer: &mut CopyBuffer,
    entry: &Path,
) -> Result<u64, ExtractionError> {
    let mut total: u64 = 0;

    loop {
        let bytes_read = match reader.read(&mut buffer.buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(ExtractionError::malformed(&e, Some(entry))),
        };

        writer.write_all(&buffer.buf[..bytes_read])?;

        total = total
            .checked_add(bytes_read as u64)
            .ok_or(ExtractionError::QuotaExceeded {
                resource: crate::QuotaResource::IntegerOverflow,
            })?;
    }

    Ok(total)
}
