//! Codec detection by magic bytes.
//!
//! Uploads arrive as bare streams, so detection never relies on a file name.

use std::io;
use std::io::Cursor;
use std::io::Read;

use super::compression::CompressionCodec;

const GZIP_MAGIC: &[u8] = &[0x1F, 0x8B];
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = &[0xFD, 0x37, 0x7A, 0x58, 0x5A, 0x00];
const ZSTD_MAGIC: &[u8] = &[0x28, 0xB5, 0x2F, 0xFD];

/// Longest magic sequence we look for.
const SNIFF_LEN: usize = 6;

/// Identifies the codec from the first bytes of a stream.
///
/// Returns `None` for anything that is not a known compression header; such
/// streams are read as uncompressed tar.
///
/// # Examples
///
/// ```
/// use targuard_core::formats::compression::CompressionCodec;
/// use targuard_core::formats::detect::codec_from_magic;
///
/// assert_eq!(codec_from_magic(&[0x1F, 0x8B, 0x08]), Some(CompressionCodec::Gzip));
/// assert_eq!(codec_from_magic(b"ustar"), None);
/// ```
#[must_use]
pub fn codec_from_magic(head: &[u8]) -> Option<CompressionCodec> {
    if head.starts_with(GZIP_MAGIC) {
        Some(CompressionCodec::Gzip)
    } else if head.starts_with(BZIP2_MAGIC) {
        Some(CompressionCodec::Bzip2)
    } else if head.starts_with(XZ_MAGIC) {
        Some(CompressionCodec::Xz)
    } else if head.starts_with(ZSTD_MAGIC) {
        Some(CompressionCodec::Zstd)
    } else {
        None
    }
}

/// Reads the stream head, detects the codec, and returns a reader that
/// replays the consumed bytes before the rest of the stream.
///
/// Short streams are fine: whatever could be read is used for detection.
///
/// # Errors
///
/// Returns the underlying read error.
pub fn sniff<R: Read>(
    mut reader: R,
) -> io::Result<(Option<CompressionCodec>, io::Chain<Cursor<Vec<u8>>, R>)> {
    let mut head = Vec::with_capacity(SNIFF_LEN);
    (&mut reader)
        .take(SNIFF_LEN as u64)
        .read_to_end(&mut head)?;

    let codec = codec_from_magic(&head);
    Ok((codec, Cursor::new(head).chain(reader)))
}
