//! Compression codecs wrapped around tar streams.
//!
//! # Supported Codecs
//!
//! - **Gzip** (.tar.gz, .tgz): multi-member streams are read to the end
//! - **Bzip2** (.tar.bz2, .tbz2)
//! - **Xz** (.tar.xz, .txz): concatenated streams are read to the end
//! - **Zstd** (.tar.zst, .tzst)

use std::io;
use std::io::BufRead;
use std::io::Read;

/// Compression codec of an archive stream.
///
/// # Examples
///
/// ```
/// use targuard_core::formats::compression::CompressionCodec;
///
/// assert_eq!(CompressionCodec::Gzip.name(), "gzip");
/// assert_eq!(CompressionCodec::Zstd.extension(), "tar.zst");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompressionCodec {
    /// Gzip compression (deflate algorithm).
    Gzip,

    /// Bzip2 compression (Burrows-Wheeler algorithm).
    Bzip2,

    /// Xz compression (LZMA2 algorithm).
    Xz,

    /// Zstd compression (Zstandard algorithm).
    Zstd,
}

impl CompressionCodec {
    /// Returns the typical file extension for this codec when used with TAR.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Gzip => "tar.gz",
            Self::Bzip2 => "tar.bz2",
            Self::Xz => "tar.xz",
            Self::Zstd => "tar.zst",
        }
    }

    /// Returns a human-readable name for this codec.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gzip => "gzip",
            Self::Bzip2 => "bzip2",
            Self::Xz => "xz",
            Self::Zstd => "zstd",
        }
    }
}

impl std::fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Wraps `reader` in the decoder for `codec`, or returns it unchanged for a
/// plain tar stream.
///
/// # Errors
///
/// Returns an error if the zstd decoder cannot be initialized.
pub fn decoder<'a, R: BufRead + 'a>(
    codec: Option<CompressionCodec>,
    reader: R,
) -> io::Result<Box<dyn Read + 'a>> {
    Ok(match codec {
        None => Box::new(reader),
        Some(CompressionCodec::Gzip) => Box::new(flate2::bufread::MultiGzDecoder::new(reader)),
        Some(CompressionCodec::Bzip2) => Box::new(bzip2::bufread::MultiBzDecoder::new(reader)),
        Some(CompressionCodec::Xz) => Box::new(xz2::bufread::XzDecoder::new_multi_decoder(reader)),
        Some(CompressionCodec::Zstd) => Box::new(zstd::stream::read::Decoder::with_buffer(reader)?),
    })
}
