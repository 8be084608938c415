//! High-level public API for archive extraction.

use std::fs::File;
use std::io::BufRead;
use std::io::BufReader;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::NoopProgress;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;
use crate::formats::compression::CompressionCodec;
use crate::formats::compression::decoder;
use crate::formats::detect::sniff;
use crate::formats::tar::extract_tar;
use crate::types::DestDir;

/// Extracts a (possibly compressed) tar stream into `target_directory`.
///
/// The codec is detected from the first bytes of the stream. Every entry is
/// validated before anything is written for it, and the first unsafe entry
/// aborts the extraction. Entries written before the failure are left in
/// place: the target directory belongs to the caller, who is expected to
/// discard it on error.
///
/// # Arguments
///
/// * `archive_stream` - The uploaded archive
/// * `target_directory` - Existing, writable directory to extract into
/// * `config` - Security configuration for the extraction
///
/// # Errors
///
/// - `UnsafePath`, `UnsafeSymlinkTarget`, `DisallowedEntryKind` for the
///   first rejected entry
/// - `MalformedArchive` if the stream is empty, truncated, or not a tar
///   archive in a supported codec
/// - `QuotaExceeded` if a configured limit is hit
/// - `Io` if the target directory is unusable or a write fails
///
/// # Examples
///
/// ```no_run
/// use targuard_core::SecurityConfig;
/// use targuard_core::extract;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let upload = std::fs::File::open("course.tar.gz")?;
/// let report = extract(upload, "/tmp/scratch", &SecurityConfig::default())?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract<R: Read, P: AsRef<Path>>(
    archive_stream: R,
    target_directory: P,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    extract_with_progress(archive_stream, target_directory, config, &mut NoopProgress)
}

/// Extracts an archive file into `output_dir`.
///
/// The file name plays no part in codec detection.
///
/// # Errors
///
/// Returns `Io` if the archive cannot be opened, otherwise the same errors
/// as [`extract`].
///
/// # Examples
///
/// ```no_run
/// use targuard_core::SecurityConfig;
/// use targuard_core::extract_archive;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = SecurityConfig::default();
/// let report = extract_archive("course.tar.gz", "/tmp/output", &config)?;
/// println!("Extracted {} files", report.files_extracted);
/// # Ok(())
/// # }
/// ```
pub fn extract_archive<P: AsRef<Path>, Q: AsRef<Path>>(
    archive_path: P,
    output_dir: Q,
    config: &SecurityConfig,
) -> Result<ExtractionReport> {
    let file = File::open(archive_path.as_ref())?;
    extract(file, output_dir, config)
}

/// Extracts a tar stream, reporting each entry to `progress`.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_with_progress<R: Read, P: AsRef<Path>>(
    archive_stream: R,
    target_directory: P,
    config: &SecurityConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let dest = DestDir::new(target_directory.as_ref())?;
    let (codec, reader) = open_stream(archive_stream)?;

    let mut report = extract_tar(reader, &dest, config, progress)?;
    report.codec = codec;
    Ok(report)
}

/// Detects the codec and returns a reader over the decoded tar stream.
///
/// # Errors
///
/// Returns `MalformedArchive` if the stream is empty or cannot be read.
pub(crate) fn open_stream<'a, R: Read + 'a>(
    stream: R,
) -> Result<(Option<CompressionCodec>, Box<dyn Read + 'a>)> {
    let mut buffered = BufReader::new(stream);
    let is_empty = buffered
        .fill_buf()
        .map_err(|e| ExtractionError::malformed(&e, None))?
        .is_empty();
    if is_empty {
        return Err(ExtractionError::MalformedArchive {
            reason: "empty archive".into(),
            entry: None,
        });
    }

    let (codec, head_and_rest) = sniff(buffered).map_err(|e| ExtractionError::malformed(&e, None))?;
    debug!(
        "detected codec: {}",
        codec.map_or("none (plain tar)", CompressionCodec::name)
    );

    let reader = decoder(codec, BufReader::new(head_and_rest))
        .map_err(|e| ExtractionError::malformed(&e, None))?;
    Ok((codec, reader))
}
