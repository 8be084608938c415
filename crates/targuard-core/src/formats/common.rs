//! Filesystem writers for validated entries.
//!
//! Every function here takes a `ValidatedEntry`, so nothing can be written
//! without having passed the validator first.

use std::fs::File;
use std::fs::create_dir_all;
use std::io::BufWriter;
use std::io::Read;
use std::io::Write;
use std::path::Path;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::Result;
use crate::copy::CopyBuffer;
use crate::copy::copy_entry;
use crate::error::QuotaResource;
use crate::security::has_symlink_on_disk;
use crate::security::validator::ValidatedEntry;
use crate::types::DestDir;
use crate::types::SafePath;

/// Writes a regular file and returns the number of bytes written.
///
/// Parent directories are created as needed. An existing regular file at
/// the same path is truncated, matching what `tar -x` does with duplicate
/// members.
///
/// # Errors
///
/// Returns `MalformedArchive` if the entry data cannot be read and `Io` if
/// the file cannot be written.
pub fn extract_file<R: Read>(
    reader: &mut R,
    validated: &ValidatedEntry,
    report: &mut ExtractionReport,
    copy_buffer: &mut CopyBuffer,
    entry_name: &Path,
) -> Result<u64> {
    let output_path = validated.safe_path.as_path();

    if let Some(parent) = output_path.parent() {
        create_dir_all(parent)?;
    }

    let output_file = File::create(output_path)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, output_file);
    let bytes_written = copy_entry(reader, &mut writer, copy_buffer, entry_name)?;
    writer.flush()?;

    #[cfg(unix)]
    if let Some(mode) = validated.mode {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(output_path, std::fs::Permissions::from_mode(mode))?;
    }

    report.files_extracted += 1;
    report.bytes_written =
        report
            .bytes_written
            .checked_add(bytes_written)
            .ok_or(ExtractionError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;

    Ok(bytes_written)
}

/// Creates a directory entry. Existing directories are fine.
///
/// # Errors
///
/// Returns an error if directory creation fails.
pub fn create_directory(validated: &ValidatedEntry, report: &mut ExtractionReport) -> Result<()> {
    create_dir_all(validated.safe_path.as_path())?;
    report.directories_created += 1;
    Ok(())
}

/// Creates a symbolic link storing `target` verbatim.
///
/// The link path must not exist yet.
///
/// # Errors
///
/// Returns an error if the link cannot be created, or on platforms without
/// symlink support.
pub fn create_symlink(
    validated: &ValidatedEntry,
    target: &Path,
    report: &mut ExtractionReport,
) -> Result<()> {
    let link_path = validated.safe_path.as_path();
    if let Some(parent) = link_path.parent() {
        create_dir_all(parent)?;
    }

    #[cfg(unix)]
    {
        std::os::unix::fs::symlink(target, link_path)?;
        report.symlinks_created += 1;
        Ok(())
    }

    #[cfg(not(unix))]
    {
        let _ = (target, report);
        Err(ExtractionError::Io(std::io::Error::new(
            std::io::ErrorKind::Unsupported,
            "symlinks are not supported on this platform",
        )))
    }
}

/// Creates a hard link to an already extracted file.
///
/// The source is checked for symlinks on disk as well: linking a symlink
/// would duplicate it at a location where its relative target means
/// something else.
///
/// # Errors
///
/// Returns `UnsafeSymlinkTarget` if the source goes through a symlink on
/// disk, and `Io` if the link cannot be created (e.g. missing source).
pub fn create_hardlink(
    validated: &ValidatedEntry,
    source: &SafePath,
    dest: &DestDir,
    report: &mut ExtractionReport,
    entry_name: &Path,
    declared_target: &Path,
) -> Result<()> {
    if has_symlink_on_disk(source, dest)? {
        return Err(ExtractionError::UnsafeSymlinkTarget {
            entry: entry_name.to_path_buf(),
            target: declared_target.to_path_buf(),
        });
    }

    let link_path = validated.safe_path.as_path();
    if let Some(parent) = link_path.parent() {
        create_dir_all(parent)?;
    }

    std::fs::hard_link(source.as_path(), link_path)?;
    report.hardlinks_created += 1;
    Ok(())
}
