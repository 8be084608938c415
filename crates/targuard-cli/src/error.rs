//! Error conversion utilities for CLI.
//!
//! Converts targuard-core's typed errors (thiserror) into user-friendly
//! contextual errors (anyhow) with actionable guidance.

use anyhow::anyhow;
use std::path::Path;
use targuard_core::ExtractionError;

/// Converts `ExtractionError` to user-friendly anyhow error with context
pub fn convert_extraction_error(err: ExtractionError, archive: &Path) -> anyhow::Error {
    match err {
        ExtractionError::UnsafePath { entry } => {
            anyhow!(
                "Security violation: Archive '{}' contains an entry outside the target directory: '{}'\n\
                 HINT: This archive may be malicious. Do not extract from untrusted sources.",
                archive.display(),
                entry.display()
            )
        }
        ExtractionError::UnsafeSymlinkTarget { entry, target } => {
            anyhow!(
                "Security violation: Link '{}' in '{}' points outside the target directory: '{}'\n\
                 HINT: Use --no-symlinks and --no-hardlinks to refuse links altogether.",
                entry.display(),
                archive.display(),
                target.display()
            )
        }
        ExtractionError::DisallowedEntryKind { entry, kind } => {
            anyhow!(
                "Security violation: Archive '{}' contains a {} entry: '{}'\n\
                 HINT: Special files and refused link kinds are never extracted.",
                archive.display(),
                kind,
                entry.display()
            )
        }
        ExtractionError::QuotaExceeded { resource } => {
            anyhow!(
                "Extraction limit exceeded for '{}': {}\n\
                 HINT: Use --max-files, --max-total-size, or --max-file-size to increase limits.",
                archive.display(),
                resource
            )
        }
        ExtractionError::MalformedArchive { reason, entry } => {
            let at = entry
                .map(|e| format!(" at '{}'", e.display()))
                .unwrap_or_default();
            anyhow!(
                "Invalid archive '{}'{}: {}\n\
                 HINT: Supported formats: tar, tar.gz, tar.bz2, tar.xz, tar.zst",
                archive.display(),
                at,
                reason
            )
        }
        ExtractionError::Io(io_err) => {
            anyhow!(
                "I/O error while processing '{}': {}",
                archive.display(),
                io_err
            )
        }
    }
}

/// Adds context to a generic error about archive operations
pub fn add_archive_context<T>(
    result: Result<T, ExtractionError>,
    archive: &Path,
) -> anyhow::Result<T> {
    result.map_err(|e| convert_extraction_error(e, archive))
}
