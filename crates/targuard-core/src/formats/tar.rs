//! Streaming tar extraction.
//!
//! Entries are processed strictly in archive order. For each one the header
//! is read, the entry is validated, the filesystem is checked for symlinks
//! along the resolved path, and only then is anything written. The first
//! failure aborts the whole extraction; entries written before it stay on
//! disk.

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use log::debug;
use log::info;
use log::warn;

use super::common;
use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;
use crate::copy::CopyBuffer;
use crate::security::EntryValidator;
use crate::security::ValidatedEntryType;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::Verdict;

/// Extracts an uncompressed tar stream into `dest`.
///
/// # Errors
///
/// Returns the first rejection, quota violation, stream decoding failure or
/// filesystem error encountered.
pub fn extract_tar<R: Read>(
    reader: R,
    dest: &DestDir,
    config: &SecurityConfig,
    progress: &mut dyn ProgressCallback,
) -> Result<ExtractionReport> {
    let start = Instant::now();
    let mut report = ExtractionReport::new(dest.as_path());
    let mut validator = EntryValidator::new(config, dest);
    let mut copy_buffer = CopyBuffer::new();

    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| ExtractionError::malformed(&e, None))?;

    let mut index = 0;
    for entry in entries {
        let mut entry = entry.map_err(|e| ExtractionError::malformed(&e, None))?;
        if is_global_header(&entry) {
            continue;
        }
        let declared =
            ArchiveEntry::from_tar(&entry).map_err(|e| ExtractionError::malformed(&e, None))?;

        index += 1;
        progress.on_entry_start(&declared.name, index);
        debug!(
            "entry #{}: {} ({}, {} bytes)",
            index,
            declared.name.display(),
            declared.kind,
            declared.size
        );

        let validated = validator
            .validate_entry(&declared)
            .inspect_err(|err| warn!("rejecting archive: {err}"))?;

        match &validated.entry_type {
            ValidatedEntryType::File => {
                let written = common::extract_file(
                    &mut entry,
                    &validated,
                    &mut report,
                    &mut copy_buffer,
                    &declared.name,
                )?;
                progress.on_bytes_written(written);
            }
            ValidatedEntryType::Directory => {
                common::create_directory(&validated, &mut report)?;
            }
            ValidatedEntryType::Symlink { target } => {
                common::create_symlink(&validated, target, &mut report)?;
            }
            ValidatedEntryType::Hardlink { target } => {
                common::create_hardlink(
                    &validated,
                    target,
                    dest,
                    &mut report,
                    &declared.name,
                    declared.link_target().unwrap_or(Path::new("")),
                )?;
            }
        }

        progress.on_entry_complete(&declared.name);
    }

    report.duration = start.elapsed();
    progress.on_complete();
    info!(
        "extracted {} entries ({} bytes) into {} in {:?}",
        report.total_items(),
        report.bytes_written,
        report.root.display(),
        report.duration
    );

    Ok(report)
}

/// Reads every entry header of an uncompressed tar stream and returns its
/// verdict, without writing anything.
///
/// Entry content is skipped, not buffered. Rejected entries do not stop the
/// walk.
///
/// # Errors
///
/// Returns `MalformedArchive` if the stream cannot be decoded.
pub fn verdicts<R: Read>(
    reader: R,
    dest: &DestDir,
    config: &SecurityConfig,
) -> Result<Vec<(ArchiveEntry, Verdict)>> {
    let mut validator = EntryValidator::new(config, dest);
    let mut results = Vec::new();

    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|e| ExtractionError::malformed(&e, None))?;

    for entry in entries {
        let entry = entry.map_err(|e| ExtractionError::malformed(&e, None))?;
        if is_global_header(&entry) {
            continue;
        }
        let declared =
            ArchiveEntry::from_tar(&entry).map_err(|e| ExtractionError::malformed(&e, None))?;
        let verdict = validator.verdict(&declared);
        debug!("{}: {verdict}", declared.name.display());
        results.push((declared, verdict));
    }

    Ok(results)
}

/// PAX global headers carry archive-wide metadata, not a member.
fn is_global_header<R: Read>(entry: &tar::Entry<'_, R>) -> bool {
    if entry.header().entry_type() == tar::EntryType::XGlobalHeader {
        debug!("skipping pax global header");
        return true;
    }
    false
}
