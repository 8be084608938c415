//! Archive verification without extraction.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::info;

use crate::Result;
use crate::SecurityConfig;
use crate::api::open_stream;
use crate::formats::tar::verdicts;
use crate::inspection::report::InspectedEntry;
use crate::inspection::report::InspectionReport;
use crate::types::DestDir;

/// Computes the verdict of every entry in a (possibly compressed) tar
/// stream without writing anything.
///
/// Paths are resolved against a throw-away empty directory, so verdicts
/// match what extraction into a fresh scratch directory would decide.
/// Rejected entries are reported, not returned as errors.
///
/// # Errors
///
/// Returns `MalformedArchive` if the stream cannot be decoded, or `Io` if
/// the temporary directory cannot be created.
///
/// # Examples
///
/// ```no_run
/// use targuard_core::SecurityConfig;
/// use targuard_core::inspect;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let upload = std::fs::File::open("course.tar.gz")?;
/// let report = inspect(upload, &SecurityConfig::default())?;
///
/// for rejected in report.rejected() {
///     eprintln!("{}: {}", rejected.entry.name.display(), rejected.verdict);
/// }
/// # Ok(())
/// # }
/// ```
pub fn inspect<R: Read>(archive_stream: R, config: &SecurityConfig) -> Result<InspectionReport> {
    let scratch = tempfile::Builder::new()
        .prefix("targuard-inspect-")
        .tempdir()?;
    let dest = DestDir::new(scratch.path())?;

    let (codec, reader) = open_stream(archive_stream)?;
    let entries: Vec<InspectedEntry> = verdicts(reader, &dest, config)?
        .into_iter()
        .map(|(entry, verdict)| InspectedEntry { entry, verdict })
        .collect();

    let total_size = entries
        .iter()
        .fold(0u64, |acc, e| acc.saturating_add(e.entry.size));

    let report = InspectionReport {
        codec,
        entries,
        total_size,
    };
    info!(
        "inspected {} entries, {} rejected",
        report.total_entries(),
        report.rejected_count()
    );
    Ok(report)
}

/// Inspects an archive file.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened, otherwise as [`inspect`].
pub fn inspect_archive<P: AsRef<Path>>(
    archive_path: P,
    config: &SecurityConfig,
) -> Result<InspectionReport> {
    let file = File::open(archive_path.as_ref())?;
    inspect(file, config)
}
