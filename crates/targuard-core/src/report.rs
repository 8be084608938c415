//! Extraction operation reporting.

use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use crate::formats::compression::CompressionCodec;

/// Report of a successful extraction.
///
/// `root` is the canonical target directory, which is where the archive
/// contents now live.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractionReport {
    /// Canonical directory the archive was extracted into.
    pub root: PathBuf,

    /// Codec detected on the input stream (`None` for plain tar).
    pub codec: Option<CompressionCodec>,

    /// Number of regular files written.
    pub files_extracted: usize,

    /// Number of directory entries processed.
    pub directories_created: usize,

    /// Number of symlinks created.
    pub symlinks_created: usize,

    /// Number of hardlinks created.
    pub hardlinks_created: usize,

    /// Total file content bytes written to disk.
    pub bytes_written: u64,

    /// Duration of the extraction operation.
    pub duration: Duration,
}

impl ExtractionReport {
    /// Creates an empty report for extraction into `root`.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Returns total number of entries written.
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.files_extracted
            + self.directories_created
            + self.symlinks_created
            + self.hardlinks_created
    }
}

/// Callback trait for progress reporting during extraction.
///
/// Archives are read as a stream, so the total entry count is not known up
/// front; `current` is the 1-based index of the entry in archive order.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use targuard_core::ProgressCallback;
///
/// struct PrintProgress;
///
/// impl ProgressCallback for PrintProgress {
///     fn on_entry_start(&mut self, path: &Path, current: usize) {
///         println!("#{current}: {}", path.display());
///     }
///
///     fn on_bytes_written(&mut self, _bytes: u64) {}
///
///     fn on_entry_complete(&mut self, _path: &Path) {}
///
///     fn on_complete(&mut self) {
///         println!("done");
///     }
/// }
/// ```
pub trait ProgressCallback {
    /// Called when an entry header has been read, before validation.
    fn on_entry_start(&mut self, path: &Path, current: usize);

    /// Called after file content has been written.
    fn on_bytes_written(&mut self, bytes: u64);

    /// Called when an entry has been written.
    fn on_entry_complete(&mut self, path: &Path);

    /// Called once after the last entry, only on success.
    fn on_complete(&mut self);
}

/// No-op implementation of `ProgressCallback`.
#[derive(Debug, Default)]
pub struct NoopProgress;

impl ProgressCallback for NoopProgress {
    fn on_entry_start(&mut self, _path: &Path, _current: usize) {}

    fn on_bytes_written(&mut self, _bytes: u64) {}

    fn on_entry_complete(&mut self, _path: &Path) {}

    fn on_complete(&mut self) {}
}
