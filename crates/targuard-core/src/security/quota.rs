//! Extraction quota tracking and validation.

use crate::ExtractionError;
use crate::QuotaResource;
use crate::Result;
use crate::SecurityConfig;

/// Tracks resource usage during extraction.
///
/// Only regular files count against the quotas; directories and links carry
/// no content.
#[derive(Debug, Default)]
pub struct QuotaTracker {
    files_extracted: usize,
    bytes_written: u64,
}

impl QuotaTracker {
    /// Creates a new quota tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a regular file of the declared size.
    ///
    /// The counters are only updated when every quota holds, so a failed
    /// call leaves the tracker unchanged.
    ///
    /// # Errors
    ///
    /// Returns `ExtractionError::QuotaExceeded` if the file is too large, or
    /// if the file count or total size would exceed the configured limits.
    pub fn record_file(&mut self, size: u64, config: &SecurityConfig) -> Result<()> {
        if size > config.max_file_size {
            return Err(ExtractionError::QuotaExceeded {
                resource: QuotaResource::FileSize {
                    size,
                    max: config.max_file_size,
                },
            });
        }

        let files = self
            .files_extracted
            .checked_add(1)
            .ok_or(ExtractionError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;
        if files > config.max_file_count {
            return Err(ExtractionError::QuotaExceeded {
                resource: QuotaResource::FileCount {
                    current: files,
                    max: config.max_file_count,
                },
            });
        }

        let bytes = self
            .bytes_written
            .checked_add(size)
            .ok_or(ExtractionError::QuotaExceeded {
                resource: QuotaResource::IntegerOverflow,
            })?;
        if bytes > config.max_total_size {
            return Err(ExtractionError::QuotaExceeded {
                resource: QuotaResource::TotalSize {
                    current: bytes,
                    max: config.max_total_size,
                },
            });
        }

        self.files_extracted = files;
        self.bytes_written = bytes;
        Ok(())
    }

    /// Returns the number of files recorded.
    #[must_use]
    pub fn files_extracted(&self) -> usize {
        self.files_extracted
    }

    /// Returns the total declared bytes recorded.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }
}
