//! Error types for archive extraction operations.

use std::path::Path;
use std::path::PathBuf;
use thiserror::Error;

use crate::types::EntryKind;
use crate::types::RejectReason;

/// Result type alias using `ExtractionError`.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Represents a specific quota resource that was exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuotaResource {
    /// File count quota exceeded.
    FileCount {
        /// Current file count.
        current: usize,
        /// Maximum allowed file count.
        max: usize,
    },
    /// Total size quota exceeded.
    TotalSize {
        /// Current total size in bytes.
        current: u64,
        /// Maximum allowed total size in bytes.
        max: u64,
    },
    /// Single file size quota exceeded.
    FileSize {
        /// File size in bytes.
        size: u64,
        /// Maximum allowed file size in bytes.
        max: u64,
    },
    /// Integer overflow detected in quota tracking.
    IntegerOverflow,
}

impl std::fmt::Display for QuotaResource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileCount { current, max } => {
                write!(f, "quota exceeded: file count ({current} > {max})")
            }
            Self::TotalSize { current, max } => {
                write!(f, "quota exceeded: total size ({current} > {max})")
            }
            Self::FileSize { size, max } => {
                write!(f, "quota exceeded: single file size ({size} > {max})")
            }
            Self::IntegerOverflow => {
                write!(f, "quota exceeded: integer overflow in quota tracking")
            }
        }
    }
}

/// Errors that can occur during archive extraction.
///
/// Extraction fails closed: the first error aborts the whole operation and
/// identifies the offending entry where one is known.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Filesystem operation on the extraction side failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The stream could not be decoded as a compressed tar container.
    #[error("malformed archive: {reason}")]
    MalformedArchive {
        /// What went wrong while decoding.
        reason: String,
        /// Entry being read when the failure occurred, if any.
        entry: Option<PathBuf>,
    },

    /// Entry path is absolute or resolves outside the target directory.
    #[error("unsafe entry path (absolute or traversal): {}", entry.display())]
    UnsafePath {
        /// Declared entry name.
        entry: PathBuf,
    },

    /// Link entry whose target resolves outside the target directory.
    #[error("link target escapes extraction directory: {} -> {}", entry.display(), target.display())]
    UnsafeSymlinkTarget {
        /// Declared entry name of the link.
        entry: PathBuf,
        /// Declared link target.
        target: PathBuf,
    },

    /// Entry is a FIFO, device node, or another kind that is never extracted.
    #[error("disallowed entry kind {kind}: {}", entry.display())]
    DisallowedEntryKind {
        /// Declared entry name.
        entry: PathBuf,
        /// Kind read from the entry header.
        kind: EntryKind,
    },

    /// Extraction quota exceeded.
    #[error("{resource}")]
    QuotaExceeded {
        /// Description of the exceeded resource.
        resource: QuotaResource,
    },
}

impl ExtractionError {
    /// Builds the error that corresponds to a rejected entry.
    #[must_use]
    pub fn from_rejection(
        reason: RejectReason,
        entry: &Path,
        kind: EntryKind,
        link_target: Option<&Path>,
    ) -> Self {
        match reason {
            RejectReason::UnsafePath => Self::UnsafePath {
                entry: entry.to_path_buf(),
            },
            RejectReason::UnsafeSymlinkTarget => Self::UnsafeSymlinkTarget {
                entry: entry.to_path_buf(),
                target: link_target.map(Path::to_path_buf).unwrap_or_default(),
            },
            RejectReason::DisallowedEntryKind => Self::DisallowedEntryKind {
                entry: entry.to_path_buf(),
                kind,
            },
        }
    }

    /// Creates a `MalformedArchive` error from a stream-side failure.
    pub(crate) fn malformed(err: &std::io::Error, entry: Option<&Path>) -> Self {
        Self::MalformedArchive {
            reason: err.to_string(),
            entry: entry.map(Path::to_path_buf),
        }
    }

    /// Returns the rejection reason if this error is one of the three
    /// per-entry rejection kinds.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use targuard_core::ExtractionError;
    /// use targuard_core::RejectReason;
    ///
    /// let err = ExtractionError::UnsafePath {
    ///     entry: PathBuf::from("../etc/passwd"),
    /// };
    /// assert_eq!(err.rejection_reason(), Some(RejectReason::UnsafePath));
    /// ```
    #[must_use]
    pub const fn rejection_reason(&self) -> Option<RejectReason> {
        match self {
            Self::UnsafePath { .. } => Some(RejectReason::UnsafePath),
            Self::UnsafeSymlinkTarget { .. } => Some(RejectReason::UnsafeSymlinkTarget),
            Self::DisallowedEntryKind { .. } => Some(RejectReason::DisallowedEntryKind),
            _ => None,
        }
    }

    /// Returns the name of the offending entry, if known.
    #[must_use]
    pub fn entry_name(&self) -> Option<&Path> {
        match self {
            Self::UnsafePath { entry }
            | Self::UnsafeSymlinkTarget { entry, .. }
            | Self::DisallowedEntryKind { entry, .. } => Some(entry),
            Self::MalformedArchive { entry, .. } => entry.as_deref(),
            _ => None,
        }
    }

    /// Returns `true` if this error represents a security violation.
    ///
    /// Security violations are the path-safety rejections and exceeded
    /// quotas. Malformed archives and I/O failures are not.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use targuard_core::ExtractionError;
    ///
    /// let err = ExtractionError::UnsafePath {
    ///     entry: PathBuf::from("/etc/passwd"),
    /// };
    /// assert!(err.is_security_violation());
    ///
    /// let err = ExtractionError::MalformedArchive {
    ///     reason: "unexpected end of file".into(),
    ///     entry: None,
    /// };
    /// assert!(!err.is_security_violation());
    /// ```
    #[must_use]
    pub const fn is_security_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsafePath { .. }
                | Self::UnsafeSymlinkTarget { .. }
                | Self::DisallowedEntryKind { .. }
                | Self::QuotaExceeded { .. }
        )
    }

    /// Returns the quota resource that was exceeded, if applicable.
    #[must_use]
    pub const fn quota_resource(&self) -> Option<&QuotaResource> {
        match self {
            Self::QuotaExceeded { resource } => Some(resource),
            _ => None,
        }
    }
}
