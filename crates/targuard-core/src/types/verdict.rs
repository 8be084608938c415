//! Per-entry validation verdicts.

use std::fmt;

/// Why an entry was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RejectReason {
    /// Entry path is absolute or resolves outside the target directory.
    UnsafePath,
    /// Link target resolves outside the target directory.
    UnsafeSymlinkTarget,
    /// Entry is a FIFO, device node, other special file, or a link kind the
    /// configuration refuses.
    DisallowedEntryKind,
}

impl RejectReason {
    /// Stable identifier used in reports and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnsafePath => "unsafe-absolute-or-traversal-path",
            Self::UnsafeSymlinkTarget => "unsafe-symlink-target",
            Self::DisallowedEntryKind => "disallowed-entry-kind",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for RejectReason {}

/// Outcome of validating a single entry.
///
/// # Examples
///
/// ```
/// use targuard_core::RejectReason;
/// use targuard_core::Verdict;
///
/// let verdict = Verdict::Rejected(RejectReason::UnsafePath);
/// assert!(!verdict.is_accepted());
/// assert_eq!(verdict.reason(), Some(RejectReason::UnsafePath));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Entry may be extracted.
    Accepted,
    /// Entry must not be extracted.
    Rejected(RejectReason),
}

impl Verdict {
    /// Returns `true` for `Accepted`.
    #[must_use]
    pub const fn is_accepted(self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Returns the rejection reason, if any.
    #[must_use]
    pub const fn reason(self) -> Option<RejectReason> {
        match self {
            Self::Accepted => None,
            Self::Rejected(reason) => Some(reason),
        }
    }
}

impl<T> From<Result<T, RejectReason>> for Verdict {
    fn from(result: Result<T, RejectReason>) -> Self {
        match result {
            Ok(_) => Self::Accepted,
            Err(reason) => Self::Rejected(reason),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accepted => f.write_str("accepted"),
            Self::Rejected(reason) => write!(f, "rejected({reason})"),
        }
    }
}
