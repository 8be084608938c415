//! Inspection report types.

use crate::formats::CompressionCodec;
use crate::types::ArchiveEntry;
use crate::types::RejectReason;
use crate::types::Verdict;

/// One archive entry together with its verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InspectedEntry {
    /// Header fields as declared in the archive.
    pub entry: ArchiveEntry,

    /// What extraction would decide for this entry.
    pub verdict: Verdict,
}

/// Result of inspecting an archive without extracting it.
///
/// Unlike extraction, inspection does not stop at the first rejection, so
/// this lists every problem in the archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InspectionReport {
    /// Codec detected on the input stream (`None` for plain tar).
    pub codec: Option<CompressionCodec>,

    /// Every entry, in archive order.
    pub entries: Vec<InspectedEntry>,

    /// Sum of the declared sizes of all entries.
    pub total_size: u64,
}

impl InspectionReport {
    /// Returns the number of entries.
    #[must_use]
    pub fn total_entries(&self) -> usize {
        self.entries.len()
    }

    /// Returns the rejected entries, in archive order.
    pub fn rejected(&self) -> impl Iterator<Item = &InspectedEntry> {
        self.entries.iter().filter(|e| !e.verdict.is_accepted())
    }

    /// Returns the number of rejected entries.
    #[must_use]
    pub fn rejected_count(&self) -> usize {
        self.rejected().count()
    }

    /// Returns `true` if extraction would accept every entry.
    ///
    /// Quotas are not part of the verdict.
    #[must_use]
    pub fn is_safe(&self) -> bool {
        self.rejected().next().is_none()
    }

    /// Returns the first rejected entry and its reason, which is what
    /// extraction would fail with.
    #[must_use]
    pub fn first_rejection(&self) -> Option<(&ArchiveEntry, RejectReason)> {
        self.entries
            .iter()
            .find_map(|e| e.verdict.reason().map(|reason| (&e.entry, reason)))
    }
}
