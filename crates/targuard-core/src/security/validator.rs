//! Entry validation orchestrator.
//!
//! This module provides the main `EntryValidator` type that classifies each
//! archive entry and decides whether it may be written.

use std::collections::HashSet;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::Result;
use crate::SecurityConfig;
use crate::security::hardlink::resolve_hardlink_target;
use crate::security::path::has_symlink_on_disk;
use crate::security::path::is_symlink_on_disk;
use crate::security::path::resolve_entry_path;
use crate::security::permissions::sanitize_permissions;
use crate::security::quota::QuotaTracker;
use crate::security::symlink::resolve_symlink_target;
use crate::security::symlink::walk_symlink_target;
use crate::types::ArchiveEntry;
use crate::types::DestDir;
use crate::types::EntryKind;
use crate::types::RejectReason;
use crate::types::SafePath;
use crate::types::Verdict;

/// Result of entry validation.
///
/// Contains validated and sanitized entry information ready for extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedEntry {
    /// Validated path within destination directory
    pub safe_path: SafePath,

    /// Validated entry type
    pub entry_type: ValidatedEntryType,

    /// Sanitized file permissions (regular files only)
    pub mode: Option<u32>,
}

/// Validated entry type variants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedEntryType {
    /// Regular file
    File,

    /// Directory
    Directory,

    /// Symlink whose target was proven to stay inside the destination
    Symlink {
        /// Target as declared, written verbatim into the link
        target: PathBuf,
    },

    /// Hardlink to an earlier entry
    Hardlink {
        /// Resolved link source inside the destination
        target: SafePath,
    },
}

/// Orchestrates security validation for archive entries.
///
/// This type maintains state across entry validations:
/// - Quota tracking (file count, total size)
/// - The set of symlinks accepted so far, so later entries cannot be
///   written through them
///
/// # Lifecycle
///
/// 1. Create with `EntryValidator::new(&config, &dest)`
/// 2. For each entry, in archive order, call `validate_entry()` and write
///    the entry before validating the next one
///
/// # Examples
///
/// ```no_run
/// use targuard_core::ArchiveEntry;
/// use targuard_core::EntryKind;
/// use targuard_core::SecurityConfig;
/// use targuard_core::security::EntryValidator;
/// use targuard_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/scratch")?;
/// let config = SecurityConfig::default();
/// let mut validator = EntryValidator::new(&config, &dest);
///
/// let entry = ArchiveEntry::new("good/course.xml", EntryKind::RegularFile).with_size(1024);
/// let validated = validator.validate_entry(&entry)?;
/// println!("writing {}", validated.safe_path.as_path().display());
/// # Ok(())
/// # }
/// ```
pub struct EntryValidator<'a> {
    config: &'a SecurityConfig,
    dest: &'a DestDir,
    quota_tracker: QuotaTracker,
    symlinks: HashSet<PathBuf>,
}

impl<'a> EntryValidator<'a> {
    /// Creates a new entry validator with the given security configuration.
    #[must_use]
    pub fn new(config: &'a SecurityConfig, dest: &'a DestDir) -> Self {
        Self {
            config,
            dest,
            quota_tracker: QuotaTracker::new(),
            symlinks: HashSet::new(),
        }
    }

    /// Validates an archive entry, including quotas.
    ///
    /// Checks run in this order:
    /// 1. Path resolution and containment
    /// 2. Entry kind allowlist, link targets
    /// 3. Symlinks already on disk along the entry's path
    /// 4. Quotas (regular files only)
    ///
    /// Quota usage and accepted symlinks are recorded only once every check
    /// has passed.
    ///
    /// # Errors
    ///
    /// Returns `UnsafePath`, `UnsafeSymlinkTarget` or `DisallowedEntryKind`
    /// for a rejected entry, and `QuotaExceeded` when a limit is hit.
    pub fn validate_entry(&mut self, entry: &ArchiveEntry) -> Result<ValidatedEntry> {
        let validated = self.check(entry).map_err(|reason| {
            ExtractionError::from_rejection(reason, &entry.name, entry.kind, entry.link_target())
        })?;

        if has_symlink_on_disk(&validated.safe_path, self.dest)? {
            return Err(ExtractionError::UnsafePath {
                entry: entry.name.clone(),
            });
        }

        if matches!(validated.entry_type, ValidatedEntryType::File) {
            self.quota_tracker.record_file(entry.size, self.config)?;
        }

        self.commit(&validated);
        Ok(validated)
    }

    /// Returns the verdict for an entry without applying quotas.
    ///
    /// Accepted symlinks are still remembered, so a sequence of calls gives
    /// the same verdicts extraction would.
    pub fn verdict(&mut self, entry: &ArchiveEntry) -> Verdict {
        match self.check(entry) {
            Ok(validated) => {
                self.commit(&validated);
                Verdict::Accepted
            }
            Err(reason) => Verdict::Rejected(reason),
        }
    }

    /// Returns the quota usage recorded so far.
    #[must_use]
    pub fn quota(&self) -> &QuotaTracker {
        &self.quota_tracker
    }

    fn check(&self, entry: &ArchiveEntry) -> std::result::Result<ValidatedEntry, RejectReason> {
        let safe_path = resolve_entry_path(&entry.name, self.dest)?;

        if safe_path.is_root(self.dest) && entry.kind != EntryKind::Directory {
            return Err(RejectReason::UnsafePath);
        }

        if self.passes_through_symlink(&safe_path) {
            return Err(RejectReason::UnsafePath);
        }

        let (entry_type, mode) = match entry.kind {
            EntryKind::RegularFile => {
                let mode = entry
                    .mode
                    .filter(|_| self.config.preserve_permissions)
                    .map(sanitize_permissions);
                (ValidatedEntryType::File, mode)
            }

            EntryKind::Directory => (ValidatedEntryType::Directory, None),

            EntryKind::SymbolicLink => {
                if !self.config.allow_symlinks {
                    return Err(RejectReason::DisallowedEntryKind);
                }
                let target = entry
                    .link_target()
                    .ok_or(RejectReason::UnsafeSymlinkTarget)?;
                resolve_symlink_target(&safe_path, target, self.dest)?;
                walk_symlink_target(&safe_path, target, self.dest, |p| {
                    self.symlinks.contains(p) || is_symlink_on_disk(p)
                })?;
                (
                    ValidatedEntryType::Symlink {
                        target: target.to_path_buf(),
                    },
                    None,
                )
            }

            EntryKind::HardLink => {
                if !self.config.allow_hardlinks {
                    return Err(RejectReason::DisallowedEntryKind);
                }
                let target = entry
                    .link_target()
                    .ok_or(RejectReason::UnsafeSymlinkTarget)?;
                let source = resolve_hardlink_target(target, self.dest)?;
                // Linking a symlink copies its relative target to a new
                // location, where it may resolve elsewhere.
                if self.passes_through_symlink(&source) {
                    return Err(RejectReason::UnsafeSymlinkTarget);
                }
                (ValidatedEntryType::Hardlink { target: source }, None)
            }

            EntryKind::Fifo
            | EntryKind::CharacterDevice
            | EntryKind::BlockDevice
            | EntryKind::Other => return Err(RejectReason::DisallowedEntryKind),
        };

        Ok(ValidatedEntry {
            safe_path,
            entry_type,
            mode,
        })
    }

    fn commit(&mut self, validated: &ValidatedEntry) {
        if matches!(validated.entry_type, ValidatedEntryType::Symlink { .. }) {
            self.symlinks
                .insert(validated.safe_path.as_path().to_path_buf());
        }
    }

    /// Returns `true` if the path or one of its ancestors is an accepted
    /// symlink.
    fn passes_through_symlink(&self, path: &SafePath) -> bool {
        !self.symlinks.is_empty()
            && path
                .as_path()
                .ancestors()
                .take_while(|p| p.starts_with(self.dest.as_path()))
                .any(|p| self.symlinks.contains(p))
    }
}
