//! Type-safe wrappers for archive extraction operations.
//!
//! Security-relevant types are validated upon construction and cannot be
//! created from raw types without going through validation:
//!
//! - [`DestDir`] is an existing, writable, canonical directory.
//! - [`SafePath`] is an absolute path proven to lie inside a `DestDir`.
//!
//! There are no `From<PathBuf>` implementations for either.

pub mod archive_entry;
pub mod dest_dir;
pub mod entry_kind;
pub mod safe_path;
pub mod verdict;

pub use archive_entry::ArchiveEntry;
pub use dest_dir::DestDir;
pub use entry_kind::EntryKind;
pub use safe_path::SafePath;
pub use verdict::RejectReason;
pub use verdict::Verdict;
