//! Security validation modules.

pub mod containment;
pub mod hardlink;
pub mod path;
pub mod permissions;
pub mod quota;
pub mod symlink;
pub mod validator;

// Re-export public types and functions
pub use hardlink::resolve_hardlink_target;
pub use path::has_symlink_on_disk;
pub use path::resolve_entry_path;
pub use permissions::sanitize_permissions;
pub use quota::QuotaTracker;
pub use symlink::resolve_symlink_target;
pub use symlink::walk_symlink_target;
pub use validator::EntryValidator;
pub use validator::ValidatedEntry;
pub use validator::ValidatedEntryType;
