//! Security configuration for archive extraction.

/// Security configuration for archive extraction.
///
/// Path containment and the entry-kind allowlist are always enforced and
/// cannot be configured away. This struct only controls whether contained
/// links are extracted, resource quotas, and permission handling.
///
/// # Examples
///
/// ```
/// use targuard_core::SecurityConfig;
///
/// // Links are extracted when their targets stay inside the tree
/// let config = SecurityConfig::default();
///
/// // Refuse links altogether and cap the upload size
/// let strict = SecurityConfig {
///     max_total_size: 100 * 1024 * 1024,
///     ..SecurityConfig::strict()
/// };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecurityConfig {
    /// Maximum size for a single file in bytes.
    pub max_file_size: u64,

    /// Maximum total size for all extracted files in bytes.
    pub max_total_size: u64,

    /// Maximum number of regular files that can be extracted.
    pub max_file_count: usize,

    /// Extract symbolic links whose targets stay inside the target directory.
    pub allow_symlinks: bool,

    /// Extract hard links whose targets stay inside the target directory.
    pub allow_hardlinks: bool,

    /// Apply file modes from the archive (special and world-writable bits
    /// are always stripped).
    pub preserve_permissions: bool,
}

impl Default for SecurityConfig {
    /// Creates a `SecurityConfig` with default settings.
    ///
    /// Default values:
    /// - `max_file_size`: 1 GB
    /// - `max_total_size`: 4 GB
    /// - `max_file_count`: 100,000
    /// - `allow_symlinks`: true (contained targets only)
    /// - `allow_hardlinks`: true (contained targets only)
    /// - `preserve_permissions`: false
    fn default() -> Self {
        Self {
            max_file_size: 1024 * 1024 * 1024,      // 1 GB
            max_total_size: 4 * 1024 * 1024 * 1024, // 4 GB
            max_file_count: 100_000,
            allow_symlinks: true,
            allow_hardlinks: true,
            preserve_permissions: false,
        }
    }
}

impl SecurityConfig {
    /// Creates a configuration that refuses every link entry.
    ///
    /// Links are then reported as `DisallowedEntryKind`, whatever their
    /// target.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_symlinks: false,
            allow_hardlinks: false,
            ..Default::default()
        }
    }
}
