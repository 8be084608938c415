//! File permission sanitization.

/// Setuid, setgid and sticky bits.
const SPECIAL_BITS: u32 = 0o7000;

/// Write permission for "other".
const WORLD_WRITABLE: u32 = 0o002;

/// Strips dangerous bits from a mode read from an archive header.
///
/// Setuid, setgid and sticky bits are removed along with world write
/// permission; anything above the permission bits (file type nibble) is
/// dropped as well.
///
/// # Examples
///
/// ```
/// use targuard_core::security::sanitize_permissions;
///
/// assert_eq!(sanitize_permissions(0o4755), 0o755);
/// assert_eq!(sanitize_permissions(0o666), 0o664);
/// assert_eq!(sanitize_permissions(0o100_644), 0o644);
/// ```
#[must_use]
pub const fn sanitize_permissions(mode: u32) -> u32 {
    mode & 0o7777 & !SPECIAL_BITS & !WORLD_WRITABLE
}
