//! Hardlink target validation.

use std::path::Path;

use crate::security::containment::normalize_lexical;
use crate::security::symlink::is_absolute_like;
use crate::types::DestDir;
use crate::types::RejectReason;
use crate::types::SafePath;

/// Resolves a hardlink target against the destination directory.
///
/// Tar stores hardlink targets as archive member names, so unlike symlinks
/// they are relative to the archive root rather than to the link. A target
/// naming the destination itself is refused too, since a directory can never
/// be hard linked.
///
/// # Errors
///
/// Returns `RejectReason::UnsafeSymlinkTarget` if the target is empty,
/// absolute, or escapes the destination.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use targuard_core::RejectReason;
/// use targuard_core::security::resolve_hardlink_target;
/// use targuard_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/scratch")?;
///
/// assert!(resolve_hardlink_target(Path::new("course/course.xml"), &dest).is_ok());
/// assert_eq!(
///     resolve_hardlink_target(Path::new("../etc/shadow"), &dest),
///     Err(RejectReason::UnsafeSymlinkTarget)
/// );
/// # Ok(())
/// # }
/// ```
pub fn resolve_hardlink_target(target: &Path, dest: &DestDir) -> Result<SafePath, RejectReason> {
    if target.as_os_str().is_empty() || is_absolute_like(target) {
        return Err(RejectReason::UnsafeSymlinkTarget);
    }

    let resolved = normalize_lexical(&dest.as_path().join(target));
    SafePath::contained(resolved, dest)
        .filter(|safe| !safe.is_root(dest))
        .ok_or(RejectReason::UnsafeSymlinkTarget)
}
