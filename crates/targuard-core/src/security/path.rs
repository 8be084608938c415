//! Entry path resolution and containment.

use std::path::Component;
use std::path::Path;

use crate::security::containment::normalize_lexical;
use crate::types::DestDir;
use crate::types::RejectReason;
use crate::types::SafePath;

/// Resolves an entry's declared name against the destination directory.
///
/// The name is rejected if it is empty or absolute (root or drive prefix
/// component). Otherwise `dest/name` is normalized lexically and must stay
/// equal to or below `dest`. This covers leading `../`, embedded `..` that
/// walks out of the tree, and names whose first segment happens to equal the
/// destination's basename but still escape after `..`.
///
/// # Errors
///
/// Returns `RejectReason::UnsafePath` if the name is unsafe.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use targuard_core::RejectReason;
/// use targuard_core::security::resolve_entry_path;
/// use targuard_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/scratch")?;
///
/// assert!(resolve_entry_path(Path::new("good/course.xml"), &dest).is_ok());
/// assert_eq!(
///     resolve_entry_path(Path::new("../etc/passwd"), &dest),
///     Err(RejectReason::UnsafePath)
/// );
/// # Ok(())
/// # }
/// ```
pub fn resolve_entry_path(name: &Path, dest: &DestDir) -> Result<SafePath, RejectReason> {
    if name.as_os_str().is_empty() {
        return Err(RejectReason::UnsafePath);
    }

    if name
        .components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
    {
        return Err(RejectReason::UnsafePath);
    }

    let resolved = normalize_lexical(&dest.as_path().join(name));
    SafePath::contained(resolved, dest).ok_or(RejectReason::UnsafePath)
}

/// Checks that no existing component between `dest` and `path` is a symlink.
///
/// Lexical containment cannot see through links already on disk: writing
/// `a/file` when `a` is a symlink would land wherever `a` points. The final
/// component is included, so an existing symlink is never written through
/// or replaced.
///
/// # Errors
///
/// Returns the I/O error if metadata cannot be read for another reason than
/// absence.
pub fn has_symlink_on_disk(path: &SafePath, dest: &DestDir) -> std::io::Result<bool> {
    let mut current = dest.as_path().to_path_buf();

    for component in path.relative_to(dest).components() {
        current.push(component);
        match std::fs::symlink_metadata(&current) {
            Ok(metadata) if metadata.file_type().is_symlink() => return Ok(true),
            Ok(_) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(false),
            Err(e) => return Err(e),
        }
    }

    Ok(false)
}

/// Returns `true` if `path` itself is a symlink on disk.
///
/// Metadata errors other than absence count as a symlink.
pub(crate) fn is_symlink_on_disk(path: &Path) -> bool {
    match std::fs::symlink_metadata(path) {
        Ok(metadata) => metadata.file_type().is_symlink(),
        Err(e) => e.kind() != std::io::ErrorKind::NotFound,
    }
}
