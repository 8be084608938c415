//! Symlink target validation.

use std::path::Component;
use std::path::Path;

use crate::security::containment::normalize_lexical;
use crate::types::DestDir;
use crate::types::RejectReason;
use crate::types::SafePath;

/// Resolves a symlink target relative to the link's own location.
///
/// A symlink `dir/link -> ../file` points at `dir/../file`, so the target is
/// joined to the link's parent directory and normalized lexically. Empty and
/// absolute targets are refused outright: an absolute target means whatever
/// that path is on the extracting host, never something inside the tree.
///
/// The returned path is where the link points; the link itself still
/// stores the original relative target.
///
/// # Errors
///
/// Returns `RejectReason::UnsafeSymlinkTarget` if the target escapes.
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use targuard_core::RejectReason;
/// use targuard_core::security::resolve_entry_path;
/// use targuard_core::security::resolve_symlink_target;
/// use targuard_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/scratch")?;
/// let link = resolve_entry_path(Path::new("course/link"), &dest)?;
///
/// assert!(resolve_symlink_target(&link, Path::new("../course.xml"), &dest).is_ok());
/// assert_eq!(
///     resolve_symlink_target(&link, Path::new("../../unsafe_file.txt"), &dest),
///     Err(RejectReason::UnsafeSymlinkTarget)
/// );
/// # Ok(())
/// # }
/// ```
pub fn resolve_symlink_target(
    link: &SafePath,
    target: &Path,
    dest: &DestDir,
) -> Result<SafePath, RejectReason> {
    if target.as_os_str().is_empty() || is_absolute_like(target) {
        return Err(RejectReason::UnsafeSymlinkTarget);
    }

    let link_parent = link.as_path().parent().unwrap_or_else(|| dest.as_path());
    let resolved = normalize_lexical(&link_parent.join(target));
    SafePath::contained(resolved, dest).ok_or(RejectReason::UnsafeSymlinkTarget)
}

/// Walks a symlink target from the link's parent one component at a time.
///
/// Lexical resolution treats `l/..` as the directory holding `l`, but the
/// kernel follows `l` first and then takes the parent of wherever it points.
/// Every `..` is therefore rejected when the component it would pop is a
/// symlink according to `is_symlink`. A walk that rises above `dest` is
/// rejected too.
///
/// # Errors
///
/// Returns `RejectReason::UnsafeSymlinkTarget` if a `..` steps back out of a
/// symlink or the walk leaves `dest`.
pub fn walk_symlink_target<F>(
    link: &SafePath,
    target: &Path,
    dest: &DestDir,
    mut is_symlink: F,
) -> Result<(), RejectReason>
where
    F: FnMut(&Path) -> bool,
{
    let root = dest.as_path();
    let mut current = link.as_path().parent().unwrap_or(root).to_path_buf();

    for component in target.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if current == root || is_symlink(&current) {
                    return Err(RejectReason::UnsafeSymlinkTarget);
                }
                current.pop();
            }
            Component::Normal(part) => current.push(part),
            Component::RootDir | Component::Prefix(_) => {
                return Err(RejectReason::UnsafeSymlinkTarget);
            }
        }
    }

    Ok(())
}

/// Returns `true` if the path has a root or drive-prefix component.
pub(crate) fn is_absolute_like(path: &Path) -> bool {
    path.components()
        .any(|c| matches!(c, Component::RootDir | Component::Prefix(_)))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::security::path::resolve_entry_path;
    use tempfile::TempDir;

    fn create_test_dest() -> (TempDir, DestDir) {
        let temp = TempDir::new().expect("failed to create temp dir");
        let dest = DestDir::new(temp.path().to_path_buf()).expect("failed to create dest");
        (temp, dest)
    }

    #[test]
    fn test_walk_plain_directories() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("a/b/link"), &dest).unwrap();
        let result = walk_symlink_target(&link, Path::new("../c/./d"), &dest, |_| false);
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_walk_rejects_parent_of_symlink() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("m"), &dest).unwrap();
        let l = dest.as_path().join("l");

        let result = walk_symlink_target(&link, Path::new("l/../secret.txt"), &dest, |p| {
            p == l.as_path()
        });
        assert_eq!(result, Err(RejectReason::UnsafeSymlinkTarget));

        // Going through the symlink without climbing back out is fine.
        let result = walk_symlink_target(&link, Path::new("l/course.xml"), &dest, |p| {
            p == l.as_path()
        });
        assert_eq!(result, Ok(()));
    }

    #[test]
    fn test_walk_rejects_rising_above_root() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("a/link"), &dest).unwrap();
        let result = walk_symlink_target(&link, Path::new("b/../../../x"), &dest, |_| false);
        assert_eq!(result, Err(RejectReason::UnsafeSymlinkTarget));
    }

    #[test]
    fn test_symlink_sibling_target() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("link"), &dest).unwrap();
        let resolved = resolve_symlink_target(&link, Path::new("target.txt"), &dest).unwrap();
        assert_eq!(resolved.as_path(), dest.as_path().join("target.txt"));
    }

    #[test]
    fn test_symlink_relative_safe() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("foo/link"), &dest).unwrap();
        let resolved =
            resolve_symlink_target(&link, Path::new("../bar/target.txt"), &dest).unwrap();
        assert_eq!(resolved.relative_to(&dest), Path::new("bar/target.txt"));
    }

    #[test]
    fn test_symlink_to_root_is_contained() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("foo/up"), &dest).unwrap();
        let resolved = resolve_symlink_target(&link, Path::new(".."), &dest).unwrap();
        assert!(resolved.is_root(&dest));
    }

    #[test]
    fn test_symlink_escape() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("symlink.txt"), &dest).unwrap();
        assert_eq!(
            resolve_symlink_target(&link, Path::new("../unsafe_file.txt"), &dest),
            Err(RejectReason::UnsafeSymlinkTarget)
        );
    }

    #[test]
    fn test_symlink_escape_from_nested_link() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("a/b/link"), &dest).unwrap();
        assert_eq!(
            resolve_symlink_target(&link, Path::new("../../../etc/passwd"), &dest),
            Err(RejectReason::UnsafeSymlinkTarget)
        );
    }

    #[test]
    fn test_symlink_absolute_target() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("link"), &dest).unwrap();
        assert_eq!(
            resolve_symlink_target(&link, Path::new("/etc/passwd"), &dest),
            Err(RejectReason::UnsafeSymlinkTarget)
        );

        let inside = dest.as_path().join("file.txt");
        assert_eq!(
            resolve_symlink_target(&link, &inside, &dest),
            Err(RejectReason::UnsafeSymlinkTarget)
        );
    }

    #[test]
    fn test_symlink_empty_target() {
        let (_temp, dest) = create_test_dest();
        let link = resolve_entry_path(Path::new("link"), &dest).unwrap();
        assert_eq!(
            resolve_symlink_target(&link, Path::new(""), &dest),
            Err(RejectReason::UnsafeSymlinkTarget)
        );
    }
}
