//! Lexical path normalization and the containment predicate.
//!
//! Every path check in the crate reduces to the two functions here. They
//! never touch the filesystem: archive entries are checked before anything
//! they name exists.

use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Collapses `.` and `..` components the way a path resolver would.
///
/// `..` removes the previous normal component; at the root it is a no-op
/// (`/..` is `/`). For relative inputs a leading `..` that has nothing to
/// remove is kept, so the result still shows the escape.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use targuard_core::security::containment::normalize_lexical;
///
/// assert_eq!(normalize_lexical(Path::new("/a/./b/../c")), Path::new("/a/c"));
/// assert_eq!(normalize_lexical(Path::new("/../etc")), Path::new("/etc"));
/// assert_eq!(normalize_lexical(Path::new("a/../../b")), Path::new("../b"));
/// ```
#[must_use]
pub fn normalize_lexical(path: &Path) -> PathBuf {
    let mut components: Vec<Component<'_>> = Vec::with_capacity(path.components().count());

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                Some(Component::ParentDir | Component::CurDir) | None => {
                    components.push(component);
                }
            },
            Component::Normal(_) | Component::RootDir | Component::Prefix(_) => {
                components.push(component);
            }
        }
    }

    components.iter().collect()
}

/// Returns `true` if `candidate` equals `root` or is a descendant of it.
///
/// Both paths must already be normalized. Comparison is by component, so
/// `/srv/foo2` is not inside `/srv/foo`.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use targuard_core::security::containment::is_within;
///
/// let root = Path::new("/srv/foo");
/// assert!(is_within(root, Path::new("/srv/foo")));
/// assert!(is_within(root, Path::new("/srv/foo/bar")));
/// assert!(!is_within(root, Path::new("/srv/foo2")));
/// assert!(!is_within(root, Path::new("/srv")));
/// ```
#[must_use]
pub fn is_within(root: &Path, candidate: &Path) -> bool {
    candidate.starts_with(root)
}
