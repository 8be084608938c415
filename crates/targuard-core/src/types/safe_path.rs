//! Validated safe path type for archive extraction.

use std::path::Path;
use std::path::PathBuf;

use super::DestDir;
use crate::security::containment::is_within;

/// An absolute path proven to lie within a destination directory.
///
/// # Security Properties
///
/// - Can only be constructed through validation
/// - No `From<PathBuf>` implementation
/// - Already normalized: contains no `.` or `..` components
///
/// # Examples
///
/// ```no_run
/// use std::path::Path;
/// use targuard_core::security::resolve_entry_path;
/// use targuard_core::types::DestDir;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dest = DestDir::new("/tmp/scratch")?;
/// let safe = resolve_entry_path(Path::new("course/../course.xml"), &dest)?;
/// assert_eq!(safe.as_path(), dest.as_path().join("course.xml"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SafePath(PathBuf);

impl SafePath {
    /// Wraps an already-normalized absolute path if it lies within `dest`.
    ///
    /// Returns `None` when `resolved` is outside the destination.
    pub(crate) fn contained(resolved: PathBuf, dest: &DestDir) -> Option<Self> {
        is_within(dest.as_path(), &resolved).then_some(Self(resolved))
    }

    /// Returns the absolute path as a `&Path`.
    #[inline]
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    /// Returns the path relative to the destination directory.
    ///
    /// The destination itself yields an empty path.
    #[must_use]
    pub fn relative_to<'a>(&'a self, dest: &DestDir) -> &'a Path {
        self.0.strip_prefix(dest.as_path()).unwrap_or(&self.0)
    }

    /// Returns `true` if this path is the destination directory itself.
    #[must_use]
    pub fn is_root(&self, dest: &DestDir) -> bool {
        self.0 == dest.as_path()
    }

    /// Converts into the inner `PathBuf`.
    #[inline]
    #[must_use]
    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }
}
