//! Archive entry record read from a tar header.

use std::path::Path;
use std::path::PathBuf;

use super::EntryKind;

/// One item of an archive, as declared by its header.
///
/// Nothing in this record has been validated: `name` may be absolute or
/// contain `..` segments, and `link_target` may point anywhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Declared path, as stored in the archive.
    pub name: PathBuf,

    /// Entry kind from the header type flag.
    pub kind: EntryKind,

    /// Declared link target; present only for symbolic and hard links.
    pub link_target: Option<PathBuf>,

    /// Declared content size in bytes.
    pub size: u64,

    /// Declared permission bits, if readable.
    pub mode: Option<u32>,
}

impl ArchiveEntry {
    /// Creates an entry with no link target, size or mode.
    #[must_use]
    pub fn new(name: impl Into<PathBuf>, kind: EntryKind) -> Self {
        Self {
            name: name.into(),
            kind,
            link_target: None,
            size: 0,
            mode: None,
        }
    }

    /// Creates a symbolic link entry.
    #[must_use]
    pub fn symlink(name: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            link_target: Some(target.into()),
            ..Self::new(name, EntryKind::SymbolicLink)
        }
    }

    /// Creates a hard link entry.
    #[must_use]
    pub fn hardlink(name: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            link_target: Some(target.into()),
            ..Self::new(name, EntryKind::HardLink)
        }
    }

    /// Sets the declared content size.
    #[must_use]
    pub fn with_size(mut self, size: u64) -> Self {
        self.size = size;
        self
    }

    /// Sets the declared permission bits.
    #[must_use]
    pub fn with_mode(mut self, mode: u32) -> Self {
        self.mode = Some(mode);
        self
    }

    /// Reads the header fields of a tar entry.
    ///
    /// Only link kinds carry a link target, even if another header type has a
    /// non-empty link name field.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if the name or link name cannot be
    /// decoded (e.g. a corrupt PAX record).
    pub fn from_tar<R: std::io::Read>(entry: &tar::Entry<'_, R>) -> std::io::Result<Self> {
        let header = entry.header();
        let kind = EntryKind::from(header.entry_type());
        let name = entry.path()?.into_owned();
        let link_target = if kind.is_link() {
            entry.link_name()?.map(std::borrow::Cow::into_owned)
        } else {
            None
        };

        Ok(Self {
            name,
            kind,
            link_target,
            size: entry.size(),
            mode: header.mode().ok(),
        })
    }

    /// Returns the link target as a path, if any.
    #[must_use]
    pub fn link_target(&self) -> Option<&Path> {
        self.link_target.as_deref()
    }
}
