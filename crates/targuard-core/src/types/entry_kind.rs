//! Archive entry kind enumeration.

use std::fmt;

/// Kind of an entry in a tar archive.
///
/// Only `RegularFile` and `Directory` are unconditionally extractable.
/// Links are extractable when their targets stay inside the extraction
/// directory. Everything else is always rejected.
///
/// # Examples
///
/// ```
/// use targuard_core::EntryKind;
///
/// assert_eq!(EntryKind::from(tar::EntryType::Fifo), EntryKind::Fifo);
/// assert!(EntryKind::RegularFile.is_plain());
/// assert!(EntryKind::SymbolicLink.is_link());
/// assert!(EntryKind::CharacterDevice.is_special());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    /// Regular file.
    RegularFile,
    /// Directory.
    Directory,
    /// Symbolic link.
    SymbolicLink,
    /// Hard link.
    HardLink,
    /// Named pipe.
    Fifo,
    /// Character device node.
    CharacterDevice,
    /// Block device node.
    BlockDevice,
    /// Any other header type (sparse files, unknown type flags).
    Other,
}

impl EntryKind {
    /// Returns `true` for regular files and directories.
    #[must_use]
    pub const fn is_plain(self) -> bool {
        matches!(self, Self::RegularFile | Self::Directory)
    }

    /// Returns `true` for symbolic and hard links.
    #[must_use]
    pub const fn is_link(self) -> bool {
        matches!(self, Self::SymbolicLink | Self::HardLink)
    }

    /// Returns `true` for kinds that are never extracted.
    #[must_use]
    pub const fn is_special(self) -> bool {
        !self.is_plain() && !self.is_link()
    }

    /// Short lowercase name used in messages and reports.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::RegularFile => "file",
            Self::Directory => "directory",
            Self::SymbolicLink => "symlink",
            Self::HardLink => "hardlink",
            Self::Fifo => "fifo",
            Self::CharacterDevice => "character-device",
            Self::BlockDevice => "block-device",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<tar::EntryType> for EntryKind {
    fn from(entry_type: tar::EntryType) -> Self {
        match entry_type {
            // Contiguous files are regular files to every reader but a few
            // historical tape systems.
            tar::EntryType::Regular | tar::EntryType::Continuous => Self::RegularFile,
            tar::EntryType::Directory => Self::Directory,
            tar::EntryType::Symlink => Self::SymbolicLink,
            tar::EntryType::Link => Self::HardLink,
            tar::EntryType::Fifo => Self::Fifo,
            tar::EntryType::Char => Self::CharacterDevice,
            tar::EntryType::Block => Self::BlockDevice,
            _ => Self::Other,
        }
    }
}
