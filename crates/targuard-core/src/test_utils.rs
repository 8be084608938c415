//! Test utilities for building in-memory tar archives.
//!
//! The `tar` crate refuses to write absolute or `..` names through its
//! normal API, so hostile fixtures are assembled with `add_raw_*`, which
//! copy the name bytes straight into the header.
//!
//! # Panics
//!
//! All functions in this module may panic on I/O errors since they are
//! designed for test use only where panics are acceptable.

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::io::Write;

use crate::formats::CompressionCodec;

/// Builder for tar test archives with every entry kind.
///
/// # Examples
///
/// ```
/// use targuard_core::test_utils::TarTestBuilder;
///
/// let tar_data = TarTestBuilder::new()
///     .add_file("good/course.xml", b"<course/>")
///     .add_directory("good/course/")
///     .add_symlink("good/link", "course.xml")
///     .add_raw_file("../escape.txt", b"x")
///     .add_fifo("pipe")
///     .build_gz();
/// ```
pub struct TarTestBuilder {
    builder: tar::Builder<Vec<u8>>,
}

impl TarTestBuilder {
    /// Creates a new tar test builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }

    /// Adds a regular file to the archive.
    #[must_use]
    pub fn add_file(self, path: &str, data: &[u8]) -> Self {
        self.add_file_with_mode(path, data, 0o644)
    }

    /// Adds a regular file with custom mode.
    #[must_use]
    pub fn add_file_with_mode(mut self, path: &str, data: &[u8], mode: u32) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(mode);
        header.set_cksum();
        self.builder.append_data(&mut header, path, data).unwrap();
        self
    }

    /// Adds a directory to the archive.
    #[must_use]
    pub fn add_directory(mut self, path: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    /// Adds a symlink; the target is stored verbatim, even if it escapes.
    #[must_use]
    pub fn add_symlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Symlink)
    }

    /// Adds a hardlink; the target is stored verbatim, even if it escapes.
    #[must_use]
    pub fn add_hardlink(self, path: &str, target: &str) -> Self {
        self.add_link(path, target, tar::EntryType::Link)
    }

    /// Adds a named pipe.
    #[must_use]
    pub fn add_fifo(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Fifo)
    }

    /// Adds a character device node (1, 3: `/dev/null`).
    #[must_use]
    pub fn add_char_device(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Char)
    }

    /// Adds a block device node.
    #[must_use]
    pub fn add_block_device(self, path: &str) -> Self {
        self.add_special(path, tar::EntryType::Block)
    }

    /// Adds an entry with an arbitrary header type flag.
    #[must_use]
    pub fn add_with_type(self, path: &str, entry_type: tar::EntryType) -> Self {
        self.add_special(path, entry_type)
    }

    /// Adds a PAX global extended header, as `git archive` writes one.
    #[must_use]
    pub fn add_pax_global_header(mut self, key: &str, value: &str) -> Self {
        let record = pax_record(key, value);
        let mut header = tar::Header::new_ustar();
        header.set_size(record.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::XGlobalHeader);
        self.builder
            .append_data(&mut header, "pax_global_header", record.as_bytes())
            .unwrap();
        self
    }

    /// Adds a regular file whose name bytes are written unchecked.
    ///
    /// The name must fit the 100-byte header field.
    #[must_use]
    pub fn add_raw_file(mut self, name: &str, data: &[u8]) -> Self {
        let mut header = tar::Header::new_gnu();
        write_raw_name(&mut header, name);
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        header.set_entry_type(tar::EntryType::Regular);
        header.set_cksum();
        self.builder.append(&header, data).unwrap();
        self
    }

    /// Adds a directory whose name bytes are written unchecked.
    #[must_use]
    pub fn add_raw_directory(mut self, name: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        write_raw_name(&mut header, name);
        header.set_size(0);
        header.set_mode(0o755);
        header.set_entry_type(tar::EntryType::Directory);
        header.set_cksum();
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    /// Adds a symlink whose name bytes are written unchecked.
    #[must_use]
    pub fn add_raw_symlink(mut self, name: &str, target: &str) -> Self {
        let mut header = tar::Header::new_gnu();
        write_raw_name(&mut header, name);
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(tar::EntryType::Symlink);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder.append(&header, std::io::empty()).unwrap();
        self
    }

    /// Builds and returns the uncompressed tar data.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }

    /// Builds the archive and gzip-compresses it.
    #[must_use]
    pub fn build_gz(self) -> Vec<u8> {
        self.build_with(CompressionCodec::Gzip)
    }

    /// Builds the archive and compresses it with `codec`.
    #[must_use]
    pub fn build_with(self, codec: CompressionCodec) -> Vec<u8> {
        compress(&self.build(), codec)
    }

    fn add_link(mut self, path: &str, target: &str, entry_type: tar::EntryType) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o777);
        header.set_entry_type(entry_type);
        header.set_link_name(target).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }

    fn add_special(mut self, path: &str, entry_type: tar::EntryType) -> Self {
        let mut header = tar::Header::new_gnu();
        header.set_size(0);
        header.set_mode(0o644);
        header.set_entry_type(entry_type);
        header.set_device_major(1).unwrap();
        header.set_device_minor(3).unwrap();
        header.set_cksum();
        self.builder
            .append_data(&mut header, path, std::io::empty())
            .unwrap();
        self
    }
}

impl Default for TarTestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Compresses `data` with `codec`.
#[must_use]
pub fn compress(data: &[u8], codec: CompressionCodec) -> Vec<u8> {
    match codec {
        CompressionCodec::Gzip => {
            let mut encoder =
                flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Bzip2 => {
            let mut encoder =
                bzip2::write::BzEncoder::new(Vec::new(), bzip2::Compression::default());
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Xz => {
            let mut encoder = xz2::write::XzEncoder::new(Vec::new(), 6);
            encoder.write_all(data).unwrap();
            encoder.finish().unwrap()
        }
        CompressionCodec::Zstd => zstd::stream::encode_all(data, 3).unwrap(),
    }
}

/// Formats one `"<len> <key>=<value>\n"` record, where `len` counts itself.
fn pax_record(key: &str, value: &str) -> String {
    let body = format!(" {key}={value}\n");
    let mut len = body.len() + 1;
    while len.to_string().len() + body.len() != len {
        len = len.to_string().len() + body.len();
    }
    format!("{len}{body}")
}

fn write_raw_name(header: &mut tar::Header, name: &str) {
    let field = &mut header.as_old_mut().name;
    assert!(name.len() < field.len(), "raw name too long: {name}");
    field.fill(0);
    field[..name.len()].copy_from_slice(name.as_bytes());
}
