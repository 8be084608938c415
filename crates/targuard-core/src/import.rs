//! Staging an uploaded course archive for import.
//!
//! The upload is extracted into a fresh scratch directory, which is removed
//! again on every exit path, and the course manifest is located in the
//! extracted tree. Parsing the course itself is left to the caller.
//!
//! # Examples
//!
//! ```no_run
//! use targuard_core::SecurityConfig;
//! use targuard_core::stage_import;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let upload = std::fs::File::open("course.tar.gz")?;
//! match stage_import(upload, std::env::temp_dir(), &SecurityConfig::default()) {
//!     Ok(staged) => println!("course root: {}", staged.course_root().display()),
//!     Err(err) => eprintln!("{} {}", err.response_class().status_code(), err.response_message()),
//! }
//! # Ok(())
//! # }
//! ```

use std::fmt;
use std::io;
use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use log::info;
use log::warn;
use tempfile::TempDir;
use thiserror::Error;
use walkdir::WalkDir;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::SecurityConfig;

/// File name of the course manifest.
pub const COURSE_MANIFEST: &str = "course.xml";

/// Tag carried by responses for archives rejected as unsafe.
pub const SUSPICIOUS_OPERATION_TAG: &str = "SuspiciousFileOperation";

/// Disposable extraction directory, deleted when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Creates a new, empty scratch directory under `parent`.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn new_in<P: AsRef<Path>>(parent: P) -> io::Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("targuard-import-")
            .tempdir_in(parent)?;
        Ok(Self { dir })
    }

    /// Returns the scratch directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Keeps the directory on disk and returns its path.
    #[must_use]
    pub fn keep(self) -> PathBuf {
        self.dir.keep()
    }

    /// Deletes the directory now, reporting any error.
    ///
    /// # Errors
    ///
    /// Returns an error if removal fails.
    pub fn close(self) -> io::Result<()> {
        self.dir.close()
    }
}

/// A successfully extracted course upload.
///
/// Owns the scratch directory: dropping this removes the extracted tree.
#[derive(Debug)]
pub struct StagedImport {
    scratch: ScratchDir,
    manifest: PathBuf,
    report: ExtractionReport,
}

impl StagedImport {
    /// Directory containing the manifest.
    #[must_use]
    pub fn course_root(&self) -> &Path {
        self.manifest.parent().unwrap_or(&self.report.root)
    }

    /// Absolute path of the manifest file.
    #[must_use]
    pub fn manifest_path(&self) -> &Path {
        &self.manifest
    }

    /// Extraction statistics.
    #[must_use]
    pub fn report(&self) -> &ExtractionReport {
        &self.report
    }

    /// The scratch directory holding the extracted tree.
    #[must_use]
    pub fn scratch_dir(&self) -> &ScratchDir {
        &self.scratch
    }

    /// Hands the extracted tree over to the caller, who becomes
    /// responsible for removing it. Returns the scratch directory path.
    #[must_use]
    pub fn keep(self) -> PathBuf {
        self.scratch.keep()
    }
}

/// Errors that can occur while staging an import.
#[derive(Error, Debug)]
pub enum ImportError {
    /// The archive was rejected or could not be extracted.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    /// The archive extracted cleanly but contains no manifest.
    #[error("could not find the {manifest} file in the package")]
    MissingManifest {
        /// Manifest file name that was searched for.
        manifest: String,
    },

    /// Scratch directory handling failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ImportError {
    /// Returns the response class for this failure.
    #[must_use]
    pub fn response_class(&self) -> ResponseClass {
        match self {
            Self::Extraction(ExtractionError::Io(_)) | Self::Io(_) => ResponseClass::ServerError,
            Self::Extraction(_) => ResponseClass::BadRequest,
            Self::MissingManifest { .. } => ResponseClass::UnsupportedMediaType,
        }
    }

    /// Returns the message to show the uploader.
    ///
    /// Rejections of unsafe archives start with `SuspiciousFileOperation`.
    #[must_use]
    pub fn response_message(&self) -> String {
        match self {
            Self::Extraction(err) if err.rejection_reason().is_some() => {
                format!("{SUSPICIOUS_OPERATION_TAG}: {err}")
            }
            other => other.to_string(),
        }
    }
}

/// HTTP-style classification of an import outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseClass {
    /// Archive staged (200).
    Success,
    /// Unsafe or malformed archive, or quota exceeded (400).
    BadRequest,
    /// Archive is not a course package (415).
    UnsupportedMediaType,
    /// Server-side failure (500).
    ServerError,
}

impl ResponseClass {
    /// Classifies the outcome of [`stage_import`].
    #[must_use]
    pub fn of(result: &Result<StagedImport, ImportError>) -> Self {
        match result {
            Ok(_) => Self::Success,
            Err(err) => err.response_class(),
        }
    }

    /// Returns the HTTP status code.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::Success => 200,
            Self::BadRequest => 400,
            Self::UnsupportedMediaType => 415,
            Self::ServerError => 500,
        }
    }

    /// Returns `true` for `Success`.
    #[must_use]
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

impl fmt::Display for ResponseClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Success => "OK",
            Self::BadRequest => "Bad Request",
            Self::UnsupportedMediaType => "Unsupported Media Type",
            Self::ServerError => "Internal Server Error",
        };
        write!(f, "{} {name}", self.status_code())
    }
}

/// Extracts a course upload into a new scratch directory under
/// `scratch_parent` and locates its `course.xml`.
///
/// # Errors
///
/// - `Extraction` if the archive is rejected or unreadable
/// - `MissingManifest` if no `course.xml` exists in the extracted tree
/// - `Io` if the scratch directory cannot be created or walked
pub fn stage_import<R: Read, P: AsRef<Path>>(
    archive_stream: R,
    scratch_parent: P,
    config: &SecurityConfig,
) -> Result<StagedImport, ImportError> {
    stage_import_with_manifest(archive_stream, scratch_parent, config, COURSE_MANIFEST)
}

/// Same as [`stage_import`] with a custom manifest file name.
///
/// # Errors
///
/// Same as [`stage_import`].
pub fn stage_import_with_manifest<R: Read, P: AsRef<Path>>(
    archive_stream: R,
    scratch_parent: P,
    config: &SecurityConfig,
    manifest_name: &str,
) -> Result<StagedImport, ImportError> {
    let scratch = ScratchDir::new_in(scratch_parent)?;

    let report = crate::extract(archive_stream, scratch.path(), config).inspect_err(|err| {
        warn!("import rejected: {err}");
    })?;

    let manifest = locate_manifest(&report.root, manifest_name)?.ok_or_else(|| {
        warn!("import has no {manifest_name}");
        ImportError::MissingManifest {
            manifest: manifest_name.to_string(),
        }
    })?;

    info!("staged import with manifest {}", manifest.display());
    Ok(StagedImport {
        scratch,
        manifest,
        report,
    })
}

/// Finds the shallowest regular file named `name` under `root`.
///
/// Symlinks are neither followed nor accepted as the manifest. Among
/// several candidates at the same depth the lexicographically first wins.
///
/// # Errors
///
/// Returns an error if the tree cannot be read.
pub fn locate_manifest(root: &Path, name: &str) -> io::Result<Option<PathBuf>> {
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .min_depth(1);

    let mut best: Option<(usize, PathBuf)> = None;
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != name {
            continue;
        }
        if best.as_ref().is_none_or(|(depth, _)| entry.depth() < *depth) {
            best = Some((entry.depth(), entry.into_path()));
        }
    }

    Ok(best.map(|(_, path)| path))
}
