//! Streaming tar extraction with path-containment and entry-kind validation.
//!
//! `targuard-core` unpacks a (possibly compressed) tar stream into a target
//! directory, validating every entry before anything is written for it. An
//! archive is rejected as soon as one entry:
//!
//! - resolves outside the target directory (absolute paths, `../` escapes,
//!   embedded `..` that walks out of the tree),
//! - is a link whose target resolves outside the target directory,
//! - is a FIFO, device node or any other special file.
//!
//! # Examples
//!
//! ```no_run
//! use targuard_core::SecurityConfig;
//! use targuard_core::extract;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let upload = std::fs::File::open("course.tar.gz")?;
//! let report = extract(upload, "/srv/scratch/import-42", &SecurityConfig::default())?;
//! println!(
//!     "Extracted {} files into {}",
//!     report.files_extracted,
//!     report.root.display()
//! );
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod api;
pub mod archive;
pub mod config;
pub mod copy;
pub mod error;
pub mod formats;
pub mod import;
pub mod inspection;
pub mod report;
pub mod security;
#[doc(hidden)]
pub mod test_utils;
pub mod types;

pub use api::extract;
pub use api::extract_archive;
pub use api::extract_with_progress;
pub use archive::ArchiveBuilder;
pub use config::SecurityConfig;
pub use error::ExtractionError;
pub use error::QuotaResource;
pub use error::Result;
pub use formats::CompressionCodec;
pub use import::COURSE_MANIFEST;
pub use import::ImportError;
pub use import::ResponseClass;
pub use import::ScratchDir;
pub use import::StagedImport;
pub use import::stage_import;
pub use import::stage_import_with_manifest;
pub use inspection::InspectedEntry;
pub use inspection::InspectionReport;
pub use inspection::inspect;
pub use inspection::inspect_archive;
pub use report::ExtractionReport;
pub use report::NoopProgress;
pub use report::ProgressCallback;

pub use types::ArchiveEntry;
pub use types::DestDir;
pub use types::EntryKind;
pub use types::RejectReason;
pub use types::SafePath;
pub use types::Verdict;
