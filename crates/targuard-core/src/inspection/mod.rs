//! Archive inspection without extraction.
//!
//! Inspection reads every entry header, decides what extraction would do
//! with it, and writes nothing.
//!
//! # Examples
//!
//! ```no_run
//! use targuard_core::SecurityConfig;
//! use targuard_core::inspection::inspect_archive;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let report = inspect_archive("course.tar.gz", &SecurityConfig::default())?;
//! if report.is_safe() {
//!     println!("{} entries, all safe to extract", report.total_entries());
//! }
//! # Ok(())
//! # }
//! ```

pub mod report;
pub mod verify;

pub use report::InspectedEntry;
pub use report::InspectionReport;
pub use verify::inspect;
pub use verify::inspect_archive;
