//! Builder for configuring archive extraction.

use std::io::Read;
use std::path::Path;
use std::path::PathBuf;

use crate::ExtractionError;
use crate::ExtractionReport;
use crate::ProgressCallback;
use crate::Result;
use crate::SecurityConfig;

enum Source<'a> {
    Path(PathBuf),
    Stream(Box<dyn Read + 'a>),
}

/// Builder for configuring archive extraction.
///
/// # Examples
///
/// ```no_run
/// use targuard_core::ArchiveBuilder;
/// use targuard_core::SecurityConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let report = ArchiveBuilder::new()
///     .archive("course.tar.gz")
///     .output_dir("/tmp/output")
///     .config(SecurityConfig::strict())
///     .extract()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ArchiveBuilder<'a> {
    source: Option<Source<'a>>,
    output_dir: Option<PathBuf>,
    config: Option<SecurityConfig>,
    progress: Option<&'a mut dyn ProgressCallback>,
}

impl<'a> ArchiveBuilder<'a> {
    /// Creates a new `ArchiveBuilder`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads the archive from a file.
    #[must_use]
    pub fn archive<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.source = Some(Source::Path(path.as_ref().to_path_buf()));
        self
    }

    /// Reads the archive from an already open stream.
    #[must_use]
    pub fn stream<R: Read + 'a>(mut self, reader: R) -> Self {
        self.source = Some(Source::Stream(Box::new(reader)));
        self
    }

    /// Sets the output directory.
    #[must_use]
    pub fn output_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.output_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Sets the security configuration.
    #[must_use]
    pub fn config(mut self, config: SecurityConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Reports progress to `progress`.
    #[must_use]
    pub fn progress(mut self, progress: &'a mut dyn ProgressCallback) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Executes the extraction with the configured settings.
    ///
    /// # Errors
    ///
    /// Returns `Io` with `InvalidInput` if no source or output directory was
    /// set, or any error of [`crate::extract`].
    pub fn extract(self) -> Result<ExtractionReport> {
        let source = self.source.ok_or_else(|| missing("archive source"))?;
        let output_dir = self.output_dir.ok_or_else(|| missing("output directory"))?;
        let config = self.config.unwrap_or_default();

        let reader: Box<dyn Read + 'a> = match source {
            Source::Path(path) => Box::new(std::fs::File::open(path)?),
            Source::Stream(reader) => reader,
        };

        match self.progress {
            Some(progress) => crate::extract_with_progress(reader, output_dir, &config, progress),
            None => crate::extract(reader, output_dir, &config),
        }
    }
}

fn missing(what: &str) -> ExtractionError {
    ExtractionError::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidInput,
        format!("{what} not set"),
    ))
}
