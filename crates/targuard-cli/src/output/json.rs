//! JSON output formatter for machine-readable results.

use super::formatter::JsonOutput;
use super::formatter::OutputFormatter;
use anyhow::Result;
use serde::Serialize;
use std::io::Write;
use std::io::{self};
use std::path::Path;
use targuard_core::CompressionCodec;
use targuard_core::ExtractionReport;
use targuard_core::ImportError;
use targuard_core::InspectionReport;
use targuard_core::ResponseClass;
use targuard_core::StagedImport;

pub struct JsonFormatter;

impl JsonFormatter {
    fn output<T: Serialize>(value: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(value)?;
        writeln!(io::stdout(), "{json}")?;
        Ok(())
    }
}

#[derive(Serialize)]
struct ExtractionOutput {
    root: String,
    codec: Option<&'static str>,
    files_extracted: usize,
    directories_created: usize,
    symlinks_created: usize,
    hardlinks_created: usize,
    bytes_written: u64,
    duration_ms: u128,
}

impl ExtractionOutput {
    fn from_report(report: &ExtractionReport) -> Self {
        Self {
            root: report.root.display().to_string(),
            codec: report.codec.map(CompressionCodec::name),
            files_extracted: report.files_extracted,
            directories_created: report.directories_created,
            symlinks_created: report.symlinks_created,
            hardlinks_created: report.hardlinks_created,
            bytes_written: report.bytes_written,
            duration_ms: report.duration.as_millis(),
        }
    }
}

#[derive(Serialize)]
struct EntryVerdict {
    path: String,
    kind: &'static str,
    size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    link_target: Option<String>,
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<&'static str>,
}

#[derive(Serialize)]
struct InspectionOutput {
    archive: String,
    codec: Option<&'static str>,
    safe: bool,
    total_entries: usize,
    rejected: usize,
    total_size: u64,
    entries: Vec<EntryVerdict>,
}

#[derive(Serialize)]
struct ImportOutput {
    archive: String,
    status_code: u16,
    response: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    manifest: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    course_root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    extraction: Option<ExtractionOutput>,
}

impl OutputFormatter for JsonFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        let output = JsonOutput::success("extract", ExtractionOutput::from_report(report));
        Self::output(&output)
    }

    fn format_inspection_report(&self, archive: &Path, report: &InspectionReport) -> Result<()> {
        let entries = report
            .entries
            .iter()
            .map(|e| EntryVerdict {
                path: e.entry.name.display().to_string(),
                kind: e.entry.kind.name(),
                size: e.entry.size,
                link_target: e.entry.link_target().map(|t| t.display().to_string()),
                accepted: e.verdict.is_accepted(),
                reason: e.verdict.reason().map(|r| r.as_str()),
            })
            .collect();

        let data = InspectionOutput {
            archive: archive.display().to_string(),
            codec: report.codec.map(CompressionCodec::name),
            safe: report.is_safe(),
            total_entries: report.total_entries(),
            rejected: report.rejected_count(),
            total_size: report.total_size,
            entries,
        };

        let output = if report.is_safe() {
            JsonOutput::success("verify", data)
        } else {
            JsonOutput::failure("verify", data, "archive contains unsafe entries")
        };
        Self::output(&output)
    }

    fn format_import_outcome(
        &self,
        archive: &Path,
        outcome: &Result<StagedImport, ImportError>,
    ) -> Result<()> {
        let class = ResponseClass::of(outcome);
        let mut data = ImportOutput {
            archive: archive.display().to_string(),
            status_code: class.status_code(),
            response: class.to_string(),
            manifest: None,
            course_root: None,
            extraction: None,
        };

        let output = match outcome {
            Ok(staged) => {
                data.manifest = Some(staged.manifest_path().display().to_string());
                data.course_root = Some(staged.course_root().display().to_string());
                data.extraction = Some(ExtractionOutput::from_report(staged.report()));
                JsonOutput::success("import", data)
            }
            Err(err) => JsonOutput::failure("import", data, err.response_message()),
        };
        Self::output(&output)
    }

    fn format_success(&self, message: &str) {
        #[derive(Serialize)]
        struct SuccessData {
            message: String,
        }

        let output = JsonOutput::success(
            "message",
            SuccessData {
                message: message.to_string(),
            },
        );
        let _ = Self::output(&output);
    }
}
