//! Human-readable output formatter with colors and styling.

use super::formatter::OutputFormatter;
use anyhow::Result;
use console::Term;
use console::style;
use std::path::Path;
use targuard_core::CompressionCodec;
use targuard_core::ExtractionReport;
use targuard_core::ImportError;
use targuard_core::InspectionReport;
use targuard_core::StagedImport;
use targuard_core::Verdict;

pub struct HumanFormatter {
    verbose: bool,
    quiet: bool,
    use_colors: bool,
    term: Term,
}

impl HumanFormatter {
    pub fn new(verbose: bool, quiet: bool) -> Self {
        Self {
            verbose,
            quiet,
            use_colors: console::colors_enabled(),
            term: Term::stdout(),
        }
    }

    fn format_size(bytes: u64) -> String {
        const KB: u64 = 1024;
        const MB: u64 = KB * 1024;
        const GB: u64 = MB * 1024;

        if bytes >= GB {
            format!("{:.1} GB", bytes as f64 / GB as f64)
        } else if bytes >= MB {
            format!("{:.1} MB", bytes as f64 / MB as f64)
        } else if bytes >= KB {
            format!("{:.1} KB", bytes as f64 / KB as f64)
        } else {
            format!("{bytes} B")
        }
    }

    fn format_number(n: usize) -> String {
        let s = n.to_string();
        let mut result = String::new();
        let mut count = 0;

        for c in s.chars().rev() {
            if count == 3 {
                result.push(',');
                count = 0;
            }
            result.push(c);
            count += 1;
        }

        result.chars().rev().collect()
    }

    fn headline(&self, ok: bool, text: &str) {
        let line = match (self.use_colors, ok) {
            (true, true) => format!("{} {text}", style("✓").green().bold()),
            (true, false) => format!("{} {text}", style("✗").red().bold()),
            (false, _) => text.to_string(),
        };
        let _ = self.term.write_line(&line);
    }

    fn write_extraction_stats(&self, report: &ExtractionReport) {
        let _ = self.term.write_line(&format!(
            "  Files extracted: {}",
            Self::format_number(report.files_extracted)
        ));
        let _ = self
            .term
            .write_line(&format!("  Directories: {}", report.directories_created));
        let _ = self.term.write_line(&format!(
            "  Total size: {}",
            Self::format_size(report.bytes_written)
        ));

        if self.verbose {
            let codec = report.codec.map_or("none", CompressionCodec::name);
            let _ = self.term.write_line(&format!("  Compression: {codec}"));
            let _ = self
                .term
                .write_line(&format!("  Symlinks: {}", report.symlinks_created));
            let _ = self
                .term
                .write_line(&format!("  Hardlinks: {}", report.hardlinks_created));
            let _ = self
                .term
                .write_line(&format!("  Duration: {:?}", report.duration));
        }
    }
}

impl OutputFormatter for HumanFormatter {
    fn format_extraction_result(&self, report: &ExtractionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        self.headline(
            true,
            &format!("Extraction complete: {}", report.root.display()),
        );
        self.write_extraction_stats(report);

        Ok(())
    }

    fn format_inspection_report(&self, archive: &Path, report: &InspectionReport) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        let status = if report.is_safe() { "SAFE" } else { "UNSAFE" };
        let status = match (self.use_colors, report.is_safe()) {
            (true, true) => style(status).green().bold().to_string(),
            (true, false) => style(status).red().bold().to_string(),
            (false, _) => status.to_string(),
        };
        let _ = self.term.write_line(&format!(
            "Archive verification: {status} ({})",
            archive.display()
        ));

        for inspected in &report.entries {
            let entry = &inspected.entry;
            let link = entry
                .link_target()
                .map(|t| format!(" -> {}", t.display()))
                .unwrap_or_default();

            match inspected.verdict {
                Verdict::Rejected(reason) => {
                    let tag = if self.use_colors {
                        style("REJECT").red().to_string()
                    } else {
                        "REJECT".to_string()
                    };
                    let _ = self.term.write_line(&format!(
                        "  {tag} {:<10} {}{link}  [{reason}]",
                        entry.kind.name(),
                        entry.name.display()
                    ));
                }
                Verdict::Accepted if self.verbose => {
                    let _ = self.term.write_line(&format!(
                        "  ok     {:<10} {}{link}",
                        entry.kind.name(),
                        entry.name.display()
                    ));
                }
                Verdict::Accepted => {}
            }
        }

        let _ = self.term.write_line(&format!(
            "Total: {} entries, {} rejected, {}",
            Self::format_number(report.total_entries()),
            Self::format_number(report.rejected_count()),
            Self::format_size(report.total_size)
        ));

        Ok(())
    }

    fn format_import_outcome(
        &self,
        archive: &Path,
        outcome: &Result<StagedImport, ImportError>,
    ) -> Result<()> {
        if self.quiet {
            return Ok(());
        }

        match outcome {
            Ok(staged) => {
                self.headline(
                    true,
                    &format!("Import staged: {}", archive.display()),
                );
                let _ = self.term.write_line(&format!(
                    "  Manifest: {}",
                    staged.manifest_path().display()
                ));
                self.write_extraction_stats(staged.report());
            }
            Err(err) => {
                self.headline(
                    false,
                    &format!("Import refused ({}): {}", err.response_class(), archive.display()),
                );
            }
        }

        Ok(())
    }

    fn format_success(&self, message: &str) {
        if self.quiet {
            return;
        }
        self.headline(true, message);
    }
}
