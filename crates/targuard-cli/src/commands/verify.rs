//! Verify command implementation

use crate::cli::VerifyArgs;
use crate::commands::open_archive;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use targuard_core::SecurityConfig;
use targuard_core::inspect;

pub fn execute(args: &VerifyArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let config = SecurityConfig {
        allow_symlinks: !args.no_symlinks,
        allow_hardlinks: !args.no_hardlinks,
        ..SecurityConfig::default()
    };

    let reader = open_archive(&args.archive)?;
    let report = add_archive_context(inspect(reader, &config), &args.archive)?;

    formatter.format_inspection_report(&args.archive, &report)?;

    if report.is_safe() {
        Ok(())
    } else {
        bail!(
            "Archive '{}' is unsafe: {} of {} entries rejected",
            args.archive.display(),
            report.rejected_count(),
            report.total_entries()
        )
    }
}
