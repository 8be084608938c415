//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::commands::open_archive;
use crate::error::add_archive_context;
use crate::output::OutputFormatter;
use crate::progress::CliProgress;
use anyhow::Context;
use anyhow::Result;
use std::env;
use targuard_core::NoopProgress;
use targuard_core::extract_with_progress;

pub fn execute(
    args: &ExtractArgs,
    formatter: &dyn OutputFormatter,
    show_progress: bool,
) -> Result<()> {
    let output_dir = match &args.output_dir {
        Some(dir) => dir.clone(),
        None => env::current_dir().context("failed to get current directory")?,
    };

    let config = args.security.to_config();
    let reader = open_archive(&args.archive)?;

    // Spinner only when attached to a terminal and not quiet/JSON
    let report = if show_progress && CliProgress::should_show() {
        let mut progress = CliProgress::new("Extracting");
        add_archive_context(
            extract_with_progress(reader, &output_dir, &config, &mut progress),
            &args.archive,
        )?
    } else {
        add_archive_context(
            extract_with_progress(reader, &output_dir, &config, &mut NoopProgress),
            &args.archive,
        )?
    };

    formatter.format_extraction_result(&report)?;

    Ok(())
}
