//! Import command implementation.
//!
//! Stages the upload the way a course import endpoint would and reports the
//! HTTP-style outcome. Any outcome other than 200 exits non-zero.

use crate::cli::ImportArgs;
use crate::commands::open_archive;
use crate::output::OutputFormatter;
use anyhow::Result;
use anyhow::bail;
use log::debug;
use std::env;
use targuard_core::ResponseClass;
use targuard_core::stage_import_with_manifest;

pub fn execute(args: &ImportArgs, formatter: &dyn OutputFormatter) -> Result<()> {
    let scratch_parent = args.scratch_dir.clone().unwrap_or_else(env::temp_dir);
    debug!("staging under {}", scratch_parent.display());

    let config = args.security.to_config();
    let reader = open_archive(&args.archive)?;

    let result = stage_import_with_manifest(reader, &scratch_parent, &config, &args.manifest);
    let class = ResponseClass::of(&result);
    formatter.format_import_outcome(&args.archive, &result)?;

    match result {
        Ok(staged) if args.keep => {
            let kept = staged.keep();
            formatter.format_success(&format!("Extracted tree kept at {}", kept.display()));
            Ok(())
        }
        Ok(_) => Ok(()),
        Err(err) => bail!("{class}: {}", err.response_message()),
    }
}
