//! Subcommand implementations.

pub mod completion;
pub mod extract;
pub mod import;
pub mod verify;

use anyhow::Context;
use anyhow::Result;
use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

/// Opens the archive argument, reading stdin for `-`.
pub fn open_archive(path: &Path) -> Result<Box<dyn Read>> {
    if path == Path::new("-") {
        return Ok(Box::new(io::stdin().lock()));
    }
    let file = File::open(path)
        .with_context(|| format!("failed to open archive '{}'", path.display()))?;
    Ok(Box::new(file))
}
