//! Attack-scenario tests, one module per attack family.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod hardlink_attack;
mod path_traversal;
mod special_files;
mod symlink_escape;

use targuard_core::types::DestDir;
use tempfile::TempDir;

pub(crate) fn create_test_dest() -> (TempDir, DestDir) {
    let temp = TempDir::new().unwrap();
    let dest = DestDir::new(temp.path()).unwrap();
    (temp, dest)
}
