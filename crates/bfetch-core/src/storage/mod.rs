//! Disk I/O and file lifecycle.
//!
//! The body is written to `<destination>.part`, synced, then renamed over the
//! destination. An uncommitted part file is removed when dropped, so a failed
//! fetch never leaves a temp file or touches an existing destination.
//!
//! The part file is created exclusively: a pre-existing `<destination>.part`
//! (a leftover from a killed run, or an unrelated file) makes the fetch fail
//! with a filesystem error and is left as it was.

mod part_file;

pub use part_file::PartFile;

use std::path::{Path, PathBuf};

/// Temporary file suffix used before atomic rename.
const TEMP_SUFFIX: &str = ".part";

/// Path for the temp file: appends `.part` to the final path (e.g. `file.iso` → `file.iso.part`).
pub fn temp_path(final_path: &Path) -> PathBuf {
    let mut o = final_path.as_os_str().to_owned();
    o.push(TEMP_SUFFIX);
    PathBuf::from(o)
}
