//! Destination path resolution and containment check.

use crate::error::{FetchError, Result};
use std::path::{Component, Path, PathBuf};

/// Joins `filename` onto `base` and returns the destination path.
///
/// Unless `allow_outside_base` is set, the filename is normalized lexically and
/// must stay inside `base`: absolute paths and `..` segments that climb above
/// it are rejected. The result must name a file, not `base` itself.
/// Parent directories are not created here.
pub fn resolve_destination(base: &Path, filename: &str, allow_outside_base: bool) -> Result<PathBuf> {
    let invalid = |reason: &'static str| FetchError::InvalidFilename {
        filename: filename.to_string(),
        reason,
    };

    if filename.is_empty() {
        return Err(invalid("filename is empty"));
    }
    // `Path::components` drops trailing separators and `.`, so check the raw text.
    match filename.rsplit(['/', std::path::MAIN_SEPARATOR]).next() {
        Some("") => return Err(invalid("filename ends with a path separator")),
        Some(".") | Some("..") => return Err(invalid("filename does not name a file")),
        _ => {}
    }
    let last_is_file = matches!(Path::new(filename).components().last(), Some(Component::Normal(_)));
    if !last_is_file {
        return Err(invalid("filename does not name a file"));
    }

    if allow_outside_base {
        return Ok(base.join(filename));
    }

    let mut rel = PathBuf::new();
    let mut depth = 0usize;
    for component in Path::new(filename).components() {
        match component {
            Component::Normal(part) => {
                rel.push(part);
                depth += 1;
            }
            Component::CurDir => {}
            Component::ParentDir => {
                if depth == 0 {
                    return Err(invalid("path escapes the working directory"));
                }
                rel.pop();
                depth -= 1;
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("absolute paths are not allowed"));
            }
        }
    }
    if depth == 0 {
        return Err(invalid("filename does not name a file"));
    }
    Ok(base.join(rel))
}
