//! Temp file that is renamed onto the destination on commit.

use crate::error::{FetchError, Result};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
#[cfg(unix)]
use std::os::unix::io::AsRawFd;

/// Open `<destination>.part`. Removed on drop unless `commit` succeeded.
#[derive(Debug)]
pub struct PartFile {
    file: Option<File>,
    temp_path: PathBuf,
    final_path: PathBuf,
}

impl PartFile {
    /// Create the temp file next to `final_path`. Fails if `<destination>.part`
    /// already exists; a file this process did not create is never truncated or removed.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = super::temp_path(final_path);
        let file = File::options()
            .write(true)
            .create_new(true)
            .open(&temp_path)
            .map_err(|e| FetchError::filesystem("create", &temp_path, e))?;
        tracing::debug!(path = %temp_path.display(), "created temp file");
        Ok(PartFile {
            file: Some(file),
            temp_path,
            final_path: final_path.to_path_buf(),
        })
    }

    /// Write the whole body. With `preallocate`, space is reserved first so a
    /// full disk is reported before any data lands.
    pub fn write_all_bytes(&mut self, data: &[u8], preallocate: bool) -> Result<()> {
        let temp_path = &self.temp_path;
        let file = self
            .file
            .as_mut()
            .ok_or_else(|| FetchError::filesystem("write", temp_path, std::io::ErrorKind::BrokenPipe.into()))?;
        if preallocate && !data.is_empty() {
            preallocate_file(file, data.len() as u64)
                .map_err(|e| FetchError::filesystem("preallocate", temp_path, e))?;
        }
        file.write_all(data)
            .map_err(|e| FetchError::filesystem("write", temp_path, e))?;
        Ok(())
    }

    /// Sync, close, and atomically rename over the destination (overwriting it).
    pub fn commit(mut self) -> Result<PathBuf> {
        if let Some(file) = self.file.take() {
            file.sync_all()
                .map_err(|e| FetchError::filesystem("sync", &self.temp_path, e))?;
        }
        std::fs::rename(&self.temp_path, &self.final_path)
            .map_err(|e| FetchError::filesystem("rename onto", &self.final_path, e))?;
        // Renamed away; nothing for Drop to clean up.
        self.temp_path = PathBuf::new();
        Ok(self.final_path.clone())
    }
}

impl Drop for PartFile {
    fn drop(&mut self) {
        drop(self.file.take());
        if self.temp_path.as_os_str().is_empty() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.temp_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = %self.temp_path.display(), "failed to remove temp file: {}", e);
            }
        } else {
            tracing::debug!(path = %self.temp_path.display(), "removed temp file");
        }
    }
}

/// On Unix tries `posix_fallocate` for real block allocation; falls back to
/// `set_len` when the filesystem does not support it.
fn preallocate_file(file: &File, size: u64) -> std::io::Result<()> {
    #[cfg(unix)]
    {
        let fd = file.as_raw_fd();
        let r = unsafe { libc::posix_fallocate(fd, 0, size as libc::off_t) };
        if r == 0 {
            return Ok(());
        }
        if r == libc::ENOSPC || r == libc::EFBIG {
            return Err(std::io::Error::from_raw_os_error(r));
        }
        tracing::debug!(errno = r, "posix_fallocate failed, falling back to set_len");
    }
    file.set_len(size)
}
