//! Fetch one URL with a bearer token and save the body to disk.
//!
//! Order of operations: resolve the destination, create the temp file (so an
//! unwritable destination fails before any connection is opened), run the GET
//! into memory, check status and length, then write and rename. A non-success
//! response leaves no new file and does not touch an existing one.

mod response;
mod transfer;

use crate::config::FetchConfig;
use crate::error::{FetchError, Result};
use crate::request::{resolve_destination, DownloadRequest};
use crate::storage::PartFile;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Transfer and write settings for one fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    /// Overall transfer deadline; `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Abort if throughput stays below `stall_min_bytes_per_sec` for this long.
    pub stall_timeout: Option<Duration>,
    pub stall_min_bytes_per_sec: u32,
    pub user_agent: String,
    /// Cap on the in-memory body; `None` means unlimited.
    pub max_body_bytes: Option<u64>,
    /// Skip the containment check on the destination filename.
    pub allow_outside_base: bool,
    pub preallocate: bool,
}

impl Default for FetchOptions {
    fn default() -> Self {
        FetchOptions::from(&FetchConfig::default())
    }
}

impl From<&FetchConfig> for FetchOptions {
    fn from(cfg: &FetchConfig) -> Self {
        Self {
            connect_timeout: Duration::from_secs(cfg.connect_timeout_secs),
            timeout: cfg.timeout_secs.map(Duration::from_secs),
            stall_timeout: cfg.stall_timeout_secs.map(Duration::from_secs),
            stall_min_bytes_per_sec: cfg.stall_min_bytes_per_sec,
            user_agent: cfg
                .user_agent
                .clone()
                .unwrap_or_else(crate::config::default_user_agent),
            max_body_bytes: cfg.max_body_bytes,
            allow_outside_base: cfg.allow_outside_cwd,
            preallocate: cfg.preallocate,
        }
    }
}

/// What a successful fetch produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchOutcome {
    pub path: PathBuf,
    pub bytes_written: u64,
    pub http_status: u32,
}

#[derive(Debug, Clone, Default)]
pub struct Fetcher {
    options: FetchOptions,
}

impl Fetcher {
    pub fn new(options: FetchOptions) -> Self {
        Self { options }
    }

    /// Download `request` and save it under `base_dir`.
    pub fn fetch_into(&self, base_dir: &Path, request: &DownloadRequest) -> Result<FetchOutcome> {
        let url = request.url().as_str();
        let destination = resolve_destination(
            base_dir,
            request.filename(),
            self.options.allow_outside_base,
        )?;

        let mut part = PartFile::create(&destination)?;

        tracing::info!(url = %url, dest = %destination.display(), "fetching");
        let response = transfer::get(url, request.token(), &self.options)?;

        if !(200..300).contains(&response.status) {
            tracing::warn!(url = %url, status = response.status, "non-success response, nothing written");
            return Err(FetchError::HttpStatus {
                url: url.to_string(),
                status: response.status,
            });
        }

        let received = response.body.len() as u64;
        if let Some(expected) = response.headers.content_length {
            if expected != received {
                return Err(FetchError::PartialTransfer {
                    url: url.to_string(),
                    expected,
                    received,
                });
            }
        }
        tracing::debug!(
            status = response.status,
            bytes = received,
            content_type = response.headers.content_type.as_deref().unwrap_or("-"),
            "response received"
        );

        part.write_all_bytes(&response.body, self.options.preallocate)?;
        let path = part.commit()?;

        tracing::info!(dest = %path.display(), bytes = received, "saved");
        Ok(FetchOutcome {
            path,
            bytes_written: received,
            http_status: response.status,
        })
    }
}

/// Download `url` with `token` into `<current dir>/<filename>` using default options.
pub fn fetch_and_save(url: &str, filename: &str, token: &str) -> Result<FetchOutcome> {
    let request = DownloadRequest::new(url, filename, token)?;
    let cwd = std::env::current_dir()
        .map_err(|e| FetchError::filesystem("resolve working directory", ".", e))?;
    Fetcher::default().fetch_into(&cwd, &request)
}
