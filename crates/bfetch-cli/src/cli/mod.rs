//! CLI for bfetch.

use anyhow::Result;
use bfetch_core::config::{self, FetchConfig};
use bfetch_core::{DownloadRequest, FetchOptions, FetchOutcome, Fetcher};
use clap::Parser;
use std::time::Duration;

/// Download one file with a bearer token into the current directory.
#[derive(Debug, Parser)]
#[command(name = "bfetch", version)]
#[command(about = "Download a single file using bearer-token authentication", long_about = None)]
pub struct Cli {
    /// HTTP/HTTPS URL to download.
    pub url: String,

    /// Name to save as, relative to the current directory.
    pub filename: String,

    /// Bearer token sent as `Authorization: Bearer <TOKEN>`.
    #[arg(allow_hyphen_values = true)]
    pub token: String,

    /// Seconds to wait for the connection (overrides config).
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Overall transfer deadline in seconds (overrides config).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Allow FILENAME to resolve outside the current directory.
    #[arg(long)]
    pub allow_outside_cwd: bool,

    /// Do not print the summary line on success.
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Fetch options from config with this invocation's flags applied on top.
    pub fn fetch_options(&self, cfg: &FetchConfig) -> FetchOptions {
        let mut opts = FetchOptions::from(cfg);
        if let Some(secs) = self.connect_timeout {
            opts.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout {
            opts.timeout = Some(Duration::from_secs(secs));
        }
        if self.allow_outside_cwd {
            opts.allow_outside_base = true;
        }
        opts
    }

    pub fn run(&self) -> Result<FetchOutcome> {
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let request = DownloadRequest::new(&self.url, &self.filename, &self.token)?;
        let cwd = std::env::current_dir()?;
        let fetcher = Fetcher::new(self.fetch_options(&cfg));
        let outcome = fetcher.fetch_into(&cwd, &request)?;

        if !self.quiet {
            println!(
                "Saved {} bytes to {}",
                outcome.bytes_written,
                outcome.path.display()
            );
        }
        Ok(outcome)
    }
}
