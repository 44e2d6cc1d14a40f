//! Authenticated single-file HTTP download.

pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod request;
pub mod storage;

pub use error::{ErrorKind, FetchError};
pub use fetcher::{fetch_and_save, FetchOptions, FetchOutcome, Fetcher};
pub use request::{AuthToken, DownloadRequest};
