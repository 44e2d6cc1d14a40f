use bfetch_core::{logging, FetchError};
use clap::Parser;

mod cli;

use crate::cli::Cli;

/// Exit code for failures outside the fetch itself (config, logging, cwd).
const EXIT_OTHER: i32 = 1;

fn main() {
    // Parse first so usage errors exit with clap's message and code 2.
    let cli = Cli::parse();

    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("file logging unavailable, using stderr: {:#}", err);
    }

    if let Err(err) = cli.run() {
        let code = match err.downcast_ref::<FetchError>() {
            Some(fetch_err) => {
                let kind = fetch_err.kind();
                tracing::error!(kind = kind.as_str(), "fetch failed: {:#}", err);
                kind.exit_code()
            }
            None => {
                tracing::error!("bfetch failed: {:#}", err);
                EXIT_OTHER
            }
        };
        eprintln!("bfetch error: {:#}", err);
        std::process::exit(code);
    }
}
