use payrail_core::logging;

mod cli;

use crate::cli::CliCommand;

#[tokio::main]
async fn main() {
    // Fall back to stderr when the state dir is not writable.
    if let Err(e) = logging::init_logging() {
        match logging::init_logging_stderr() {
            Ok(()) => tracing::warn!("file logging unavailable ({:#}), logging to stderr", e),
            Err(stderr_err) => eprintln!(
                "payrail: logging disabled ({:#}; {:#})",
                e, stderr_err
            ),
        }
    }

    if let Err(err) = CliCommand::run_from_args().await {
        eprintln!("payrail error: {:#}", err);
        std::process::exit(1);
    }
}
