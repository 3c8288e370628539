use ralad_core::logging;

mod cli;

fn main() {
    // Log file when possible, stderr otherwise.
    if let Err(err) = logging::init_logging() {
        logging::init_logging_stderr();
        tracing::warn!("log file unavailable, logging to stderr: {:#}", err);
    }

    if let Err(err) = cli::run_from_args() {
        tracing::error!("ralad failed: {:#}", err);
        eprintln!("ralad failed: {:#}", err);
        std::process::exit(1);
    }
}
