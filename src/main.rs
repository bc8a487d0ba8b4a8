use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tscat::cli::{Arguments, ExitStatus};

/// Environment variable holding the log filter, e.g. `TSCAT_LOG=tscat::merge=debug`.
const LOG_ENV: &str = "TSCAT_LOG";

fn main() -> ExitCode {
    let args = Arguments::parse();
    init_logging(args.verbose());

    match tscat::cli::run_cli(args) {
        Ok(status) => status.into(),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitStatus::Error.into()
        }
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(format!("tscat={}", default_level)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}
