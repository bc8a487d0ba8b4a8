//! Command-line interface layer.

use anyhow::Result;

mod args;
pub mod commands;
mod exit_status;
pub mod report;
mod run;

pub use args::{Arguments, Command, CommonArgs, PruneCommand, UpdateCommand, ValidateCommand};
pub use exit_status::ExitStatus;

/// Run the parsed command, print its report and decide the exit status.
pub fn run_cli(args: Arguments) -> Result<ExitStatus> {
    let Some(args) = args.with_command_or_help() else {
        return Ok(ExitStatus::Success);
    };

    let result = run::run(args)?;
    report::print(&result);

    Ok(if result.error_count > 0 {
        ExitStatus::Failure
    } else {
        ExitStatus::Success
    })
}
