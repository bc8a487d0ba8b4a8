use anyhow::Result;

use super::{
    args::{Arguments, Command},
    commands::{
        CommandResult, init::init, prune::prune, update::update, validate::validate,
    },
};

/// Dispatch to the handler of the parsed command.
pub fn run(Arguments { command }: Arguments) -> Result<CommandResult> {
    match command {
        Some(Command::Update(cmd)) => update(cmd),
        Some(Command::Prune(cmd)) => prune(cmd),
        Some(Command::Validate(cmd)) => validate(cmd),
        Some(Command::Init) => init(),
        None => {
            anyhow::bail!("No command provided. Use --help to see available commands.")
        }
    }
}
