//! CLI argument definitions using clap.
//!
//! ## Commands
//!
//! - `update`: Merge an extracted message list into catalogs
//! - `prune`: Permanently drop vanished messages
//! - `validate`: Check catalogs for structural and placeholder problems
//! - `init`: Initialize tscat configuration file

use std::path::PathBuf;

use clap::{Args, CommandFactory, Parser, Subcommand};

use crate::catalog::LocationMode;

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Arguments {
    #[command(subcommand)]
    pub command: Option<Command>,
}

impl Arguments {
    /// Check if a command was provided, otherwise print help and return None.
    pub fn with_command_or_help(self) -> Option<Self> {
        if self.command.is_none() {
            Self::command().print_help().ok();
            None
        } else {
            Some(self)
        }
    }

    /// Get the verbose flag from the command's common args.
    pub fn verbose(&self) -> bool {
        match &self.command {
            Some(Command::Update(cmd)) => cmd.common.verbose,
            Some(Command::Prune(cmd)) => cmd.common.verbose,
            Some(Command::Validate(cmd)) => cmd.common.verbose,
            Some(Command::Init) | None => false,
        }
    }
}

/// Common arguments shared by catalog commands.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Catalog files (default: the "catalogs" patterns of .tscatrc.json)
    #[arg(value_name = "CATALOG")]
    pub catalogs: Vec<PathBuf>,

    /// Enable verbose output (debug logs on stderr)
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Debug, Args)]
pub struct UpdateCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Extracted message list (JSON array produced by the extractor)
    #[arg(long, value_name = "FILE")]
    pub from: PathBuf,

    /// Target language for catalogs that do not exist yet
    #[arg(long)]
    pub locale: Option<String>,

    /// Drop vanished messages after merging
    #[arg(long)]
    pub no_obsolete: bool,

    /// How to write source references (overrides config file)
    #[arg(long, value_enum)]
    pub locations: Option<LocationMode>,

    /// Show what would change without writing any file
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Args)]
pub struct PruneCommand {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Show what would be removed without writing any file
    #[arg(long)]
    pub dry_run: bool,

    /// How to write source references (overrides config file)
    #[arg(long, value_enum)]
    pub locations: Option<LocationMode>,
}

#[derive(Debug, Args)]
pub struct ValidateCommand {
    #[command(flatten)]
    pub common: CommonArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge an extracted message list into translation catalogs
    Update(UpdateCommand),
    /// Permanently remove vanished messages from catalogs
    Prune(PruneCommand),
    /// Check catalogs for malformed structure, plural arity and placeholder mismatches
    Validate(ValidateCommand),
    /// Initialize a new .tscatrc.json configuration file
    Init,
}
