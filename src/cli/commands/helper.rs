use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, bail};
use tracing::debug;

use super::{CommandResult, CommandSummary};
use crate::cli::args::CommonArgs;
use crate::config::{CONFIG_FILE_NAME, Config, load_config};
use crate::issues::{Issue, Severity};
use crate::scanner::scan_catalogs;

/// Configuration and catalog list shared by the catalog commands.
pub struct CommandContext {
    pub cwd: PathBuf,
    pub config: Config,
    pub catalogs: Vec<PathBuf>,
}

impl CommandContext {
    pub fn new(common: &CommonArgs) -> Result<Self> {
        let cwd = env::current_dir().context("Failed to determine current directory")?;
        let loaded = load_config(&cwd)?;
        if loaded.from_file {
            debug!(root = %loaded.root.display(), "loaded {}", CONFIG_FILE_NAME);
        }

        let catalogs = if !common.catalogs.is_empty() {
            common.catalogs.iter().map(|path| cwd.join(path)).collect()
        } else if !loaded.config.catalogs.is_empty() {
            let scan = scan_catalogs(&loaded.root, &loaded.config.catalogs, &loaded.config.ignores);
            if scan.skipped_count > 0 {
                debug!(count = scan.skipped_count, "skipped unreadable paths");
            }
            scan.files
        } else {
            bail!(
                "No catalogs given. Pass catalog paths or set \"catalogs\" in {}",
                CONFIG_FILE_NAME
            );
        };

        Ok(Self {
            cwd,
            config: loaded.config,
            catalogs,
        })
    }

    /// Path as shown to the user: relative to the working directory when possible.
    pub fn display_path(&self, path: &Path) -> String {
        path.strip_prefix(&self.cwd)
            .unwrap_or(path)
            .to_string_lossy()
            .replace('\\', "/")
    }
}

pub fn finish(summary: CommandSummary, mut issues: Vec<Issue>) -> CommandResult {
    issues.sort();

    let mut error_count = issues
        .iter()
        .filter(|i| i.severity() == Severity::Error)
        .count();
    let warning_count = issues.len() - error_count;

    match &summary {
        CommandSummary::Init(summary) if summary.error.is_some() => error_count += 1,
        CommandSummary::Update(summary) => error_count += summary.failures.len(),
        CommandSummary::Prune(summary) => error_count += summary.failures.len(),
        _ => {}
    }

    CommandResult {
        summary,
        error_count,
        warning_count,
        issues,
    }
}
