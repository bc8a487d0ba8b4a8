use std::fs;

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::debug;

use super::super::args::ValidateCommand;
use super::helper::{CommandContext, finish};
use super::{CommandResult, CommandSummary, ValidateSummary};
use crate::catalog::{CatalogStats, parse_with};
use crate::issues::Issue;
use crate::rules::{check_placeholder_issues, check_structure_issues};

pub fn validate(cmd: ValidateCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let plurals = ctx.config.plural_rules();

    let checked: Vec<(Vec<Issue>, Option<CatalogStats>)> = ctx
        .catalogs
        .par_iter()
        .map(|path| -> Result<_> {
            let shown = ctx.display_path(path);
            let content =
                fs::read(path).with_context(|| format!("Failed to read catalog: {}", shown))?;

            let structure = check_structure_issues(&shown, &content, &plurals);
            if !structure.is_empty() {
                debug!(path = %shown, errors = structure.len(), "catalog has structural errors");
                return Ok((structure.into_iter().map(Issue::CatalogError).collect(), None));
            }

            // A catalog without structural errors always parses.
            let catalog = parse_with(&content, &plurals)
                .with_context(|| format!("Failed to parse catalog: {}", shown))?;
            let issues = check_placeholder_issues(&shown, &catalog)
                .into_iter()
                .map(Issue::PlaceholderMismatch)
                .collect();
            Ok((issues, Some(catalog.stats())))
        })
        .collect::<Result<_>>()?;

    let mut stats = CatalogStats::default();
    let mut issues = Vec::new();
    for (catalog_issues, catalog_stats) in checked {
        issues.extend(catalog_issues);
        if let Some(s) = catalog_stats {
            stats.finished += s.finished;
            stats.unfinished += s.unfinished;
            stats.vanished += s.vanished;
            stats.plural += s.plural;
        }
    }

    Ok(finish(
        CommandSummary::Validate(ValidateSummary {
            catalog_count: ctx.catalogs.len(),
            stats,
        }),
        issues,
    ))
}
