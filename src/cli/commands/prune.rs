use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::args::PruneCommand;
use super::helper::{CommandContext, finish};
use super::update::write_catalog;
use super::{CatalogFailure, CatalogPrune, CommandResult, CommandSummary, PruneSummary};
use crate::catalog::{PruneReport, SerializeOptions, parse_with, serialize_with};
use crate::plural::PluralRules;

pub fn prune(cmd: PruneCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let plurals = ctx.config.plural_rules();
    let options = SerializeOptions {
        locations: cmd.locations.unwrap_or(ctx.config.locations),
    };

    let results: Vec<Result<(CatalogPrune, PathBuf, Vec<u8>), CatalogFailure>> = ctx
        .catalogs
        .par_iter()
        .map(|path| {
            let shown = ctx.display_path(path);
            match prune_catalog(path, &shown, &plurals, options) {
                Ok((report, bytes)) => Ok((
                    CatalogPrune {
                        path: shown,
                        report,
                    },
                    path.clone(),
                    bytes,
                )),
                Err(err) => Err(CatalogFailure {
                    path: shown,
                    error: format!("{:#}", err),
                }),
            }
        })
        .collect();

    let mut catalogs = Vec::new();
    let mut writes = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok((prune, path, bytes)) => {
                if !prune.report.removed.is_empty() {
                    writes.push((path, bytes));
                }
                catalogs.push(prune);
            }
            Err(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() && !cmd.dry_run {
        for (path, bytes) in &writes {
            write_catalog(path, bytes)?;
        }
    }

    Ok(finish(
        CommandSummary::Prune(PruneSummary {
            catalogs,
            failures,
            is_dry_run: cmd.dry_run,
        }),
        Vec::new(),
    ))
}

fn prune_catalog(
    path: &Path,
    shown: &str,
    plurals: &dyn PluralRules,
    options: SerializeOptions,
) -> Result<(PruneReport, Vec<u8>)> {
    let content = fs::read(path).with_context(|| format!("Failed to read catalog: {}", shown))?;
    let mut catalog = parse_with(&content, plurals)
        .with_context(|| format!("Failed to parse catalog: {}", shown))?;
    let report = catalog.prune_vanished();
    Ok((report, serialize_with(&catalog, options)))
}
