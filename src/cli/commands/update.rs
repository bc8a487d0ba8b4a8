use std::{fs, path::Path};

use anyhow::{Context, Result};
use rayon::prelude::*;
use tracing::{debug, info};

use super::super::args::UpdateCommand;
use super::helper::{CommandContext, finish};
use super::{CatalogFailure, CatalogUpdate, CommandResult, CommandSummary, UpdateSummary};
use crate::catalog::{Catalog, SerializeOptions, parse_with, serialize_with};
use crate::extracted::{ExtractedMessage, load_extracted};
use crate::issues::{Issue, MergeWarningIssue};
use crate::merge::merge;
use crate::plural::PluralRules;
use crate::utils::locale_from_file_name;

/// A merged catalog ready to be written.
struct Planned {
    update: CatalogUpdate,
    target: std::path::PathBuf,
    bytes: Vec<u8>,
}

pub fn update(cmd: UpdateCommand) -> Result<CommandResult> {
    let ctx = CommandContext::new(&cmd.common)?;
    let extracted = load_extracted(&ctx.cwd.join(&cmd.from))?;
    let plurals = ctx.config.plural_rules();
    let options = SerializeOptions {
        locations: cmd.locations.unwrap_or(ctx.config.locations),
    };
    info!(
        messages = extracted.len(),
        catalogs = ctx.catalogs.len(),
        "updating catalogs"
    );

    // Every catalog is merged before anything is written.
    let results: Vec<Result<Planned, CatalogFailure>> = ctx
        .catalogs
        .par_iter()
        .map(|path| {
            let shown = ctx.display_path(path);
            plan(&ctx, &cmd, path, &shown, &extracted, &plurals, options).map_err(|err| {
                CatalogFailure {
                    path: shown,
                    error: format!("{:#}", err),
                }
            })
        })
        .collect();

    let mut planned = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(p) => planned.push(p),
            Err(failure) => failures.push(failure),
        }
    }

    if failures.is_empty() && !cmd.dry_run {
        for p in planned.iter().filter(|p| p.update.changed) {
            write_catalog(&p.target, &p.bytes)?;
        }
    }

    let issues: Vec<Issue> = planned
        .iter()
        .flat_map(|p| {
            p.update.report.warnings().into_iter().map(|warning| {
                Issue::MergeWarning(MergeWarningIssue {
                    file_path: p.update.path.clone(),
                    warning,
                })
            })
        })
        .collect();

    Ok(finish(
        CommandSummary::Update(UpdateSummary {
            catalogs: planned.into_iter().map(|p| p.update).collect(),
            failures,
            is_dry_run: cmd.dry_run,
        }),
        issues,
    ))
}

fn plan(
    ctx: &CommandContext,
    cmd: &UpdateCommand,
    path: &Path,
    shown: &str,
    extracted: &[ExtractedMessage],
    plurals: &dyn PluralRules,
    options: SerializeOptions,
) -> Result<Planned> {
    let (existing, original) = if path.exists() {
        let original =
            fs::read(path).with_context(|| format!("Failed to read catalog: {}", shown))?;
        let catalog = parse_with(&original, plurals)
            .with_context(|| format!("Failed to parse catalog: {}", shown))?;
        (catalog, Some(original))
    } else {
        // An empty tag reads back as no language at all
        let language = match cmd.locale.as_deref() {
            Some(locale) => non_empty(locale),
            None => locale_from_file_name(path),
        };
        debug!(path = shown, language = ?language, "creating new catalog");
        let mut catalog = Catalog::new(language);
        catalog.source_language = non_empty(&ctx.config.source_language);
        (catalog, None)
    };

    let mut merged = merge(&existing, extracted, plurals)
        .with_context(|| format!("Failed to merge into catalog: {}", shown))?;

    let pruned = if cmd.no_obsolete {
        merged.catalog.prune_vanished().removed.len()
    } else {
        0
    };

    let bytes = serialize_with(&merged.catalog, options);
    let changed = original.as_deref() != Some(bytes.as_slice());

    Ok(Planned {
        update: CatalogUpdate {
            path: shown.to_string(),
            created: original.is_none(),
            changed,
            stats: merged.catalog.stats(),
            report: merged.report,
            pruned,
        },
        target: path.to_path_buf(),
        bytes,
    })
}

fn non_empty(value: &str) -> Option<String> {
    Some(value.trim())
        .filter(|v| !v.is_empty())
        .map(String::from)
}

pub(super) fn write_catalog(path: &Path, bytes: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, bytes).with_context(|| format!("Failed to write catalog: {}", path.display()))
}
