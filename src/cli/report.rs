//! Report formatting and printing utilities.
//!
//! Issues are displayed in cargo-style format; command summaries follow the
//! wording Qt's own `lupdate` uses so the output reads familiar to
//! translators. Kept apart from command logic so tscat can be used as a
//! library.

use std::io::{self, Write};

use colored::Colorize;
use unicode_width::UnicodeWidthStr;

use super::commands::{
    CatalogFailure, CommandResult, CommandSummary, InitSummary, PruneSummary, UpdateSummary,
    ValidateSummary,
};
use crate::catalog::CatalogStats;
use crate::config::CONFIG_FILE_NAME;
use crate::issues::{Issue, Report, Severity};

/// Success mark for consistent output formatting.
pub const SUCCESS_MARK: &str = "\u{2713}"; // ✓

/// Failure mark for consistent output formatting.
pub const FAILURE_MARK: &str = "\u{2718}"; // ✘

/// Print issues in cargo-style format to a custom writer.
pub fn report_to<W: Write>(issues: &[Issue], writer: &mut W) {
    if issues.is_empty() {
        return;
    }

    let mut sorted = issues.to_vec();
    sorted.sort();

    let max_line_width = calculate_max_line_width(&sorted);

    for issue in &sorted {
        print_issue(issue, writer, max_line_width);
    }

    print_summary(&sorted, writer);
}

pub fn print(result: &CommandResult) {
    let stdout = &mut io::stdout().lock();
    match &result.summary {
        CommandSummary::Update(summary) => print_update_to(summary, &result.issues, stdout),
        CommandSummary::Prune(summary) => print_prune_to(summary, stdout),
        CommandSummary::Validate(summary) => print_validate_to(summary, &result.issues, stdout),
        CommandSummary::Init(summary) => print_init(summary),
    }
}

// ============================================================
// Issues
// ============================================================

fn print_issue<W: Write>(issue: &Issue, writer: &mut W, max_line_width: usize) {
    let loc = issue.location();

    let severity = issue.report_severity();
    let severity_str = match severity {
        Severity::Error => "error".bold().red(),
        Severity::Warning => "warning".bold().yellow(),
    };

    let _ = writeln!(
        writer,
        "{}: {}  {}",
        severity_str,
        issue.message(),
        issue.report_rule().to_string().dimmed().cyan()
    );

    match loc.line {
        Some(line) => {
            let _ = writeln!(writer, "  {} {}:{}", "-->".blue(), loc.path, line);
        }
        None => {
            let _ = writeln!(writer, "  {} {}", "-->".blue(), loc.path);
        }
    }

    if let (Some(line), Some(source_line)) = (loc.line, loc.source_line) {
        let caret_char = match severity {
            Severity::Error => "^".red(),
            Severity::Warning => "^".yellow(),
        };

        let _ = writeln!(
            writer,
            "{:>width$} {}",
            "",
            "|".blue(),
            width = max_line_width
        );
        let _ = writeln!(
            writer,
            "{:>width$} {} {}",
            line.to_string().blue(),
            "|".blue(),
            source_line,
            width = max_line_width
        );

        // Caret under the first non-blank character of the line
        let indent = &source_line[..source_line.len() - source_line.trim_start().len()];
        let caret_padding = UnicodeWidthStr::width(indent);
        let _ = writeln!(
            writer,
            "{:>width$} {} {:>padding$}{}",
            "",
            "|".blue(),
            "",
            caret_char,
            width = max_line_width,
            padding = caret_padding
        );
    }

    if let Some(details) = issue.details() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "note:".bold(),
            details,
            width = max_line_width
        );
    }

    if let Some(hint) = issue.hint() {
        let _ = writeln!(
            writer,
            "{:>width$} {} {} {}",
            "",
            "=".blue(),
            "hint:".bold().cyan(),
            hint,
            width = max_line_width
        );
    }

    let _ = writeln!(writer); // Empty line between issues
}

fn print_summary<W: Write>(issues: &[Issue], writer: &mut W) {
    let total_errors = issues
        .iter()
        .filter(|i| i.report_severity() == Severity::Error)
        .count();
    let total_warnings = issues.len() - total_errors;
    let total_problems = total_errors + total_warnings;

    if total_problems > 0 {
        let _ = writeln!(
            writer,
            "{} {} problems ({} {}, {} {})",
            FAILURE_MARK.red(),
            total_problems,
            total_errors,
            if total_errors == 1 { "error" } else { "errors" }.red(),
            total_warnings,
            if total_warnings == 1 {
                "warning"
            } else {
                "warnings"
            }
            .yellow()
        );
    }
}

fn calculate_max_line_width(issues: &[Issue]) -> usize {
    issues
        .iter()
        .filter_map(|i| i.location().line)
        .max()
        .map(|n| n.to_string().len())
        .unwrap_or(1)
}

// ============================================================
// Command summaries
// ============================================================

fn print_failures<W: Write>(failures: &[CatalogFailure], writer: &mut W) {
    for failure in failures {
        let _ = writeln!(
            writer,
            "{}: {}",
            "error".bold().red(),
            failure.error
        );
        let _ = writeln!(writer, "  {} {}", "-->".blue(), failure.path);
        let _ = writeln!(writer);
    }
}

pub fn print_update_to<W: Write>(summary: &UpdateSummary, issues: &[Issue], writer: &mut W) {
    for catalog in &summary.catalogs {
        let verb = if catalog.created { "Creating" } else { "Updating" };
        let report = &catalog.report;
        let _ = writeln!(writer, "{} '{}'...", verb, catalog.path);
        let _ = writeln!(
            writer,
            "    Found {} source text(s) ({} new and {} already existing)",
            report.found,
            report.added,
            report.found - report.added
        );
        if catalog.stats.vanished > 0 {
            let _ = writeln!(
                writer,
                "    Kept {} obsolete entries",
                catalog.stats.vanished
            );
        }
        if catalog.pruned > 0 {
            let _ = writeln!(writer, "    Removed {} obsolete entries", catalog.pruned);
        }
    }
    if !summary.catalogs.is_empty() {
        let _ = writeln!(writer);
    }

    print_failures(&summary.failures, writer);
    report_to(issues, writer);

    if !summary.failures.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} catalog(s) could not be updated; no catalog was written",
                summary.failures.len()
            )
            .red()
        );
        return;
    }

    let changed = summary.catalogs.iter().filter(|c| c.changed).count();
    if changed == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "All catalogs are up to date".green()
        );
    } else if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "{} {} catalog(s).",
            "Would write".yellow().bold(),
            changed
        );
        let _ = writeln!(writer, "Run without {} to write them.", "--dry-run".cyan());
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Wrote {} catalog(s)", changed).green()
        );
    }
}

pub fn print_prune_to<W: Write>(summary: &PruneSummary, writer: &mut W) {
    let mut total = 0;
    let mut touched = 0;
    for catalog in &summary.catalogs {
        let removed = &catalog.report.removed;
        if removed.is_empty() {
            continue;
        }
        total += removed.len();
        touched += 1;
        let _ = writeln!(
            writer,
            "Pruning '{}'... {} obsolete message(s)",
            catalog.path,
            removed.len()
        );
        for (context, key) in removed {
            let _ = writeln!(writer, "  - {}::{}", context, key);
        }
        for context in &catalog.report.removed_contexts {
            let _ = writeln!(writer, "  - context {} (now empty)", context);
        }
    }
    if total > 0 {
        let _ = writeln!(writer);
    }

    print_failures(&summary.failures, writer);

    if !summary.failures.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            FAILURE_MARK.red(),
            format!(
                "{} catalog(s) could not be pruned; no catalog was written",
                summary.failures.len()
            )
            .red()
        );
    } else if total == 0 {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            "No obsolete messages found".green()
        );
    } else if summary.is_dry_run {
        let _ = writeln!(
            writer,
            "{} {} message(s) from {} catalog(s).",
            "Would remove".yellow().bold(),
            total,
            touched
        );
        let _ = writeln!(writer, "Run without {} to remove them.", "--dry-run".cyan());
    } else {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Removed {} message(s) from {} catalog(s)", total, touched).green()
        );
    }
}

pub fn print_validate_to<W: Write>(summary: &ValidateSummary, issues: &[Issue], writer: &mut W) {
    report_to(issues, writer);
    print_stats_to(&summary.stats, writer);

    if issues.is_empty() {
        let _ = writeln!(
            writer,
            "{} {}",
            SUCCESS_MARK.green(),
            format!(
                "Checked {} {} - no issues found",
                summary.catalog_count,
                if summary.catalog_count == 1 {
                    "catalog"
                } else {
                    "catalogs"
                }
            )
            .green()
        );
    }
}

fn print_stats_to<W: Write>(stats: &CatalogStats, writer: &mut W) {
    let _ = writeln!(
        writer,
        "{} message(s): {} finished, {} unfinished, {} vanished",
        stats.total(),
        stats.finished,
        stats.unfinished,
        stats.vanished
    );
}

fn print_init(summary: &InitSummary) {
    if let Some(error) = &summary.error {
        eprintln!("Error: {}", error);
    } else if summary.created {
        println!(
            "{} {}",
            SUCCESS_MARK.green(),
            format!("Created {}", CONFIG_FILE_NAME).green()
        );
    }
}
