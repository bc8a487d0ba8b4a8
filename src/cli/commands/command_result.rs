use crate::catalog::{CatalogStats, PruneReport};
use crate::issues::Issue;
use crate::merge::MergeReport;

#[derive(Debug)]
pub enum CommandSummary {
    Update(UpdateSummary),
    Prune(PruneSummary),
    Validate(ValidateSummary),
    Init(InitSummary),
}

/// What happened to one catalog during `update`.
#[derive(Debug)]
pub struct CatalogUpdate {
    pub path: String,
    pub created: bool,
    /// False when the serialized catalog is byte-identical to the file on disk.
    pub changed: bool,
    pub report: MergeReport,
    /// Vanished messages removed by `--no-obsolete`.
    pub pruned: usize,
    pub stats: CatalogStats,
}

/// A catalog a command could not process.
#[derive(Debug)]
pub struct CatalogFailure {
    pub path: String,
    pub error: String,
}

#[derive(Debug)]
pub struct UpdateSummary {
    pub catalogs: Vec<CatalogUpdate>,
    pub failures: Vec<CatalogFailure>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct CatalogPrune {
    pub path: String,
    pub report: PruneReport,
}

#[derive(Debug)]
pub struct PruneSummary {
    pub catalogs: Vec<CatalogPrune>,
    pub failures: Vec<CatalogFailure>,
    pub is_dry_run: bool,
}

#[derive(Debug)]
pub struct ValidateSummary {
    pub catalog_count: usize,
    /// Totals over every catalog that parsed.
    pub stats: CatalogStats,
}

#[derive(Debug)]
pub struct InitSummary {
    pub created: bool,
    pub error: Option<String>,
}

/// Result of running a tscat command
pub struct CommandResult {
    pub summary: CommandSummary,
    pub error_count: usize,
    pub warning_count: usize,
    /// Issues found while running the command, sorted for display.
    pub issues: Vec<Issue>,
}
