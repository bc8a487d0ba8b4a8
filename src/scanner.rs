//! Catalog discovery from the `catalogs` patterns of `.tscatrc.json`.

use std::{
    collections::BTreeSet,
    path::{Path, PathBuf},
};

use glob::{Pattern, glob};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Check if a pattern contains glob wildcards (* or ?).
/// Patterns without wildcards are treated as literal file or directory paths.
fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains('*') || pattern.contains('?')
}

/// Result of scanning for catalogs.
pub struct ScanResult {
    /// Catalog paths, sorted and deduplicated.
    pub files: Vec<PathBuf>,
    pub skipped_count: usize,
}

pub fn scan_catalogs(base_dir: &Path, patterns: &[String], ignores: &[String]) -> ScanResult {
    let mut files: BTreeSet<PathBuf> = BTreeSet::new();
    let mut skipped_count = 0;

    let ignore_patterns: Vec<Pattern> = ignores
        .iter()
        .filter_map(|p| match Pattern::new(p) {
            Ok(pattern) => Some(pattern),
            Err(e) => {
                warn!(pattern = %p, error = %e, "invalid ignore pattern");
                None
            }
        })
        .collect();
    let is_ignored = |path: &Path| {
        let relative = path.strip_prefix(base_dir).unwrap_or(path);
        ignore_patterns
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    };

    for pattern in patterns {
        let mut candidates: Vec<PathBuf> = Vec::new();
        if is_glob_pattern(pattern) {
            let full_pattern = base_dir.join(pattern);
            match glob(&full_pattern.to_string_lossy()) {
                Ok(entries) => {
                    for entry in entries {
                        match entry {
                            Ok(path) => candidates.push(path),
                            Err(e) => {
                                skipped_count += 1;
                                debug!(error = %e, "cannot access path");
                            }
                        }
                    }
                }
                Err(e) => warn!(pattern = %pattern, error = %e, "invalid catalog pattern"),
            }
        } else {
            let path = base_dir.join(pattern);
            if path.exists() {
                candidates.push(path);
            } else {
                warn!(path = %path.display(), "catalog path does not exist");
            }
        }

        for candidate in candidates {
            if candidate.is_dir() {
                for entry in WalkDir::new(&candidate) {
                    let entry = match entry {
                        Ok(e) => e,
                        Err(e) => {
                            skipped_count += 1;
                            debug!(error = %e, "cannot access path");
                            continue;
                        }
                    };
                    let path = entry.path();
                    if path.is_file() && is_catalog_file(path) && !is_ignored(path) {
                        files.insert(path.to_path_buf());
                    }
                }
            } else if candidate.is_file() && is_catalog_file(&candidate) && !is_ignored(&candidate)
            {
                files.insert(candidate);
            }
        }
    }

    ScanResult {
        files: files.into_iter().collect(),
        skipped_count,
    }
}

fn is_catalog_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|e| e.to_str()), Some("ts"))
}
