//! Issue types reported by the CLI.
//!
//! Each issue is self-contained with everything the reporter needs: the
//! catalog file it belongs to, a line when one is known, and the rule that
//! produced it.

use enum_dispatch::enum_dispatch;

use crate::catalog::ParseError;
use crate::merge::{MergeWarning, MessageRef};

// ============================================================
// Severity and Rule
// ============================================================

/// Severity level of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// Rule identifier for each issue type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Rule {
    MalformedCatalog,
    DuplicateKey,
    PluralArity,
    PlaceholderMismatch,
    DuplicateExtracted,
    Revived,
    PluralChanged,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::MalformedCatalog => write!(f, "malformed-catalog"),
            Rule::DuplicateKey => write!(f, "duplicate-key"),
            Rule::PluralArity => write!(f, "plural-arity"),
            Rule::PlaceholderMismatch => write!(f, "placeholder-mismatch"),
            Rule::DuplicateExtracted => write!(f, "duplicate-extracted"),
            Rule::Revived => write!(f, "revived"),
            Rule::PluralChanged => write!(f, "plural-changed"),
        }
    }
}

// ============================================================
// Issue Types
// ============================================================

/// Structural error found while parsing a catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogErrorIssue {
    pub file_path: String,
    pub error: ParseError,
    /// The offending line of the catalog, for context display.
    pub source_line: Option<String>,
}

impl CatalogErrorIssue {
    pub fn severity() -> Severity {
        Severity::Error
    }
}

/// Finished translation whose placeholders differ from its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderMismatchIssue {
    pub file_path: String,
    pub message: MessageRef,
    /// Index of the offending plural form, `None` for singular messages.
    pub form: Option<usize>,
    /// Placeholders of the source text the translation lacks.
    pub missing: Vec<String>,
    /// Placeholders the translation has that the source text lacks.
    pub unexpected: Vec<String>,
}

impl PlaceholderMismatchIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }

    pub fn rule() -> Rule {
        Rule::PlaceholderMismatch
    }
}

/// Something a merge did that a translator should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeWarningIssue {
    pub file_path: String,
    pub warning: MergeWarning,
}

impl MergeWarningIssue {
    pub fn severity() -> Severity {
        Severity::Warning
    }
}

// ============================================================
// Issue Enum
// ============================================================

#[enum_dispatch(Report)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Issue {
    CatalogError(CatalogErrorIssue),
    PlaceholderMismatch(PlaceholderMismatchIssue),
    MergeWarning(MergeWarningIssue),
}

impl Issue {
    pub fn severity(&self) -> Severity {
        self.report_severity()
    }

    pub fn rule(&self) -> Rule {
        self.report_rule()
    }
}

// ============================================================
// Report Trait (for CLI output)
// ============================================================

/// Where an issue points to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportLocation<'a> {
    pub path: &'a str,
    /// 1-based line, when the issue maps to one.
    pub line: Option<usize>,
    pub source_line: Option<&'a str>,
}

#[enum_dispatch]
pub trait Report {
    fn location(&self) -> ReportLocation<'_>;

    /// Primary message to display.
    fn message(&self) -> String;

    fn report_severity(&self) -> Severity;

    fn report_rule(&self) -> Rule;

    /// Optional details for the "= note:" line.
    fn details(&self) -> Option<String> {
        None
    }

    /// Optional hint for fixing the issue.
    fn hint(&self) -> Option<&str> {
        None
    }
}

impl Report for CatalogErrorIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation {
            path: &self.file_path,
            line: Some(self.error.line()),
            source_line: self.source_line.as_deref(),
        }
    }

    fn message(&self) -> String {
        match &self.error {
            ParseError::MalformedStructure { reason, .. } => reason.clone(),
            ParseError::DuplicateKey { context, key, .. } => format!("{}::{}", context, key),
            ParseError::PluralArityMismatch { context, key, .. } => {
                format!("{}::{}", context, key)
            }
        }
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        match self.error {
            ParseError::MalformedStructure { .. } => Rule::MalformedCatalog,
            ParseError::DuplicateKey { .. } => Rule::DuplicateKey,
            ParseError::PluralArityMismatch { .. } => Rule::PluralArity,
        }
    }

    fn details(&self) -> Option<String> {
        match &self.error {
            ParseError::MalformedStructure { .. } => None,
            ParseError::DuplicateKey { .. } => {
                Some("message appears more than once in its context".to_string())
            }
            ParseError::PluralArityMismatch {
                locale,
                expected,
                found,
                ..
            } => Some(match (locale, expected) {
                (Some(locale), Some(expected)) => format!(
                    "has {} form(s), locale '{}' requires {}",
                    found, locale, expected
                ),
                _ => format!("has {} form(s), which no known locale uses", found),
            }),
        }
    }

    fn hint(&self) -> Option<&str> {
        match self.error {
            ParseError::PluralArityMismatch { .. } => {
                Some("set \"pluralForms\" in .tscatrc.json if the locale uses a different count")
            }
            _ => None,
        }
    }
}

impl Report for PlaceholderMismatchIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation {
            path: &self.file_path,
            line: None,
            source_line: None,
        }
    }

    fn message(&self) -> String {
        self.message.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        Self::rule()
    }

    fn details(&self) -> Option<String> {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!("missing {}", self.missing.join(" ")));
        }
        if !self.unexpected.is_empty() {
            parts.push(format!("unexpected {}", self.unexpected.join(" ")));
        }
        let mut details = parts.join(", ");
        if let Some(form) = self.form {
            details.push_str(&format!(" in plural form {}", form + 1));
        }
        Some(details)
    }
}

impl Report for MergeWarningIssue {
    fn location(&self) -> ReportLocation<'_> {
        ReportLocation {
            path: &self.file_path,
            line: None,
            source_line: None,
        }
    }

    fn message(&self) -> String {
        let message = match &self.warning {
            MergeWarning::DuplicateExtracted(dup) => &dup.message,
            MergeWarning::Revived(message) | MergeWarning::PluralChanged(message) => message,
        };
        message.to_string()
    }

    fn report_severity(&self) -> Severity {
        Self::severity()
    }

    fn report_rule(&self) -> Rule {
        match self.warning {
            MergeWarning::DuplicateExtracted(_) => Rule::DuplicateExtracted,
            MergeWarning::Revived(_) => Rule::Revived,
            MergeWarning::PluralChanged(_) => Rule::PluralChanged,
        }
    }

    fn details(&self) -> Option<String> {
        match &self.warning {
            MergeWarning::DuplicateExtracted(dup) => {
                let describe = |location: &Option<crate::catalog::Location>| {
                    location
                        .as_ref()
                        .map(ToString::to_string)
                        .unwrap_or_else(|| "unknown location".to_string())
                };
                Some(format!(
                    "entry #{} at {} dropped, keeping {}",
                    dup.index,
                    describe(&dup.dropped),
                    describe(&dup.kept)
                ))
            }
            MergeWarning::Revived(_) => {
                Some("reappeared in the source; old translation kept as a draft".to_string())
            }
            MergeWarning::PluralChanged(_) => {
                Some("switched between singular and plural; forms were reshaped".to_string())
            }
        }
    }
}

// ============================================================
// Ordering for Issue (for sorting in reports)
// ============================================================

impl Ord for Issue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        let a = self.location();
        let b = other.location();
        // Sort by: file_path, line (file-level issues first), rule, message
        a.path
            .cmp(b.path)
            .then_with(|| a.line.cmp(&b.line))
            .then_with(|| self.rule().cmp(&other.rule()))
            .then_with(|| self.message().cmp(&other.message()))
    }
}

impl PartialOrd for Issue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}
