//! Structural catalog checks.
//!
//! Unlike [`crate::catalog::parse`], which stops at the first problem, this
//! reports every duplicate key and plural-arity mismatch in the file.

use crate::catalog::collect_errors;
use crate::issues::CatalogErrorIssue;
use crate::plural::PluralRules;

pub fn check_structure_issues(
    file_path: &str,
    content: &[u8],
    plurals: &dyn PluralRules,
) -> Vec<CatalogErrorIssue> {
    // Line numbers count a lone CR as a line break, like the parser does
    let text = String::from_utf8_lossy(content)
        .replace("\r\n", "\n")
        .replace('\r', "\n");
    let lines: Vec<&str> = text.lines().collect();

    collect_errors(content, plurals)
        .into_iter()
        .map(|error| {
            let source_line = error
                .line()
                .checked_sub(1)
                .and_then(|index| lines.get(index))
                .map(|line| line.trim_end().to_string());
            CatalogErrorIssue {
                file_path: file_path.to_string(),
                error,
                source_line,
            }
        })
        .collect()
}
