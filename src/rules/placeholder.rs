//! Placeholder consistency rule.
//!
//! A finished translation should carry the same place markers as its source
//! text: Qt's `%1`..`%99` (with or without the `L` locale flag), `%n` for
//! plural counts, and printf conversions such as `%u`, `%lu` or `%s`. Order
//! does not matter, multiplicity does.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::{Catalog, Forms, Status};
use crate::issues::PlaceholderMismatchIssue;
use crate::merge::MessageRef;

static PLACEHOLDER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"%(?:%|L?n|L?[1-9][0-9]?|l{0,2}[dusxXcpfi])").unwrap()
});

type Placeholders = BTreeMap<String, usize>;

/// Count the placeholders in `text`, folding `%L1` into `%1` and `%Ln` into `%n`.
pub fn placeholders(text: &str) -> Placeholders {
    let mut found = Placeholders::new();
    for m in PLACEHOLDER_REGEX.find_iter(text) {
        let token = m.as_str().replacen("%L", "%", 1);
        *found.entry(token).or_default() += 1;
    }
    found
}

pub fn check_placeholder_issues(
    file_path: &str,
    catalog: &Catalog,
) -> Vec<PlaceholderMismatchIssue> {
    let mut issues = Vec::new();

    for (context, message) in catalog.iter_messages() {
        if message.status() != Status::Finished || message.translation.forms.is_blank() {
            continue;
        }
        let expected = placeholders(message.source());

        let forms: Vec<(Option<usize>, &str)> = match &message.translation.forms {
            Forms::Single(text) => vec![(None, text.as_str())],
            Forms::Plural(forms) => forms
                .iter()
                .enumerate()
                .map(|(i, text)| (Some(i), text.as_str()))
                .collect(),
        };

        for (form, text) in forms {
            if text.is_empty() {
                continue;
            }
            let (missing, unexpected) = compare(&expected, &placeholders(text), form.is_some());
            if missing.is_empty() && unexpected.is_empty() {
                continue;
            }
            issues.push(PlaceholderMismatchIssue {
                file_path: file_path.to_string(),
                message: MessageRef::new(context.name(), message.key()),
                form,
                missing,
                unexpected,
            });
        }
    }

    issues
}

/// Placeholders `expected` has more of than `actual`, and the reverse.
///
/// A plural form may leave out `%n` entirely ("one file" rather than "%n file").
fn compare(
    expected: &Placeholders,
    actual: &Placeholders,
    plural_form: bool,
) -> (Vec<String>, Vec<String>) {
    let surplus = |a: &Placeholders, b: &Placeholders| {
        a.iter()
            .filter_map(|(token, count)| {
                let other = b.get(token).copied().unwrap_or(0);
                (*count > other).then(|| vec![token.clone(); count - other])
            })
            .flatten()
            .collect::<Vec<_>>()
    };

    let mut missing = surplus(expected, actual);
    let unexpected = surplus(actual, expected);
    if plural_form {
        missing.retain(|token| token != "%n");
    }
    (missing, unexpected)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Message, MessageKey, Translation};
    use pretty_assertions::assert_eq;

    fn catalog_with(source: &str, plural: bool, translation: Translation) -> Catalog {
        let mut catalog = Catalog::new(Some("ru".into()));
        catalog
            .upsert_context("Host")
            .insert(Message::new(MessageKey::new(source, None), plural, translation))
            .unwrap();
        catalog
    }

    #[test]
    fn test_placeholders_counts_tokens() {
        let found = placeholders("%1 of %L2 (%1), %lu bytes, %llu total, 50%%");
        assert_eq!(found.get("%1"), Some(&2));
        assert_eq!(found.get("%2"), Some(&1));
        assert_eq!(found.get("%lu"), Some(&1));
        assert_eq!(found.get("%llu"), Some(&1));
        assert_eq!(found.get("%%"), Some(&1));
        assert_eq!(found.len(), 5);
    }

    #[test]
    fn test_reordered_placeholders_match() {
        let catalog = catalog_with(
            "Copying %1 to %2",
            false,
            Translation::finished("В %2 копируется %1"),
        );
        assert!(check_placeholder_issues("app_ru.ts", &catalog).is_empty());
    }

    #[test]
    fn test_missing_and_unexpected() {
        let catalog = catalog_with(
            "CPU no.%u is not present",
            false,
            Translation::finished("Процессор %d отсутствует"),
        );
        let issues = check_placeholder_issues("app_ru.ts", &catalog);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].missing, vec!["%u"]);
        assert_eq!(issues[0].unexpected, vec!["%d"]);
        assert_eq!(issues[0].form, None);
    }

    #[test]
    fn test_unfinished_translations_are_skipped() {
        let catalog = catalog_with(
            "Copying %1",
            false,
            Translation::new(Status::Unfinished, Forms::Single("Копирование".into())),
        );
        assert!(check_placeholder_issues("app_ru.ts", &catalog).is_empty());
    }

    #[test]
    fn test_plural_forms_may_drop_count() {
        let catalog = catalog_with(
            "%n CPU(s) on %1",
            true,
            Translation::finished_plural(vec![
                "один процессор на %1".into(),
                "%n процессора на %1".into(),
                "%n процессоров".into(),
            ]),
        );
        let issues = check_placeholder_issues("app_ru.ts", &catalog);

        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].form, Some(2));
        assert_eq!(issues[0].missing, vec!["%1"]);
        assert!(issues[0].unexpected.is_empty());
    }
}
