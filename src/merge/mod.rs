//! Merge engine.
//!
//! Reconciles a fresh extraction pass with an existing catalog:
//!
//! - messages no longer extracted become vanished (translation kept,
//!   locations cleared)
//! - messages still extracted get fresh locations and developer comments;
//!   vanished ones come back as unfinished with their old text as a draft
//! - new messages are appended unfinished and empty
//!
//! The existing catalog is only borrowed. Every failure is detected before the
//! merged catalog is handed back, so a failed merge leaves nothing half done.

mod report;

use indexmap::IndexMap;
use indexmap::map::Entry;
use thiserror::Error;
use tracing::debug;

pub use report::{DuplicateExtracted, MergeReport, MergeWarning, MessageRef};

use crate::catalog::{Catalog, Forms, Message, MessageKey, PluralForms, Status, Translation};
use crate::extracted::ExtractedMessage;
use crate::plural::{PluralRules, UnknownLocale};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MergeError {
    #[error("catalog has no target language, which plural messages need")]
    MissingLocale,

    #[error(transparent)]
    UnknownLocale(#[from] UnknownLocale),

    #[error("plural rules report {arity} forms for locale '{locale}'")]
    InvalidArity { locale: String, arity: u32 },

    #[error(
        "plural translation of {} has {found} form(s), locale '{locale}' requires {expected}",
        .message
    )]
    PluralArityMismatch {
        message: MessageRef,
        locale: String,
        expected: u32,
        found: usize,
    },
}

/// Merged catalog and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub catalog: Catalog,
    pub report: MergeReport,
}

type ExtractedByContext<'a> = IndexMap<&'a str, IndexMap<MessageKey, &'a ExtractedMessage>>;

/// Merge `extracted` into `existing`.
///
/// Plural arity comes from `plurals` for the catalog's language; it is only
/// looked up when a plural message is involved, and an unknown locale is an
/// error rather than a guess.
pub fn merge(
    existing: &Catalog,
    extracted: &[ExtractedMessage],
    plurals: &dyn PluralRules,
) -> Result<Merged, MergeError> {
    let arity = resolve_arity(existing, extracted, plurals)?;
    if let Some(arity) = arity {
        check_existing_arity(existing, arity)?;
    }

    let mut report = MergeReport::default();
    let unique = dedupe(extracted, &mut report);
    report.found = unique.values().map(IndexMap::len).sum();

    let mut merged = existing.clone();

    for context in merged.contexts_mut() {
        let present = unique.get(context.name());
        let name = context.name().to_string();
        for message in context.messages_mut() {
            if let (Some(arity), Forms::Plural(forms)) = (arity, &mut message.translation.forms)
                && forms.is_empty()
            {
                *forms = PluralForms::empty(arity);
            }
            match present.and_then(|by_key| by_key.get(message.key())) {
                Some(entry) => {
                    report.kept += 1;
                    refresh(message, entry, &name, arity, &mut report)?;
                }
                None => vanish(message, &name, &mut report),
            }
        }
    }

    for (context_name, entries) in &unique {
        let context = merged.upsert_context(context_name);
        for (key, entry) in entries {
            let mut failure = None;
            let (_, inserted) = context.get_or_insert_with(key.clone(), |key| {
                let forms = if entry.plural {
                    match arity {
                        Some(arity) => Forms::Plural(PluralForms::empty(arity)),
                        None => {
                            failure = Some(MergeError::MissingLocale);
                            Forms::Single(String::new())
                        }
                    }
                } else {
                    Forms::Single(String::new())
                };
                let mut message = Message::new(
                    key,
                    entry.plural,
                    Translation::new(Status::Unfinished, forms),
                );
                message.comment = entry.comment.clone();
                message.locations = entry.model_location().into_iter().collect();
                message
            });
            if let Some(err) = failure {
                return Err(err);
            }
            if inserted {
                report.added += 1;
                debug!(context = %context_name, source = %key.source, "new message");
            }
        }
    }

    Ok(Merged {
        catalog: merged,
        report,
    })
}

/// Plural arity for the catalog's language, if any plural message needs it.
fn resolve_arity(
    existing: &Catalog,
    extracted: &[ExtractedMessage],
    plurals: &dyn PluralRules,
) -> Result<Option<u32>, MergeError> {
    let needs_arity = extracted.iter().any(|entry| entry.plural)
        || existing.iter_messages().any(|(_, message)| message.is_plural);
    if !needs_arity {
        return Ok(None);
    }

    let locale = existing
        .language
        .as_deref()
        .ok_or(MergeError::MissingLocale)?;
    let arity = plurals.forms_required(locale)?;
    if arity == 0 {
        return Err(MergeError::InvalidArity {
            locale: locale.to_string(),
            arity,
        });
    }
    Ok(Some(arity))
}

fn check_existing_arity(existing: &Catalog, arity: u32) -> Result<(), MergeError> {
    for (context, message) in existing.iter_messages() {
        if let Forms::Plural(forms) = &message.translation.forms
            && !forms.is_empty()
            && forms.len() != arity as usize
        {
            return Err(MergeError::PluralArityMismatch {
                message: MessageRef::new(context.name(), message.key()),
                locale: existing.language.clone().unwrap_or_default(),
                expected: arity,
                found: forms.len(),
            });
        }
    }
    Ok(())
}

/// Group extracted entries by context, keeping the first occurrence of each key.
fn dedupe<'a>(
    extracted: &'a [ExtractedMessage],
    report: &mut MergeReport,
) -> ExtractedByContext<'a> {
    let mut unique: ExtractedByContext<'a> = IndexMap::new();
    for (index, entry) in extracted.iter().enumerate() {
        let by_key = unique.entry(entry.context.as_str()).or_default();
        match by_key.entry(entry.key()) {
            Entry::Occupied(first) => {
                debug!(
                    context = %entry.context,
                    source = %entry.source,
                    index,
                    "duplicate extracted message"
                );
                report.duplicate_extracted.push(DuplicateExtracted {
                    message: MessageRef::new(&entry.context, first.key()),
                    index,
                    kept: first.get().model_location(),
                    dropped: entry.model_location(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
        }
    }
    unique
}

fn vanish(message: &mut Message, context: &str, report: &mut MergeReport) {
    if message.status() != Status::Vanished {
        debug!(context, source = %message.source(), "message vanished");
        report.vanished.push(MessageRef::new(context, message.key()));
        message.translation.status = Status::Vanished;
    }
    message.locations.clear();
}

fn refresh(
    message: &mut Message,
    entry: &ExtractedMessage,
    context: &str,
    arity: Option<u32>,
    report: &mut MergeReport,
) -> Result<(), MergeError> {
    if message.status() == Status::Vanished {
        debug!(context, source = %message.source(), "vanished message reappeared");
        report.revived.push(MessageRef::new(context, message.key()));
        message.translation.status = Status::Unfinished;
    }

    message.locations = entry.model_location().into_iter().collect();
    message.comment = entry.comment.clone();

    if message.is_plural != entry.plural {
        message.translation.forms = reshape(&message.translation.forms, entry.plural, arity)?;
        message.translation.status = Status::Unfinished;
        message.is_plural = entry.plural;
        report
            .plural_changed
            .push(MessageRef::new(context, message.key()));
    }
    Ok(())
}

/// Convert forms between singular and plural, keeping the first text.
fn reshape(forms: &Forms, plural: bool, arity: Option<u32>) -> Result<Forms, MergeError> {
    let first = match forms {
        Forms::Single(text) => text.clone(),
        Forms::Plural(forms) => forms.first().unwrap_or_default().to_string(),
    };
    if !plural {
        return Ok(Forms::Single(first));
    }
    let arity = arity.ok_or(MergeError::MissingLocale)?;
    let mut reshaped = PluralForms::empty(arity);
    reshaped.set(0, first);
    Ok(Forms::Plural(reshaped))
}
