use std::fmt;

use crate::catalog::{Location, MessageKey};

/// A message identified by context and key, for reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub context: String,
    pub key: MessageKey,
}

impl MessageRef {
    pub fn new(context: &str, key: &MessageKey) -> Self {
        Self {
            context: context.to_string(),
            key: key.clone(),
        }
    }
}

impl fmt::Display for MessageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.context, self.key)
    }
}

/// An extracted entry whose key was already seen earlier in the same list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateExtracted {
    pub message: MessageRef,
    /// Position of the dropped entry in the extracted list.
    pub index: usize,
    /// Location of the first occurrence, which is the one kept.
    pub kept: Option<Location>,
    pub dropped: Option<Location>,
}

/// Non-fatal findings of a merge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeWarning {
    DuplicateExtracted(DuplicateExtracted),
    /// A vanished message reappeared; it is unfinished again with its old
    /// translation kept as a draft.
    Revived(MessageRef),
    /// The message switched between singular and plural; its forms were
    /// reshaped and it needs review.
    PluralChanged(MessageRef),
}

impl fmt::Display for MergeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeWarning::DuplicateExtracted(dup) => write!(
                f,
                "{} extracted more than once (entry #{}), keeping the first occurrence",
                dup.message, dup.index
            ),
            MergeWarning::Revived(message) => {
                write!(f, "{} reappeared and needs to be confirmed again", message)
            }
            MergeWarning::PluralChanged(message) => {
                write!(f, "{} changed plural form and needs review", message)
            }
        }
    }
}

/// Outcome of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    /// Distinct messages in the extracted list.
    pub found: usize,
    /// Messages created by this pass.
    pub added: usize,
    /// Existing messages still reported by the extractor (revived included).
    pub kept: usize,
    /// Messages that became vanished in this pass.
    pub vanished: Vec<MessageRef>,
    /// Vanished messages that reappeared.
    pub revived: Vec<MessageRef>,
    pub plural_changed: Vec<MessageRef>,
    pub duplicate_extracted: Vec<DuplicateExtracted>,
}

impl MergeReport {
    pub fn warnings(&self) -> Vec<MergeWarning> {
        self.duplicate_extracted
            .iter()
            .cloned()
            .map(MergeWarning::DuplicateExtracted)
            .chain(self.revived.iter().cloned().map(MergeWarning::Revived))
            .chain(
                self.plural_changed
                    .iter()
                    .cloned()
                    .map(MergeWarning::PluralChanged),
            )
            .collect()
    }
}
