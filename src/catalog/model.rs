//! In-memory catalog model.
//!
//! A [`Catalog`] owns an ordered map of [`Context`]s, and each context owns an
//! ordered map of [`Message`]s keyed by `(source, disambiguation)`. Insertion
//! order is the serialization order, so equality is order-sensitive.

use std::fmt;

use indexmap::map::Entry;
use indexmap::{Equivalent, IndexMap};
use thiserror::Error;

/// Default TS format version written into new catalogs.
pub const DEFAULT_TS_VERSION: &str = "2.1";

// ============================================================
// Status and Translation
// ============================================================

/// Lifecycle status of a translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Status {
    /// Approved by a translator.
    Finished,
    /// New, changed, or revived; needs a translator.
    Unfinished,
    /// No longer reported by the extractor; content kept for recovery.
    Vanished,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Finished => write!(f, "finished"),
            Status::Unfinished => write!(f, "unfinished"),
            Status::Vanished => write!(f, "vanished"),
        }
    }
}

/// Fixed-length list of plural translations, one per locale category.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PluralForms(Box<[String]>);

impl PluralForms {
    /// `arity` empty forms.
    pub fn empty(arity: u32) -> Self {
        Self(vec![String::new(); arity as usize].into_boxed_slice())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = &String> {
        self.0.iter()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    /// Replace the form at `index`, keeping the arity.
    pub fn set(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.0.get_mut(index) {
            Some(slot) => {
                *slot = text.into();
                true
            }
            None => false,
        }
    }
}

impl From<Vec<String>> for PluralForms {
    fn from(forms: Vec<String>) -> Self {
        Self(forms.into_boxed_slice())
    }
}

/// Translated text of a message.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Forms {
    Single(String),
    Plural(PluralForms),
}

impl Forms {
    /// Empty forms shaped for a message: a scalar, or `arity` plural slots.
    pub fn empty(arity: Option<u32>) -> Self {
        match arity {
            Some(arity) => Forms::Plural(PluralForms::empty(arity)),
            None => Forms::Single(String::new()),
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Forms::Single(text) => text.is_empty(),
            Forms::Plural(forms) => forms.iter().all(String::is_empty),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Translation {
    pub status: Status,
    pub forms: Forms,
}

impl Translation {
    pub fn new(status: Status, forms: Forms) -> Self {
        Self { status, forms }
    }

    /// Unfinished and empty, the state of a newly extracted message.
    pub fn unfinished(arity: Option<u32>) -> Self {
        Self::new(Status::Unfinished, Forms::empty(arity))
    }

    pub fn finished(text: impl Into<String>) -> Self {
        Self::new(Status::Finished, Forms::Single(text.into()))
    }

    pub fn finished_plural(forms: Vec<String>) -> Self {
        Self::new(Status::Finished, Forms::Plural(forms.into()))
    }
}

// ============================================================
// Message
// ============================================================

/// A reference into the source code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Location {
    pub file: String,
    pub line: Option<u32>,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }

    pub fn file_only(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            line: None,
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// Identity of a message within its context.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageKey {
    pub source: String,
    pub disambiguation: Option<String>,
}

impl MessageKey {
    pub fn new(source: impl Into<String>, disambiguation: Option<String>) -> Self {
        Self {
            source: source.into(),
            disambiguation: normalize_disambiguation(disambiguation),
        }
    }

    fn borrowed(&self) -> KeyRef<'_> {
        KeyRef {
            source: &self.source,
            disambiguation: self.disambiguation.as_deref(),
        }
    }
}

impl fmt::Display for MessageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.disambiguation {
            Some(disambiguation) => write!(f, "\"{}\" ({})", self.source, disambiguation),
            None => write!(f, "\"{}\"", self.source),
        }
    }
}

/// Borrowed lookup key. Field order and types mirror [`MessageKey`] so both
/// hash identically.
#[derive(Hash)]
struct KeyRef<'a> {
    source: &'a str,
    disambiguation: Option<&'a str>,
}

impl Equivalent<MessageKey> for KeyRef<'_> {
    fn equivalent(&self, key: &MessageKey) -> bool {
        self.source == key.source && self.disambiguation == key.disambiguation.as_deref()
    }
}

fn normalize_disambiguation(disambiguation: Option<String>) -> Option<String> {
    disambiguation.filter(|d| !d.is_empty())
}

fn key_ref<'a>(source: &'a str, disambiguation: Option<&'a str>) -> KeyRef<'a> {
    KeyRef {
        source,
        disambiguation: disambiguation.filter(|d| !d.is_empty()),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    key: MessageKey,
    /// Developer comment supplied by the extractor.
    pub comment: Option<String>,
    /// Note left by a translator; never touched by merges.
    pub translator_comment: Option<String>,
    pub locations: Vec<Location>,
    pub is_plural: bool,
    pub translation: Translation,
}

impl Message {
    pub fn new(key: MessageKey, is_plural: bool, translation: Translation) -> Self {
        Self {
            key,
            comment: None,
            translator_comment: None,
            locations: Vec::new(),
            is_plural,
            translation,
        }
    }

    pub fn key(&self) -> &MessageKey {
        &self.key
    }

    pub fn source(&self) -> &str {
        &self.key.source
    }

    pub fn disambiguation(&self) -> Option<&str> {
        self.key.disambiguation.as_deref()
    }

    pub fn status(&self) -> Status {
        self.translation.status
    }
}

// ============================================================
// Context
// ============================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("duplicate message {key} in context '{context}'")]
pub struct DuplicateMessage {
    pub context: String,
    pub key: MessageKey,
}

#[derive(Debug, Clone, Default)]
pub struct Context {
    name: String,
    pub comment: Option<String>,
    messages: IndexMap<MessageKey, Message>,
}

impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.comment == other.comment
            && self.messages.iter().eq(other.messages.iter())
    }
}

impl Eq for Context {}

impl Context {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            comment: None,
            messages: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn messages(&self) -> impl Iterator<Item = &Message> {
        self.messages.values()
    }

    pub fn messages_mut(&mut self) -> impl Iterator<Item = &mut Message> {
        self.messages.values_mut()
    }

    pub fn get(&self, source: &str, disambiguation: Option<&str>) -> Option<&Message> {
        self.messages.get(&key_ref(source, disambiguation))
    }

    pub fn get_mut(&mut self, source: &str, disambiguation: Option<&str>) -> Option<&mut Message> {
        self.messages.get_mut(&key_ref(source, disambiguation))
    }

    pub fn contains(&self, key: &MessageKey) -> bool {
        self.messages.contains_key(&key.borrowed())
    }

    /// Append a message. A second message with the same key is rejected.
    pub fn insert(&mut self, message: Message) -> Result<&mut Message, DuplicateMessage> {
        if self.contains(&message.key) {
            return Err(DuplicateMessage {
                context: self.name.clone(),
                key: message.key,
            });
        }
        let (index, _) = self.messages.insert_full(message.key.clone(), message);
        Ok(&mut self.messages[index])
    }

    /// Get the message with `key`, appending `make(key)` if it is absent.
    ///
    /// The flag is true when the message was inserted.
    pub fn get_or_insert_with(
        &mut self,
        key: MessageKey,
        make: impl FnOnce(MessageKey) -> Message,
    ) -> (&mut Message, bool) {
        match self.messages.entry(key) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                let message = make(entry.key().clone());
                (entry.insert(message), true)
            }
        }
    }

    /// Remove every vanished message, returning the removed keys in order.
    fn remove_vanished(&mut self) -> Vec<MessageKey> {
        let mut removed = Vec::new();
        self.messages.retain(|key, message| {
            let vanished = message.status() == Status::Vanished;
            if vanished {
                removed.push(key.clone());
            }
            !vanished
        });
        removed
    }
}

// ============================================================
// Catalog
// ============================================================

/// Counts by status, for summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CatalogStats {
    pub finished: usize,
    pub unfinished: usize,
    pub vanished: usize,
    pub plural: usize,
}

impl CatalogStats {
    pub fn total(&self) -> usize {
        self.finished + self.unfinished + self.vanished
    }
}

/// What [`Catalog::prune_vanished`] removed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneReport {
    /// `(context, key)` of every dropped message.
    pub removed: Vec<(String, MessageKey)>,
    /// Contexts dropped because nothing was left in them.
    pub removed_contexts: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Catalog {
    pub version: String,
    /// Target locale tag (TS `language` attribute).
    pub language: Option<String>,
    pub source_language: Option<String>,
    contexts: IndexMap<String, Context>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new(None)
    }
}

impl PartialEq for Catalog {
    fn eq(&self, other: &Self) -> bool {
        self.version == other.version
            && self.language == other.language
            && self.source_language == other.source_language
            && self.contexts.iter().eq(other.contexts.iter())
    }
}

impl Eq for Catalog {}

impl Catalog {
    pub fn new(language: Option<String>) -> Self {
        Self {
            version: DEFAULT_TS_VERSION.to_string(),
            language,
            source_language: None,
            contexts: IndexMap::new(),
        }
    }

    pub fn lookup(
        &self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&Message> {
        self.contexts.get(context)?.get(source, disambiguation)
    }

    pub fn lookup_mut(
        &mut self,
        context: &str,
        source: &str,
        disambiguation: Option<&str>,
    ) -> Option<&mut Message> {
        self.contexts.get_mut(context)?.get_mut(source, disambiguation)
    }

    /// Get the named context, appending an empty one if it does not exist.
    pub fn upsert_context(&mut self, name: &str) -> &mut Context {
        if !self.contexts.contains_key(name) {
            self.contexts.insert(name.to_string(), Context::new(name));
        }
        &mut self.contexts[name]
    }

    pub fn context(&self, name: &str) -> Option<&Context> {
        self.contexts.get(name)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &Context> {
        self.contexts.values()
    }

    pub fn contexts_mut(&mut self) -> impl Iterator<Item = &mut Context> {
        self.contexts.values_mut()
    }

    /// Every message with its context, in serialization order.
    pub fn iter_messages(&self) -> impl Iterator<Item = (&Context, &Message)> {
        self.contexts
            .values()
            .flat_map(|context| context.messages().map(move |message| (context, message)))
    }

    pub fn message_count(&self) -> usize {
        self.contexts.values().map(Context::len).sum()
    }

    pub fn stats(&self) -> CatalogStats {
        let mut stats = CatalogStats::default();
        for (_, message) in self.iter_messages() {
            match message.status() {
                Status::Finished => stats.finished += 1,
                Status::Unfinished => stats.unfinished += 1,
                Status::Vanished => stats.vanished += 1,
            }
            if message.is_plural {
                stats.plural += 1;
            }
        }
        stats
    }

    /// Permanently drop vanished messages and any context they leave empty.
    pub fn prune_vanished(&mut self) -> PruneReport {
        let mut report = PruneReport::default();
        for context in self.contexts.values_mut() {
            let name = context.name.clone();
            report.removed.extend(
                context
                    .remove_vanished()
                    .into_iter()
                    .map(|key| (name.clone(), key)),
            );
        }
        self.contexts.retain(|name, context| {
            if context.is_empty() {
                report.removed_contexts.push(name.clone());
                false
            } else {
                true
            }
        });
        report
    }
}
