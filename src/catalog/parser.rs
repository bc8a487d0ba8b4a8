//! TS catalog parser.
//!
//! Parsing runs in two passes. The first turns the XML into a small element
//! tree (quick-xml events), remembering the line each element starts on. The
//! second walks that tree into a [`Catalog`], validating the structure as it
//! goes. Structural errors abort immediately; duplicate keys and plural arity
//! mismatches are collected so `validate` can report all of them at once.

use std::borrow::Cow;
use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;
use tracing::trace;

use super::model::{
    Catalog, DEFAULT_TS_VERSION, Forms, Location, Message, MessageKey, PluralForms, Status,
    Translation,
};
use crate::plural::{BuiltinPluralRules, PluralRules};
use crate::utils::LineIndex;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("line {line}: malformed catalog: {reason}")]
    MalformedStructure { line: usize, reason: String },

    #[error("line {line}: duplicate message {key} in context '{context}'")]
    DuplicateKey {
        line: usize,
        context: String,
        key: MessageKey,
    },

    #[error(
        "line {line}: plural translation of {key} in context '{context}' has {found} form(s), {}",
        expectation(.locale, .expected)
    )]
    PluralArityMismatch {
        line: usize,
        context: String,
        key: MessageKey,
        locale: Option<String>,
        expected: Option<u32>,
        found: usize,
    },
}

fn expectation(locale: &Option<String>, expected: &Option<u32>) -> String {
    match (locale, expected) {
        (Some(locale), Some(expected)) => format!("locale '{}' requires {}", locale, expected),
        _ => "no known locale uses that many".to_string(),
    }
}

impl ParseError {
    /// 1-based line of the offending element.
    pub fn line(&self) -> usize {
        match self {
            ParseError::MalformedStructure { line, .. }
            | ParseError::DuplicateKey { line, .. }
            | ParseError::PluralArityMismatch { line, .. } => *line,
        }
    }

    fn malformed(line: usize, reason: impl Into<String>) -> Self {
        ParseError::MalformedStructure {
            line,
            reason: reason.into(),
        }
    }
}

/// Parse a TS catalog using the built-in plural table.
pub fn parse(bytes: &[u8]) -> Result<Catalog, ParseError> {
    parse_with(bytes, &BuiltinPluralRules)
}

/// Parse a TS catalog, checking plural arity against `rules`.
///
/// Returns the first error found.
pub fn parse_with(bytes: &[u8], rules: &dyn PluralRules) -> Result<Catalog, ParseError> {
    let (catalog, errors) = read_catalog(bytes, rules)?;
    match errors.into_iter().next() {
        Some(err) => Err(err),
        None => Ok(catalog),
    }
}

/// Every error in the document.
///
/// A malformed structure ends the scan, since nothing after it can be
/// trusted; duplicate keys and arity mismatches are all reported.
pub fn collect_errors(bytes: &[u8], rules: &dyn PluralRules) -> Vec<ParseError> {
    match read_catalog(bytes, rules) {
        Ok((_, errors)) => errors,
        Err(err) => vec![err],
    }
}

fn read_catalog(
    bytes: &[u8],
    rules: &dyn PluralRules,
) -> Result<(Catalog, Vec<ParseError>), ParseError> {
    let root = read_tree(bytes)?;
    let mut builder = CatalogBuilder {
        rules,
        errors: Vec::new(),
        locations: LocationResolver::default(),
    };
    let catalog = builder.build(root)?;
    trace!(
        language = ?catalog.language,
        contexts = catalog.contexts().count(),
        messages = catalog.message_count(),
        errors = builder.errors.len(),
        "parsed catalog"
    );
    Ok((catalog, builder.errors))
}

// ============================================================
// XML tree
// ============================================================

#[derive(Debug)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
    line: usize,
}

#[derive(Debug)]
enum Node {
    Element(Element),
    Text(String),
}

impl Element {
    fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.as_str())
    }

    fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            Node::Text(_) => None,
        })
    }

    /// Error unless every text child is whitespace.
    fn expect_no_text(&self) -> Result<(), ParseError> {
        let stray = self.children.iter().any(|node| match node {
            Node::Text(text) => !text.trim().is_empty(),
            Node::Element(_) => false,
        });
        if stray {
            return Err(ParseError::malformed(
                self.line,
                format!("unexpected text inside <{}>", self.name),
            ));
        }
        Ok(())
    }

    /// Text content, decoding `<byte value=".."/>` escapes.
    fn text(&self) -> Result<String, ParseError> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(s) => text.push_str(s),
                Node::Element(el) if el.name == "byte" => text.push(decode_byte(el)?),
                Node::Element(el) => {
                    return Err(ParseError::malformed(
                        el.line,
                        format!("unexpected <{}> inside <{}>", el.name, self.name),
                    ));
                }
            }
        }
        Ok(text)
    }
}

fn decode_byte(el: &Element) -> Result<char, ParseError> {
    let invalid = || ParseError::malformed(el.line, "invalid <byte> value");
    let value = el.attribute("value").ok_or_else(invalid)?;
    let (radix, digits) = if let Some(hex) = value.strip_prefix("0x") {
        (16, hex)
    } else if let Some(hex) = value.strip_prefix('x') {
        (16, hex)
    } else {
        (10, value)
    };
    let code = u32::from_str_radix(digits, radix).map_err(|_| invalid())?;
    char::from_u32(code).ok_or_else(invalid)
}

/// XML end-of-line handling: `\r\n` and a lone `\r` both become `\n`.
fn normalize_line_endings(bytes: &[u8]) -> Cow<'_, [u8]> {
    if !bytes.contains(&b'\r') {
        return Cow::Borrowed(bytes);
    }
    let mut out = Vec::with_capacity(bytes.len());
    let mut iter = bytes.iter().copied().peekable();
    while let Some(byte) = iter.next() {
        if byte == b'\r' {
            out.push(b'\n');
            iter.next_if_eq(&b'\n');
        } else {
            out.push(byte);
        }
    }
    Cow::Owned(out)
}

fn read_tree(bytes: &[u8]) -> Result<Element, ParseError> {
    let normalized = normalize_line_endings(bytes);
    let bytes = normalized.as_ref();
    let line_index = LineIndex::new(bytes);
    let mut reader = Reader::from_reader(bytes);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let line = line_index.line_of(reader.buffer_position());
        let event = reader.read_event_into(&mut buf).map_err(|err| {
            ParseError::malformed(line_index.line_of(reader.buffer_position()), err.to_string())
        })?;
        match event {
            Event::Start(start) => stack.push(open_element(&start, line)?),
            Event::Empty(start) => {
                let el = open_element(&start, line)?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::End(_) => {
                let el = stack
                    .pop()
                    .ok_or_else(|| ParseError::malformed(line, "unbalanced closing tag"))?;
                attach(&mut stack, &mut root, el)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|err| ParseError::malformed(line, err.to_string()))?;
                push_text(&mut stack, text.into_owned(), line)?;
            }
            Event::CData(data) => {
                let text = String::from_utf8(data.into_inner().into_owned())
                    .map_err(|err| ParseError::malformed(line, err.to_string()))?;
                push_text(&mut stack, text, line)?;
            }
            Event::Eof => break,
            // Declaration, doctype, comments and processing instructions
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(ParseError::malformed(
            open.line,
            format!("<{}> is never closed", open.name),
        ));
    }
    root.ok_or_else(|| ParseError::malformed(1, "document has no root element"))
}

fn open_element(start: &BytesStart<'_>, line: usize) -> Result<Element, ParseError> {
    let name = std::str::from_utf8(start.name().as_ref())
        .map_err(|err| ParseError::malformed(line, err.to_string()))?
        .to_string();
    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr = attr.map_err(|err| ParseError::malformed(line, err.to_string()))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|err| ParseError::malformed(line, err.to_string()))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| ParseError::malformed(line, err.to_string()))?
            .into_owned();
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        line,
    })
}

fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    el: Element,
) -> Result<(), ParseError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(Node::Element(el));
        return Ok(());
    }
    if root.is_some() {
        return Err(ParseError::malformed(el.line, "multiple root elements"));
    }
    *root = Some(el);
    Ok(())
}

fn push_text(stack: &mut [Element], text: String, line: usize) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(Node::Text(text));
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(ParseError::malformed(line, "text outside the root element")),
    }
}

// ============================================================
// Catalog construction
// ============================================================

/// Resolves relative `line="+N"` references and omitted file names.
///
/// Each file starts at line 0. An omitted filename means the current one:
/// for the first location of a message that is the first file of the
/// previous message, otherwise the previous location's file.
#[derive(Default)]
struct LocationResolver {
    last_line: HashMap<String, i64>,
    previous_message_file: Option<String>,
}

impl LocationResolver {
    fn resolve(&mut self, elements: &[&Element]) -> Result<Vec<Location>, ParseError> {
        let mut locations = Vec::with_capacity(elements.len());
        let mut current = self.previous_message_file.clone();

        for el in elements {
            let file = match el.attribute("filename") {
                Some(file) => file.to_string(),
                None => current
                    .clone()
                    .ok_or_else(|| ParseError::malformed(el.line, "<location> without filename"))?,
            };
            let line = match el.attribute("line") {
                None => None,
                Some(raw) => Some(self.resolve_line(&file, raw, el.line)?),
            };
            current = Some(file.clone());
            locations.push(Location { file, line });
        }

        if let Some(first) = locations.first() {
            self.previous_message_file = Some(first.file.clone());
        }
        Ok(locations)
    }

    fn resolve_line(&mut self, file: &str, raw: &str, at: usize) -> Result<u32, ParseError> {
        let invalid = || ParseError::malformed(at, format!("invalid location line '{}'", raw));
        let previous = self.last_line.get(file).copied().unwrap_or(0);
        let resolved = if raw.starts_with('+') || raw.starts_with('-') {
            let delta: i64 = raw.parse().map_err(|_| invalid())?;
            previous + delta
        } else {
            raw.parse::<u32>().map_err(|_| invalid())? as i64
        };
        let line = u32::try_from(resolved).map_err(|_| invalid())?;
        self.last_line.insert(file.to_string(), resolved);
        Ok(line)
    }
}

struct CatalogBuilder<'a> {
    rules: &'a dyn PluralRules,
    errors: Vec<ParseError>,
    locations: LocationResolver,
}

impl CatalogBuilder<'_> {
    fn build(&mut self, root: Element) -> Result<Catalog, ParseError> {
        if root.name != "TS" {
            return Err(ParseError::malformed(
                root.line,
                format!("expected <TS> root element, found <{}>", root.name),
            ));
        }
        root.expect_no_text()?;

        let non_empty = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(String::from);
        let mut catalog = Catalog::new(non_empty(root.attribute("language")));
        catalog.source_language = non_empty(root.attribute("sourcelanguage"));
        catalog.version = root
            .attribute("version")
            .unwrap_or(DEFAULT_TS_VERSION)
            .to_string();

        for el in root.child_elements() {
            match el.name.as_str() {
                "context" => self.read_context(&mut catalog, el)?,
                "defaultcodec" | "dependencies" => {}
                name if name.starts_with("extra-") => {}
                name => {
                    return Err(ParseError::malformed(
                        el.line,
                        format!("unexpected <{}> inside <TS>", name),
                    ));
                }
            }
        }
        Ok(catalog)
    }

    fn read_context(&mut self, catalog: &mut Catalog, el: &Element) -> Result<(), ParseError> {
        el.expect_no_text()?;

        let mut name: Option<String> = None;
        let mut comment: Option<String> = None;
        let mut messages = Vec::new();
        for child in el.child_elements() {
            match child.name.as_str() {
                "name" => set_once(&mut name, child)?,
                "comment" => set_once(&mut comment, child)?,
                "message" => messages.push(child),
                other if other.starts_with("extra-") => {}
                other => {
                    return Err(ParseError::malformed(
                        child.line,
                        format!("unexpected <{}> inside <context>", other),
                    ));
                }
            }
        }
        let name =
            name.ok_or_else(|| ParseError::malformed(el.line, "<context> without <name>"))?;

        let language = catalog.language.clone();
        let context = catalog.upsert_context(&name);
        if comment.is_some() {
            context.comment = comment;
        }
        for message_el in messages {
            let message = self.read_message(message_el, &name, language.as_deref())?;
            if let Err(duplicate) = context.insert(message) {
                self.errors.push(ParseError::DuplicateKey {
                    line: message_el.line,
                    context: duplicate.context,
                    key: duplicate.key,
                });
            }
        }
        Ok(())
    }

    fn read_message(
        &mut self,
        el: &Element,
        context: &str,
        language: Option<&str>,
    ) -> Result<Message, ParseError> {
        el.expect_no_text()?;

        let is_plural = match el.attribute("numerus") {
            None | Some("no") | Some("false") => false,
            Some("yes") | Some("true") => true,
            Some(other) => {
                return Err(ParseError::malformed(
                    el.line,
                    format!("invalid numerus value '{}'", other),
                ));
            }
        };

        let mut source: Option<String> = None;
        let mut disambiguation: Option<String> = None;
        let mut comment: Option<String> = None;
        let mut translator_comment: Option<String> = None;
        let mut translation_el: Option<&Element> = None;
        let mut location_els: Vec<&Element> = Vec::new();

        for child in el.child_elements() {
            match child.name.as_str() {
                "location" => location_els.push(child),
                "source" => set_once(&mut source, child)?,
                "comment" => set_once(&mut disambiguation, child)?,
                "extracomment" => set_once(&mut comment, child)?,
                "translatorcomment" => set_once(&mut translator_comment, child)?,
                "translation" => {
                    if translation_el.replace(child).is_some() {
                        return Err(ParseError::malformed(
                            child.line,
                            "more than one <translation> in <message>",
                        ));
                    }
                }
                // Previous source/comment left by fuzzy merges and free-form
                // user data are not part of the model.
                "oldsource" | "oldcomment" | "userdata" => {}
                other if other.starts_with("extra-") => {}
                other => {
                    return Err(ParseError::malformed(
                        child.line,
                        format!("unexpected <{}> inside <message>", other),
                    ));
                }
            }
        }

        let source =
            source.ok_or_else(|| ParseError::malformed(el.line, "<message> without <source>"))?;
        let key = MessageKey::new(source, disambiguation);
        let locations = self.locations.resolve(&location_els)?;

        let translation = match translation_el {
            Some(translation_el) => read_translation(translation_el, is_plural)?,
            None if is_plural => {
                let arity = language.and_then(|l| self.rules.forms_required(l).ok());
                Translation::unfinished(Some(arity.unwrap_or(0)))
            }
            None => Translation::unfinished(None),
        };

        // A plural translation without any form has nothing to check yet
        if let Forms::Plural(forms) = &translation.forms
            && !forms.is_empty()
        {
            self.check_arity(forms, &key, context, language, el);
        }

        let mut message = Message::new(key, is_plural, translation);
        message.comment = comment;
        message.translator_comment = translator_comment;
        message.locations = locations;
        Ok(message)
    }

    fn check_arity(
        &mut self,
        forms: &PluralForms,
        key: &MessageKey,
        context: &str,
        language: Option<&str>,
        at: &Element,
    ) {
        let found = forms.len();
        let required = language.and_then(|l| self.rules.forms_required(l).ok());
        let mismatch = match required {
            Some(required) => found != required as usize,
            None => !self.rules.accepts_arity(found),
        };
        if mismatch {
            self.errors.push(ParseError::PluralArityMismatch {
                line: at.line,
                context: context.to_string(),
                key: key.clone(),
                locale: required.and(language.map(String::from)),
                expected: required,
                found,
            });
        }
    }
}

fn set_once(slot: &mut Option<String>, el: &Element) -> Result<(), ParseError> {
    if slot.is_some() {
        return Err(ParseError::malformed(
            el.line,
            format!("more than one <{}>", el.name),
        ));
    }
    *slot = Some(el.text()?);
    Ok(())
}

fn read_translation(el: &Element, is_plural: bool) -> Result<Translation, ParseError> {
    let status = match el.attribute("type") {
        None => Status::Finished,
        Some("unfinished") => Status::Unfinished,
        Some("vanished") | Some("obsolete") => Status::Vanished,
        Some(other) => {
            return Err(ParseError::malformed(
                el.line,
                format!("invalid translation type '{}'", other),
            ));
        }
    };
    if el.attribute("variants") == Some("yes") {
        return Err(ParseError::malformed(
            el.line,
            "length variants are not supported",
        ));
    }

    let has_forms = el.child_elements().any(|child| child.name == "numerusform");
    let forms = if is_plural {
        el.expect_no_text()?;
        let mut forms = Vec::new();
        for child in el.child_elements() {
            if child.name != "numerusform" {
                return Err(ParseError::malformed(
                    child.line,
                    format!("unexpected <{}> in plural translation", child.name),
                ));
            }
            forms.push(child.text()?);
        }
        Forms::Plural(forms.into())
    } else if has_forms {
        return Err(ParseError::malformed(
            el.line,
            "<numerusform> in a message without numerus=\"yes\"",
        ));
    } else {
        Forms::Single(el.text()?)
    };
    Ok(Translation::new(status, forms))
}
