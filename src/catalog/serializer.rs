//! TS catalog serializer.
//!
//! Writes the layout Qt Linguist itself produces (four-space indentation,
//! one `<context>` block per context, messages in model order), so that
//! catalogs maintained by this tool diff cleanly against ones touched by Qt
//! tools.

use std::collections::HashMap;
use std::fmt::Write;

use clap::ValueEnum;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};

use super::model::{Catalog, Context, Forms, Location, Message, Status};

/// How `<location>` references are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LocationMode {
    /// `line="42"`
    #[default]
    Absolute,
    /// `line="+3"`, relative to the previous reference to the same file.
    Relative,
    /// No `<location>` elements at all.
    None,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SerializeOptions {
    pub locations: LocationMode,
}

/// Serialize with absolute locations.
pub fn serialize(catalog: &Catalog) -> Vec<u8> {
    serialize_with(catalog, SerializeOptions::default())
}

pub fn serialize_with(catalog: &Catalog, options: SerializeOptions) -> Vec<u8> {
    let mut writer = TsWriter {
        out: String::new(),
        options,
        last_line: HashMap::new(),
    };
    writer.write_catalog(catalog);
    writer.out.into_bytes()
}

struct TsWriter {
    out: String,
    options: SerializeOptions,
    /// Last line written per file, for relative locations.
    last_line: HashMap<String, i64>,
}

impl TsWriter {
    fn write_catalog(&mut self, catalog: &Catalog) {
        self.out.push_str("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n");
        self.out.push_str("<!DOCTYPE TS>\n");
        self.out.push_str("<TS");
        self.attribute("version", &catalog.version);
        if let Some(language) = &catalog.language {
            self.attribute("language", language);
        }
        if let Some(source_language) = &catalog.source_language {
            self.attribute("sourcelanguage", source_language);
        }
        self.out.push_str(">\n");
        for context in catalog.contexts() {
            self.write_context(context);
        }
        self.out.push_str("</TS>\n");
    }

    fn write_context(&mut self, context: &Context) {
        self.out.push_str("<context>\n");
        self.text_element(1, "name", context.name());
        if let Some(comment) = &context.comment {
            self.text_element(1, "comment", comment);
        }
        for message in context.messages() {
            self.write_message(message);
        }
        self.out.push_str("</context>\n");
    }

    fn write_message(&mut self, message: &Message) {
        self.indent(1);
        self.out.push_str("<message");
        if message.is_plural {
            self.attribute("numerus", "yes");
        }
        self.out.push_str(">\n");

        for location in &message.locations {
            self.write_location(location);
        }
        self.text_element(2, "source", message.source());
        if let Some(disambiguation) = message.disambiguation() {
            self.text_element(2, "comment", disambiguation);
        }
        if let Some(comment) = &message.comment {
            self.text_element(2, "extracomment", comment);
        }
        if let Some(translator_comment) = &message.translator_comment {
            self.text_element(2, "translatorcomment", translator_comment);
        }

        self.indent(2);
        self.out.push_str("<translation");
        match message.translation.status {
            Status::Finished => {}
            Status::Unfinished => self.attribute("type", "unfinished"),
            Status::Vanished => self.attribute("type", "vanished"),
        }
        self.out.push('>');
        match &message.translation.forms {
            Forms::Single(text) => self.text(text),
            Forms::Plural(forms) => {
                self.out.push('\n');
                for form in forms.iter() {
                    self.text_element(3, "numerusform", form);
                }
                self.indent(2);
            }
        }
        self.out.push_str("</translation>\n");

        self.indent(1);
        self.out.push_str("</message>\n");
    }

    fn write_location(&mut self, location: &Location) {
        let line = match (self.options.locations, location.line) {
            (LocationMode::None, _) => return,
            (_, None) => None,
            (LocationMode::Absolute, Some(line)) => Some(line.to_string()),
            (LocationMode::Relative, Some(line)) => {
                let line = line as i64;
                let previous = self
                    .last_line
                    .insert(location.file.clone(), line)
                    .unwrap_or(0);
                Some(format!("{:+}", line - previous))
            }
        };

        self.indent(2);
        self.out.push_str("<location");
        self.attribute("filename", &location.file);
        if let Some(line) = line {
            self.attribute("line", &line);
        }
        self.out.push_str("/>\n");
    }

    fn indent(&mut self, level: usize) {
        for _ in 0..level {
            self.out.push_str("    ");
        }
    }

    fn attribute(&mut self, key: &str, value: &str) {
        let _ = write!(self.out, " {}=\"", key);
        for c in value.chars() {
            if is_restricted(c) {
                let _ = write!(self.out, "&#x{:x};", c as u32);
            } else {
                let mut buf = [0u8; 4];
                self.out.push_str(&escape(c.encode_utf8(&mut buf)));
            }
        }
        self.out.push('"');
    }

    fn text_element(&mut self, level: usize, name: &str, text: &str) {
        self.indent(level);
        let _ = write!(self.out, "<{}>", name);
        self.text(text);
        let _ = writeln!(self.out, "</{}>", name);
    }

    /// Escaped character data. Characters XML 1.0 cannot carry are written as
    /// `<byte value="xNN"/>` the way Qt does.
    fn text(&mut self, text: &str) {
        let mut rest = text;
        while let Some(pos) = rest.find(is_restricted) {
            self.out.push_str(&escape(&rest[..pos]));
            let c = rest[pos..].chars().next().unwrap_or_default();
            let _ = write!(self.out, "<byte value=\"x{:x}\"/>", c as u32);
            rest = &rest[pos + c.len_utf8()..];
        }
        self.out.push_str(&escape(rest));
    }
}

fn is_restricted(c: char) -> bool {
    (c < '\u{20}' && c != '\t' && c != '\n') || c == '\u{fffe}' || c == '\u{ffff}'
}
