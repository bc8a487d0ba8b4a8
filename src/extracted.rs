//! Extracted message list.
//!
//! The extractor that scans source code is a separate tool; it hands over a
//! JSON array of messages in the order it found them:
//!
//! ```json
//! [
//!   {
//!     "context": "Host",
//!     "source": "CPU no.%u is not present",
//!     "location": { "file": "src/host.cpp", "line": 42 }
//!   },
//!   { "context": "Host", "source": "%n CPU(s)", "disambiguation": "count", "plural": true }
//! ]
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{Location, MessageKey};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractedLocation {
    pub file: String,
    #[serde(default)]
    pub line: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMessage {
    pub context: String,
    #[serde(alias = "sourceText")]
    pub source: String,
    #[serde(default)]
    pub disambiguation: Option<String>,
    /// Developer comment for translators.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub location: Option<ExtractedLocation>,
    #[serde(default, alias = "isPlural")]
    pub plural: bool,
}

impl ExtractedMessage {
    pub fn new(context: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            context: context.into(),
            source: source.into(),
            disambiguation: None,
            comment: None,
            location: None,
            plural: false,
        }
    }

    pub fn with_disambiguation(mut self, disambiguation: impl Into<String>) -> Self {
        self.disambiguation = Some(disambiguation.into());
        self
    }

    pub fn with_location(mut self, file: impl Into<String>, line: u32) -> Self {
        self.location = Some(ExtractedLocation {
            file: file.into(),
            line: Some(line),
        });
        self
    }

    pub fn plural(mut self) -> Self {
        self.plural = true;
        self
    }

    pub fn key(&self) -> MessageKey {
        MessageKey::new(self.source.clone(), self.disambiguation.clone())
    }

    pub fn model_location(&self) -> Option<Location> {
        self.location.as_ref().map(|loc| Location {
            file: loc.file.clone(),
            line: loc.line,
        })
    }
}

pub fn parse_extracted(content: &str) -> Result<Vec<ExtractedMessage>> {
    serde_json::from_str(content).context("Extracted message list must be a JSON array")
}

pub fn load_extracted(path: &Path) -> Result<Vec<ExtractedMessage>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read extracted message list: {:?}", path))?;
    parse_extracted(&content)
        .with_context(|| format!("Failed to parse extracted message list: {:?}", path))
}
