//! tscat - Qt Linguist catalog maintenance
//!
//! tscat keeps `.ts` translation catalogs in sync with the strings a separate
//! extractor finds in source code. On every pass it decides which existing
//! translations survive, which become obsolete ("vanished") and which are
//! newly required ("unfinished"), and checks plural forms against the target
//! locale.
//!
//! ## Module Structure
//!
//! - `catalog`: Catalog model, TS parser and TS serializer
//! - `merge`: Reconciles an extracted message list with an existing catalog
//! - `plural`: Plural-form counts per locale
//! - `extracted`: Loader for the extractor's JSON output
//! - `rules`: Validation rules used by `validate`
//! - `issues`: Issue type definitions and reporting
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `scanner`: Catalog discovery from config patterns
//! - `utils`: Shared utility functions

pub mod catalog;
pub mod cli;
pub mod config;
pub mod extracted;
pub mod issues;
pub mod merge;
pub mod plural;
pub mod rules;
pub mod scanner;
pub mod utils;
