//! Translation catalog: model, TS parser and TS serializer.
//!
//! The serializer is the exact inverse of the parser for every catalog the
//! merge engine can produce: `parse(&serialize(&c)) == Ok(c)`.

pub mod model;
pub mod parser;
pub mod serializer;

pub use model::{
    Catalog, CatalogStats, Context, DuplicateMessage, Forms, Location, Message, MessageKey,
    PluralForms, PruneReport, Status, Translation,
};
pub use parser::{ParseError, collect_errors, parse, parse_with};
pub use serializer::{LocationMode, SerializeOptions, serialize, serialize_with};
