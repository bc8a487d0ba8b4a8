//! Catalog validation rules.
//!
//! Pure functions that take the inputs they need and return a specific issue
//! type.
//!
//! - `structure`: parse errors, duplicate keys, plural arity
//! - `placeholder`: place markers that differ between source and translation

pub mod placeholder;
pub mod structure;

pub use placeholder::check_placeholder_issues;
pub use structure::check_structure_issues;
