//! Bundle validation
//!
//! [`validate_bundle`] checks the structural invariants of a typed bundle and
//! runs inside the composer before any bundle is returned.
//! [`validate_file`] checks a saved document and reports errors, warnings
//! and facts about it.

pub mod document;
pub mod report;
pub mod structure;

pub use document::{validate_file, validate_str};
pub use report::{DocumentInfo, ValidationReport};
pub use structure::{resource_type_counts, validate_bundle};
