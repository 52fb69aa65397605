//! BibTeX parsing and formatting
//!
//! This crate is the parser collaborator for the citation cards renderer:
//! it turns BibTeX text into ordered records (entry type, cite key, fields
//! in source order) and writes a record back out as BibTeX.
//!
//! Features:
//! - Nom-based parser that records malformed entries and keeps going
//! - `@string` macros, builtin month names and `#` concatenation
//! - Entry types and field keys kept exactly as written
//! - Re-serialization for clipboard export

mod entry;
mod formatter;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXField};
pub use formatter::{format_entries, format_entry};
pub use parser::{parse, parse_entry, parse_strict, BibTeXParseError, BibTeXParseResult, ParseError};
