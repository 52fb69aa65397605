//! BibTeX formatting module
//!
//! Writes a [`BibTeXEntry`] back out as BibTeX source. This is the text
//! placed on the clipboard by the "Copy BibTeX" control.

use super::entry::BibTeXEntry;

/// Format a single entry
///
/// ```text
/// @article{Smith2024,
///   author = {John Smith},
///   year = {2024}
/// }
/// ```
///
/// Every value is wrapped in braces and written as-is. Values coming out of
/// the parser are already balanced, so no escaping is done here.
pub fn format_entry(entry: &BibTeXEntry) -> String {
    let body = entry
        .fields
        .iter()
        .map(|field| format!("  {} = {{{}}}", field.key, field.value))
        .collect::<Vec<_>>()
        .join(",\n");

    format!("@{}{{{},\n{}\n}}", entry.entry_type, entry.cite_key, body)
}

/// Format multiple entries, separated by a blank line
pub fn format_entries(entries: &[BibTeXEntry]) -> String {
    entries
        .iter()
        .map(format_entry)
        .collect::<Vec<_>>()
        .join("\n\n")
}
