//! BibTeX parser implementation using nom
//!
//! This parser handles standard BibTeX format including:
//! - @string definitions (plus the builtin month macros)
//! - @preamble declarations
//! - @comment sections
//! - Any entry type, kept as written, with `{...}` or `(...)` bodies
//! - Braced, quoted, numeric and macro field values
//! - String concatenation with #
//! - Nested braces in field values

use lazy_static::lazy_static;
use nom::{
    branch::alt,
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::map,
    IResult,
};
use std::collections::HashMap;

use super::entry::BibTeXEntry;

lazy_static! {
    static ref MONTH_MACROS: HashMap<&'static str, &'static str> = [
        ("jan", "January"),
        ("feb", "February"),
        ("mar", "March"),
        ("apr", "April"),
        ("may", "May"),
        ("jun", "June"),
        ("jul", "July"),
        ("aug", "August"),
        ("sep", "September"),
        ("oct", "October"),
        ("nov", "November"),
        ("dec", "December"),
    ]
    .into_iter()
    .collect();
}

/// A recoverable problem found while parsing; the offending entry is skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXParseError {
    pub line: u32,
    pub column: u32,
    pub message: String,
}

/// Result of parsing a BibTeX file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BibTeXParseResult {
    pub entries: Vec<BibTeXEntry>,
    pub preambles: Vec<String>,
    /// `@string` macros, keyed by lowercase name
    pub strings: HashMap<String, String>,
    pub errors: Vec<BibTeXParseError>,
}

/// Error type for parsing failures
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("Invalid syntax at line {line}, column {column}: {message}")]
    Syntax {
        line: u32,
        column: u32,
        message: String,
    },
    #[error("No entry found")]
    NoEntry,
}

impl From<BibTeXParseError> for ParseError {
    fn from(err: BibTeXParseError) -> Self {
        ParseError::Syntax {
            line: err.line,
            column: err.column,
            message: err.message,
        }
    }
}

/// Parse BibTeX text, skipping (and recording) malformed entries
pub fn parse(input: &str) -> BibTeXParseResult {
    parse_bibtex(input)
}

/// Parse BibTeX text, failing on the first malformed entry
pub fn parse_strict(input: &str) -> Result<Vec<BibTeXEntry>, ParseError> {
    let result = parse_bibtex(input);
    match result.errors.into_iter().next() {
        Some(err) => Err(err.into()),
        None => Ok(result.entries),
    }
}

/// Parse a single BibTeX entry
pub fn parse_entry(input: &str) -> Result<BibTeXEntry, ParseError> {
    parse_strict(input)?
        .into_iter()
        .next()
        .ok_or(ParseError::NoEntry)
}

fn parse_bibtex(input: &str) -> BibTeXParseResult {
    let mut result = BibTeXParseResult::default();
    let mut remaining = input;

    while !remaining.is_empty() {
        remaining = skip_whitespace_and_comments(remaining);

        if remaining.is_empty() {
            break;
        }

        if !remaining.starts_with('@') {
            // Free text between entries is ignored, as BibTeX does
            match remaining.find('@') {
                Some(pos) => {
                    remaining = &remaining[pos..];
                    continue;
                }
                None => break,
            }
        }

        match parse_at_entry(remaining, &result.strings) {
            Ok((rest, AtEntry::Entry(entry))) => {
                result.entries.push(entry);
                remaining = rest;
            }
            Ok((rest, AtEntry::String(key, value))) => {
                result.strings.insert(key.to_lowercase(), value);
                remaining = rest;
            }
            Ok((rest, AtEntry::Preamble(text))) => {
                result.preambles.push(text);
                remaining = rest;
            }
            Ok((rest, AtEntry::Comment)) => {
                remaining = rest;
            }
            Err(_) => {
                let (line, column) = line_col(input, input.len() - remaining.len());
                result.errors.push(BibTeXParseError {
                    line,
                    column,
                    message: format!("Failed to parse entry `{}`", entry_head(remaining)),
                });
                // Resume at the next @ or give up
                match remaining[1..].find('@') {
                    Some(pos) => remaining = &remaining[pos + 1..],
                    None => break,
                }
            }
        }
    }

    result
}

/// One-based line and column of a byte offset
fn line_col(input: &str, offset: usize) -> (u32, u32) {
    let before = &input[..offset];
    let line = before.matches('\n').count() as u32 + 1;
    let column = match before.rfind('\n') {
        Some(nl) => before[nl + 1..].chars().count() as u32 + 1,
        None => before.chars().count() as u32 + 1,
    };
    (line, column)
}

/// The opening of an entry, for error messages
fn entry_head(input: &str) -> &str {
    let end = input
        .find(|c: char| c == ',' || c == '\n')
        .unwrap_or(input.len());
    &input[..end]
}

enum AtEntry {
    Entry(BibTeXEntry),
    String(String, String),
    Preamble(String),
    Comment,
}

fn skip_whitespace_and_comments(input: &str) -> &str {
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        if bytes[pos].is_ascii_whitespace() {
            pos += 1;
        } else if bytes[pos] == b'%' {
            while pos < bytes.len() && bytes[pos] != b'\n' {
                pos += 1;
            }
        } else {
            break;
        }
    }

    &input[pos..]
}

fn parse_at_entry<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, AtEntry> {
    let (rest, _) = char('@')(input)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, entry_type) = take_while1(|c: char| c.is_ascii_alphanumeric())(rest)?;

    match entry_type.to_lowercase().as_str() {
        "string" => {
            let (rest, (key, value)) = parse_string_definition(rest, strings)?;
            Ok((rest, AtEntry::String(key, value)))
        }
        "preamble" => {
            let (rest, text) = parse_preamble(rest, strings)?;
            Ok((rest, AtEntry::Preamble(text)))
        }
        "comment" => {
            let (rest, _) = parse_comment_body(rest)?;
            Ok((rest, AtEntry::Comment))
        }
        _ => {
            let (rest, entry) = parse_entry_body(rest, entry_type, strings)?;
            Ok((rest, AtEntry::Entry(entry)))
        }
    }
}

fn parse_string_definition<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_body(rest)?;
    let (rest, (key, value)) = parse_single_field(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, (key, value)))
}

fn parse_preamble<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_body(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    Ok((rest, value))
}

/// Skip a @comment body: a braced block, or the rest of the line
fn parse_comment_body(input: &str) -> IResult<&str, ()> {
    let (rest, _) = multispace0(input)?;
    if rest.starts_with('{') {
        let (rest, _) = parse_braced_content(rest)?;
        Ok((rest, ()))
    } else {
        let pos = rest.find('\n').unwrap_or(rest.len());
        Ok((&rest[pos..], ()))
    }
}

fn parse_entry_body<'a>(
    input: &'a str,
    entry_type: &str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, BibTeXEntry> {
    let (rest, _) = multispace0(input)?;
    let (rest, close) = open_body(rest)?;
    let (rest, _) = multispace0(rest)?;

    let (rest, cite_key) = take_while1(is_cite_key_char)(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(',')(rest)?;

    let (rest, fields) = parse_fields(rest, close, strings)?;

    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char(close)(rest)?;

    let mut entry = BibTeXEntry::new(entry_type, cite_key);
    for (key, value) in fields {
        entry.add_field(key, value);
    }

    Ok((rest, entry))
}

/// Anything but whitespace and the entry delimiters
fn is_cite_key_char(c: char) -> bool {
    !c.is_whitespace() && !matches!(c, ',' | '{' | '}' | '=' | '(' | ')')
}

/// Opening `{` or `(`, returning the matching closer
fn open_body(input: &str) -> IResult<&str, char> {
    let (rest, open) = alt((char('{'), char('(')))(input)?;
    Ok((rest, if open == '(' { ')' } else { '}' }))
}

fn parse_fields<'a>(
    input: &'a str,
    close: char,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, Vec<(String, String)>> {
    let mut fields = Vec::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        if rest.starts_with(close) {
            return Ok((rest, fields));
        }

        match parse_single_field(rest, strings) {
            Ok((rest, field)) => {
                fields.push(field);
                let (rest, _) = multispace0(rest)?;
                remaining = rest.strip_prefix(',').unwrap_or(rest);
            }
            // Let the caller's closing delimiter check report the problem
            Err(_) => return Ok((remaining, fields)),
        }
    }
}

fn parse_single_field<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, (String, String)> {
    let (rest, _) = multispace0(input)?;
    let (rest, key) =
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, _) = char('=')(rest)?;
    let (rest, _) = multispace0(rest)?;
    let (rest, value) = parse_field_value(rest, strings)?;

    Ok((rest, (key.to_string(), value)))
}

/// Parse a field value, following `#` concatenation
fn parse_field_value<'a>(
    input: &'a str,
    strings: &HashMap<String, String>,
) -> IResult<&'a str, String> {
    let mut result = String::new();
    let mut remaining = input;

    loop {
        let (rest, _) = multispace0(remaining)?;

        let (rest, part) = alt((
            parse_braced_value,
            parse_quoted_value,
            map(take_while1(|c: char| c.is_ascii_digit()), |s: &str| {
                s.to_string()
            }),
            map(
                take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-'),
                |name: &str| expand_macro(name, strings),
            ),
        ))(rest)?;

        result.push_str(&part);

        let (rest, _) = multispace0(rest)?;
        match rest.strip_prefix('#') {
            Some(stripped) => remaining = stripped,
            None => return Ok((rest, result)),
        }
    }
}

/// Resolve a bare identifier: user macros first, then month names
fn expand_macro(name: &str, strings: &HashMap<String, String>) -> String {
    let lower = name.to_lowercase();
    if let Some(value) = strings.get(&lower) {
        return value.clone();
    }
    MONTH_MACROS
        .get(lower.as_str())
        .map(|m| m.to_string())
        .unwrap_or_else(|| name.to_string())
}

fn parse_braced_value(input: &str) -> IResult<&str, String> {
    let (rest, content) = parse_braced_content(input)?;
    let inner = &content[1..content.len() - 1];
    Ok((rest, inner.to_string()))
}

/// Match a balanced `{...}` block, returning it with its outer braces
fn parse_braced_content(input: &str) -> IResult<&str, &str> {
    if !input.starts_with('{') {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    }

    let mut depth = 0usize;
    let mut pos = 0;
    let bytes = input.as_bytes();

    while pos < bytes.len() {
        match bytes[pos] {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok((&input[pos + 1..], &input[..pos + 1]));
                }
            }
            b'\\' => pos += 1,
            _ => {}
        }
        pos += 1;
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

/// Parse a quoted value; braces inside may protect a `"`
fn parse_quoted_value(input: &str) -> IResult<&str, String> {
    let Some(body) = input.strip_prefix('"') else {
        return Err(nom::Err::Error(nom::error::Error::new(
            input,
            nom::error::ErrorKind::Char,
        )));
    };

    let mut result = String::new();
    let mut depth = 0usize;
    let mut chars = body.char_indices();

    while let Some((idx, c)) = chars.next() {
        match c {
            '"' if depth == 0 => return Ok((&body[idx + 1..], result)),
            '{' => {
                depth += 1;
                result.push(c);
            }
            '}' => {
                depth = depth.saturating_sub(1);
                result.push(c);
            }
            '\\' => {
                result.push(c);
                if let Some((_, escaped)) = chars.next() {
                    result.push(escaped);
                }
            }
            _ => result.push(c),
        }
    }

    Err(nom::Err::Error(nom::error::Error::new(
        input,
        nom::error::ErrorKind::Char,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_entry() {
        let input = r#"
@article{Smith2024,
    author = {John Smith},
    title = {A Great Paper},
    year = {2024},
    journal = {Nature},
}
"#;
        let result = parse(input);
        assert_eq!(result.entries.len(), 1);
        assert!(result.errors.is_empty());

        let entry = &result.entries[0];
        assert_eq!(entry.cite_key, "Smith2024");
        assert_eq!(entry.entry_type, "article");
        assert_eq!(entry.get_field("author"), Some("John Smith"));
        assert_eq!(entry.get_field("title"), Some("A Great Paper"));
        assert_eq!(entry.get_field("year"), Some("2024"));
    }

    #[test]
    fn test_parse_quoted_values() {
        let input = r#"
@article{Test2024,
    author = "Jane Doe",
    title = "Testing \"Quotes\"",
}
"#;
        let result = parse(input);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].get_field("author"), Some("Jane Doe"));
        assert_eq!(result.entries[0].get_field("title"), Some(r#"Testing \"Quotes\""#));
    }

    #[test]
    fn test_parse_quoted_unicode() {
        let result = parse(r#"@misc{u, author = "Müller and Čapek"}"#);
        assert_eq!(result.entries[0].get_field("author"), Some("Müller and Čapek"));
    }

    #[test]
    fn test_parse_nested_braces() {
        let input = r#"
@article{Test2024,
    title = {A {B}ook about {LaTeX}},
}
"#;
        let result = parse(input);
        assert_eq!(result.entries[0].get_field("title"), Some("A {B}ook about {LaTeX}"));
    }

    #[test]
    fn test_parse_string_definitions_case_insensitive() {
        let input = r#"
@string{Nature = "Nature"}
@article{Test2024,
    journal = NATURE,
}
"#;
        let result = parse(input);
        assert_eq!(result.strings.get("nature"), Some(&"Nature".to_string()));
        assert_eq!(result.entries[0].get_field("journal"), Some("Nature"));
    }

    #[test]
    fn test_parse_month_macro_and_concatenation() {
        let input = r#"@misc{m, month = jan, note = "Vol. " # 3 # {, part } # "B"}"#;
        let result = parse(input);
        let entry = &result.entries[0];
        assert_eq!(entry.get_field("month"), Some("January"));
        assert_eq!(entry.get_field("note"), Some("Vol. 3, part B"));
    }

    #[test]
    fn test_parse_multiple_entries_in_order() {
        let input = r#"
@article{First2024,
    title = {First Paper},
}

@book{Second2024,
    title = {Second Book},
}
"#;
        let result = parse(input);
        assert_eq!(result.entries.len(), 2);
        assert_eq!(result.entries[0].cite_key, "First2024");
        assert_eq!(result.entries[1].cite_key, "Second2024");
        assert_eq!(result.entries[1].entry_type, "book");
    }

    #[test]
    fn test_parse_comments_and_preamble() {
        let input = r#"
% a line comment
@comment{ignored @article{nope, title={x}} }
@preamble{"\newcommand{\x}{y}"}
@article{Real, title = {Kept}}
"#;
        let result = parse(input);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].cite_key, "Real");
        assert_eq!(result.preambles.len(), 1);
    }

    #[test]
    fn test_parse_records_error_and_recovers() {
        let input = "@article{Broken title = {x}}\n@article{Good, title = {y}}";
        let result = parse(input);
        assert_eq!(result.entries.len(), 1);
        assert_eq!(result.entries[0].cite_key, "Good");
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 1);
        assert_eq!(result.errors[0].column, 1);
    }

    #[test]
    fn test_error_position_on_later_line() {
        let input = "@misc{ok, title={a}}\n\n   @misc{bad";
        let result = parse(input);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].line, 3);
        assert_eq!(result.errors[0].column, 4);
    }

    #[test]
    fn test_parse_strict_fails_on_malformed_entry() {
        let err = parse_strict("@article{Broken, title = {unterminated").unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn test_parse_strict_empty_input() {
        assert_eq!(parse_strict("").unwrap(), Vec::new());
        assert_eq!(parse_entry("   "), Err(ParseError::NoEntry));
    }

    #[test]
    fn test_cite_keys_beyond_ascii_word_chars() {
        let input = "@article{Müller2020, title = {Umlaut}}\n\
                     @article{o'brien2019, title = {Apostrophe}}\n\
                     @misc{doi:10.1/x#y, title = {Punctuated}}";
        let entries = parse_strict(input).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, vec!["Müller2020", "o'brien2019", "doi:10.1/x#y"]);
    }

    #[test]
    fn test_parenthesized_bodies() {
        let input = r#"
@string(pub = "Publisher")
@book(Knuth1997,
  title = {The {Art} of Programming},
  publisher = pub,
)
"#;
        let entries = parse_strict(input).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cite_key, "Knuth1997");
        assert_eq!(entries[0].get_field("title"), Some("The {Art} of Programming"));
        assert_eq!(entries[0].get_field("publisher"), Some("Publisher"));
    }

    #[test]
    fn test_mismatched_body_delimiters_fail() {
        assert!(parse_strict("@misc(k, title = {T}}").is_err());
    }

    #[test]
    fn test_repeated_field_keeps_last_value_in_first_position() {
        let entry =
            parse_entry("@article{d2020, title = {Draft}, year = {2020}, TITLE = {Final}}").unwrap();
        let keys: Vec<&str> = entry.fields.iter().map(|f| f.key.as_str()).collect();
        assert_eq!(keys, vec!["title", "year"]);
        assert_eq!(entry.get_field("title"), Some("Final"));
    }
}
