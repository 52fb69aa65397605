//! The parser seam: text in, ordered records out

use impress_bibtex::{BibTeXEntry, ParseError};

/// Turns bibliography text into entries, in source order
pub trait BibliographyParser {
    fn parse(&self, text: &str) -> Result<Vec<BibTeXEntry>, ParseError>;
}

/// How [`BibtexParser`] treats malformed entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Any malformed entry fails the whole source
    #[default]
    Strict,
    /// Malformed entries are logged and skipped
    Lenient,
}

/// [`BibliographyParser`] backed by `impress-bibtex`
#[derive(Debug, Clone, Copy, Default)]
pub struct BibtexParser {
    strictness: Strictness,
}

impl BibtexParser {
    pub fn strict() -> Self {
        Self {
            strictness: Strictness::Strict,
        }
    }

    pub fn lenient() -> Self {
        Self {
            strictness: Strictness::Lenient,
        }
    }
}

impl BibliographyParser for BibtexParser {
    fn parse(&self, text: &str) -> Result<Vec<BibTeXEntry>, ParseError> {
        match self.strictness {
            Strictness::Strict => impress_bibtex::parse_strict(text),
            Strictness::Lenient => {
                let result = impress_bibtex::parse(text);
                for err in &result.errors {
                    tracing::warn!(
                        line = err.line,
                        column = err.column,
                        "Skipping entry: {}",
                        err.message
                    );
                }
                Ok(result.entries)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "@misc{good, title = {G}}\n@misc{bad title = {B}}\n@misc{also, title = {A}}";

    #[test]
    fn test_strict_rejects_malformed_source() {
        let err = BibtexParser::strict().parse(MIXED).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 2, .. }));
    }

    #[test]
    fn test_lenient_skips_malformed_entries() {
        let entries = BibtexParser::lenient().parse(MIXED).unwrap();
        let keys: Vec<&str> = entries.iter().map(|e| e.cite_key.as_str()).collect();
        assert_eq!(keys, vec!["good", "also"]);
    }

    #[test]
    fn test_default_is_strict() {
        assert!(BibtexParser::default().parse(MIXED).is_err());
    }

    #[test]
    fn test_empty_text_has_no_entries() {
        assert!(BibtexParser::strict().parse("").unwrap().is_empty());
    }
}
