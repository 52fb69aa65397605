//! APA-like citation strings
//!
//! Field lookup is case-insensitive and an empty value counts as missing.
//! Two fields fall back to an alternative: `journal` to `booktitle` and
//! `code` to `github`.

use std::borrow::Cow;

use impress_bibtex::BibTeXEntry;
use lazy_static::lazy_static;
use regex::Regex;

/// Prefix turning a DOI into a resolvable link
pub const DOI_RESOLVER: &str = "https://doi.org/";

/// Title shown when an entry has none
pub const UNTITLED: &str = "Untitled";

lazy_static! {
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"\s+and\s+").unwrap();
}

/// The fields a card needs, with fallbacks already applied
///
/// Every optional field is `""` when absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CitationFields<'a> {
    pub title: &'a str,
    pub authors: &'a str,
    pub year: &'a str,
    /// `journal`, or `booktitle` for proceedings
    pub journal: &'a str,
    pub volume: &'a str,
    pub number: &'a str,
    pub pages: &'a str,
    pub url: &'a str,
    pub pdf: &'a str,
    /// `code`, or `github`
    pub code: &'a str,
    pub doi: &'a str,
}

impl<'a> CitationFields<'a> {
    pub fn from_entry(entry: &'a BibTeXEntry) -> Self {
        let field = move |key: &str| entry.non_empty_field(key).unwrap_or("");
        let either = move |primary: &str, fallback: &str| {
            entry
                .non_empty_field(primary)
                .or_else(|| entry.non_empty_field(fallback))
                .unwrap_or("")
        };

        Self {
            title: entry.non_empty_field("title").unwrap_or(UNTITLED),
            authors: field("author"),
            year: field("year"),
            journal: either("journal", "booktitle"),
            volume: field("volume"),
            number: field("number"),
            pages: field("pages"),
            url: field("url"),
            pdf: field("pdf"),
            code: either("code", "github"),
            doi: field("doi"),
        }
    }

    /// The DOI as a resolver link, if the entry has one
    pub fn doi_link(&self) -> Option<String> {
        (!self.doi.is_empty()).then(|| format!("{}{}", DOI_RESOLVER, self.doi))
    }
}

/// Replace each BibTeX ` and ` separator with `, `
pub fn format_authors(authors: &str) -> Cow<'_, str> {
    AUTHOR_SEPARATOR.replace_all(authors, ", ")
}

/// Build the citation markup for one entry
///
/// `Authors. (Year). Title. <em>Journal</em>, Volume(Number), Pages. Link`
///
/// Missing parts are dropped along with their punctuation. The trailing link
/// prefers the DOI over the plain URL. Field values are inserted as-is.
pub fn format_citation(fields: &CitationFields<'_>) -> String {
    let mut apa = String::new();

    if !fields.authors.is_empty() {
        apa.push_str(&format_authors(fields.authors));
        apa.push_str(". ");
    }
    if !fields.year.is_empty() {
        apa.push_str(&format!("({}). ", fields.year));
    }
    apa.push_str(fields.title);
    apa.push_str(". ");

    if !fields.journal.is_empty() {
        apa.push_str(&format!("<em>{}</em>", fields.journal));
        if !fields.volume.is_empty() {
            apa.push_str(&format!(", {}", fields.volume));
        }
        if !fields.number.is_empty() {
            apa.push_str(&format!("({})", fields.number));
        }
        if !fields.pages.is_empty() {
            apa.push_str(&format!(", {}", fields.pages));
        }
        apa.push('.');
    }

    if let Some(link) = fields.doi_link() {
        apa.push(' ');
        apa.push_str(&link);
    } else if !fields.url.is_empty() {
        apa.push(' ');
        apa.push_str(fields.url);
    }

    apa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(fields: &[(&str, &str)]) -> BibTeXEntry {
        fields
            .iter()
            .fold(BibTeXEntry::new("article", "key"), |e, (k, v)| {
                e.with_field(*k, *v)
            })
    }

    #[test]
    fn test_full_article() {
        let e = entry(&[
            ("title", "X"),
            ("author", "A and B"),
            ("year", "2020"),
            ("journal", "J"),
            ("volume", "3"),
            ("pages", "1-10"),
            ("doi", "10.1/xyz"),
        ]);
        assert_eq!(
            format_citation(&CitationFields::from_entry(&e)),
            "A, B. (2020). X. <em>J</em>, 3, 1-10. https://doi.org/10.1/xyz"
        );
    }

    #[test]
    fn test_title_only() {
        let e = entry(&[("title", "Lonely")]);
        assert_eq!(format_citation(&CitationFields::from_entry(&e)), "Lonely. ");
    }

    #[test]
    fn test_missing_title_uses_placeholder() {
        let e = entry(&[("year", "1999")]);
        assert_eq!(
            format_citation(&CitationFields::from_entry(&e)),
            "(1999). Untitled. "
        );
    }

    #[test]
    fn test_number_follows_volume() {
        let e = entry(&[
            ("title", "T"),
            ("journal", "J"),
            ("volume", "12"),
            ("number", "4"),
        ]);
        assert_eq!(
            format_citation(&CitationFields::from_entry(&e)),
            "T. <em>J</em>, 12(4)."
        );
    }

    #[test]
    fn test_volume_details_need_journal() {
        let e = entry(&[("title", "T"), ("volume", "12"), ("pages", "3")]);
        assert_eq!(format_citation(&CitationFields::from_entry(&e)), "T. ");
    }

    #[test]
    fn test_booktitle_fallback() {
        let e = entry(&[("title", "T"), ("booktitle", "Proc. Conf")]);
        let fields = CitationFields::from_entry(&e);
        assert_eq!(fields.journal, "Proc. Conf");
        assert_eq!(format_citation(&fields), "T. <em>Proc. Conf</em>.");
    }

    #[test]
    fn test_journal_wins_over_booktitle() {
        let e = entry(&[("title", "T"), ("booktitle", "B"), ("journal", "J")]);
        assert_eq!(CitationFields::from_entry(&e).journal, "J");
    }

    #[test]
    fn test_empty_journal_falls_back() {
        let e = entry(&[("title", "T"), ("journal", ""), ("booktitle", "B")]);
        assert_eq!(CitationFields::from_entry(&e).journal, "B");
    }

    #[test]
    fn test_github_fallback() {
        let e = entry(&[("title", "T"), ("github", "https://github.com/x/y")]);
        assert_eq!(CitationFields::from_entry(&e).code, "https://github.com/x/y");
    }

    #[test]
    fn test_doi_preferred_over_url() {
        let e = entry(&[
            ("title", "T"),
            ("url", "https://example.org/p"),
            ("doi", "10.5/abc"),
        ]);
        let citation = format_citation(&CitationFields::from_entry(&e));
        assert!(citation.ends_with(" https://doi.org/10.5/abc"));
        assert!(!citation.contains("example.org"));
    }

    #[test]
    fn test_url_used_without_doi() {
        let e = entry(&[("title", "T"), ("url", "https://example.org/p")]);
        assert_eq!(
            format_citation(&CitationFields::from_entry(&e)),
            "T.  https://example.org/p"
        );
    }

    #[test]
    fn test_uppercase_keys_are_found() {
        let e = entry(&[("TITLE", "Shouting"), ("Year", "2001")]);
        assert_eq!(
            format_citation(&CitationFields::from_entry(&e)),
            "(2001). Shouting. "
        );
    }

    #[test]
    fn test_author_separator_handles_newlines() {
        assert_eq!(
            format_authors("Ada Lovelace and\n    Charles Babbage  and Alan Turing"),
            "Ada Lovelace, Charles Babbage, Alan Turing"
        );
    }

    #[test]
    fn test_author_separator_needs_whitespace() {
        assert_eq!(format_authors("Anderson, Sandy"), "Anderson, Sandy");
    }
}
