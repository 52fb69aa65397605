//! Citation cards and their markup
//!
//! The markup targets Bootstrap 5: the toggle button uses the collapse
//! plugin (`data-bs-toggle="collapse"`) to show the card's action row.

use impress_bibtex::{format_entry, BibTeXEntry};

use crate::citation::{format_citation, CitationFields};
use crate::clipboard::CopyControl;

/// CSS selector of the copy button inside a card
pub const COPY_BUTTON_SELECTOR: &str = ".copy-bibtex";

const LINK_CLASS: &str = "btn btn-outline-dark btn-sm";

/// What an action link points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Paper,
    Pdf,
    Code,
    Doi,
}

impl ActionKind {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Paper => "Paper",
            Self::Pdf => "PDF",
            Self::Code => "Code",
            Self::Doi => "DOI",
        }
    }
}

/// An external link in a card's action row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionLink {
    pub kind: ActionKind,
    pub href: String,
}

impl ActionLink {
    pub fn label(&self) -> &'static str {
        self.kind.label()
    }
}

/// One rendered bibliography entry
#[derive(Debug, Clone)]
pub struct CitationCard {
    pub index: usize,
    pub region_id: String,
    /// Citation markup; may contain `<em>`
    pub citation: String,
    /// Links in display order: Paper, PDF, Code, DOI
    pub actions: Vec<ActionLink>,
    pub copy: CopyControl,
}

impl CitationCard {
    pub fn from_entry(region_id: &str, index: usize, entry: &BibTeXEntry) -> Self {
        let fields = CitationFields::from_entry(entry);

        let mut actions = Vec::new();
        let mut push = |kind, href: &str| {
            if !href.is_empty() {
                actions.push(ActionLink {
                    kind,
                    href: href.to_string(),
                });
            }
        };
        push(ActionKind::Paper, fields.url);
        push(ActionKind::Pdf, fields.pdf);
        push(ActionKind::Code, fields.code);
        if let Some(doi_link) = fields.doi_link() {
            push(ActionKind::Doi, &doi_link);
        }

        Self {
            index,
            region_id: region_id.to_string(),
            citation: format_citation(&fields),
            actions,
            copy: CopyControl::new(format_entry(entry)),
        }
    }

    /// Id of the collapsible action row, unique per region and index
    pub fn collapse_id(&self) -> String {
        format!("actions-{}-{}", self.region_id, self.index)
    }

    /// BibTeX text placed on the clipboard
    pub fn bibtex(&self) -> &str {
        self.copy.payload()
    }

    pub fn action(&self, kind: ActionKind) -> Option<&ActionLink> {
        self.actions.iter().find(|a| a.kind == kind)
    }

    pub fn to_html(&self) -> String {
        let collapse_id = escape_html(&self.collapse_id());
        let mut html = String::new();

        html.push_str("<div class=\"card mb-2 shadow-sm border-0\">\n");
        html.push_str(
            "  <div class=\"card-body\" style=\"background-color:#f7f7f7; border-radius:6px; padding:0.2rem 0.4rem;\">\n",
        );
        html.push_str("    <div class=\"d-flex justify-content-between align-items-start\">\n");
        html.push_str(&format!(
            "      <p class=\"mb-1 flex-grow-1\" style=\"padding-right:10px;\">{}</p>\n",
            self.citation
        ));
        html.push_str(
            "      <div style=\"flex: 0 0 32px; display:flex; justify-content:center;\">\n",
        );
        html.push_str(&format!(
            "        <button class=\"btn btn-sm p-0 toggle-arrow btn-outline-info\" type=\"button\" data-bs-toggle=\"collapse\" data-bs-target=\"#{id}\" aria-expanded=\"false\" aria-controls=\"{id}\" style=\"width:28px; height:28px; border-radius:10%; font-size:1.1rem; line-height:1;\">&#9662;</button>\n",
            id = collapse_id
        ));
        html.push_str("      </div>\n");
        html.push_str("    </div>\n");
        html.push_str(&format!(
            "    <div class=\"collapse mt-2\" id=\"{}\">\n",
            collapse_id
        ));
        html.push_str("      <div class=\"d-flex flex-wrap gap-2 btn-group-area\">\n");
        for action in &self.actions {
            html.push_str(&format!(
                "        <a class=\"{}\" href=\"{}\" target=\"_blank\" rel=\"noopener\">{}</a>\n",
                LINK_CLASS,
                escape_html(&action.href),
                action.label()
            ));
        }
        html.push_str(&format!(
            "        <button class=\"{} copy-bibtex\" type=\"button\">{}</button>\n",
            LINK_CLASS,
            self.copy.label()
        ));
        html.push_str("      </div>\n");
        html.push_str("    </div>\n");
        html.push_str("  </div>\n");
        html.push_str("</div>\n");

        html
    }
}

/// Notice shown in place of the cards when a source cannot be rendered
pub fn failure_notice_html(source: &str) -> String {
    format!(
        "<p class=\"text-danger\">Failed to load publications from <code>{}</code>.</p>",
        escape_html(source)
    )
}

/// Escape text for use in element content or a quoted attribute
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
