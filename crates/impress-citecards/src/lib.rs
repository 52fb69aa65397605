//! impress-citecards: BibTeX publication lists as citation cards
//!
//! Fetches a BibTeX file, parses it, and fills a page region with one card
//! per entry: an APA-like citation, a toggle for the card's action row, and
//! links for the paper, PDF, code and DOI plus a "Copy BibTeX" button.
//!
//! The seams are traits so the same pipeline runs in the browser and
//! headless:
//! - [`SourceFetcher`]: where the text comes from (file, HTTP, memory, browser fetch)
//! - [`BibliographyParser`]: text to ordered entries
//! - [`Page`] / [`Region`]: where the cards go ([`HtmlPage`] or the browser DOM)
//! - [`Clipboard`] / [`Scheduler`]: the copy button and its label reset
//!
//! ```no_run
//! use impress_citecards::{setup, CitationRenderer, CitecardsConfig, FileFetcher, HtmlPage};
//!
//! # async fn run() {
//! let page = HtmlPage::with_regions(["journal-list", "conference-list"]);
//! let renderer = CitationRenderer::new(FileFetcher::new("site"));
//! setup(&CitecardsConfig::default(), &renderer, &page).await;
//! println!("{}", page.to_html());
//! # }
//! ```

pub mod card;
pub mod citation;
pub mod clipboard;
pub mod config;
pub mod error;
#[cfg(not(target_arch = "wasm32"))]
pub mod logging;
pub mod page;
pub mod parse;
pub mod renderer;
pub mod setup;
pub mod source;

#[cfg(all(feature = "wasm", target_arch = "wasm32"))]
pub mod web;

pub use card::{failure_notice_html, ActionKind, ActionLink, CitationCard};
pub use citation::{format_authors, format_citation, CitationFields};
pub use clipboard::{
    Clipboard, CopyControl, ManualScheduler, MemoryClipboard, Scheduler, WeakCopyControl,
    COPIED_LABEL, COPY_LABEL, RESET_DELAY,
};
#[cfg(not(target_arch = "wasm32"))]
pub use clipboard::TokioScheduler;
pub use config::{CitecardsConfig, ConfigError, SourceBinding};
pub use error::{ClipboardError, FetchError, RenderFailure};
pub use page::{HtmlPage, HtmlRegion, Page, Region};
pub use parse::{BibliographyParser, BibtexParser, Strictness};
pub use renderer::CitationRenderer;
pub use setup::setup;
#[cfg(not(target_arch = "wasm32"))]
pub use source::FileFetcher;
#[cfg(all(feature = "native", not(target_arch = "wasm32")))]
pub use source::HttpFetcher;
pub use source::{SourceFetcher, StaticFetcher};

/// Returns the version of impress-citecards
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
