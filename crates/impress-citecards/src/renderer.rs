//! The fetch, parse, format, render pipeline
//!
//! One render call fills one region. Every failure inside the call ends the
//! same way: the region shows a single notice naming the source, and the
//! underlying error goes to the log.

use crate::card::{failure_notice_html, CitationCard};
use crate::error::RenderFailure;
use crate::page::{Page, Region};
use crate::parse::{BibliographyParser, BibtexParser};
use crate::source::SourceFetcher;

/// Renders bibliography sources into page regions
#[derive(Debug, Clone)]
pub struct CitationRenderer<F, P = BibtexParser> {
    fetcher: F,
    parser: P,
}

impl<F: SourceFetcher> CitationRenderer<F> {
    /// Renderer using the strict BibTeX parser
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            parser: BibtexParser::strict(),
        }
    }
}

impl<F, P> CitationRenderer<F, P>
where
    F: SourceFetcher,
    P: BibliographyParser,
{
    pub fn with_parser(fetcher: F, parser: P) -> Self {
        Self { fetcher, parser }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Render `source` into the region `region_id`
    ///
    /// Never fails: problems are shown as a notice in the region and logged.
    pub async fn render<G: Page>(&self, page: &G, source: &str, region_id: &str) {
        if let Err(err) = self.try_render(page, source, region_id).await {
            tracing::error!(source, region = region_id, error = %err, "Error loading bib file");
            match page.region(region_id) {
                Some(region) => {
                    region.clear();
                    region.show_notice(&failure_notice_html(source));
                }
                None => {
                    tracing::warn!(region = region_id, "No region to show the failure notice in")
                }
            }
        }
    }

    /// Render and report the outcome: the number of cards shown
    ///
    /// On error the region may hold a partial list; [`render`](Self::render)
    /// replaces it with the failure notice.
    pub async fn try_render<G: Page>(
        &self,
        page: &G,
        source: &str,
        region_id: &str,
    ) -> Result<usize, RenderFailure> {
        let text = self.fetcher.fetch_text(source).await?;
        let entries = self.parser.parse(&text)?;

        let region = page
            .region(region_id)
            .ok_or_else(|| RenderFailure::MissingRegion(region_id.to_string()))?;
        region.clear();

        for (index, entry) in entries.iter().enumerate() {
            region.append_card(CitationCard::from_entry(region_id, index, entry))?;
        }

        tracing::debug!(
            source,
            region = region_id,
            cards = entries.len(),
            "Rendered bibliography"
        );
        Ok(entries.len())
    }
}
