//! Wiring configured sources to their regions

use futures::future::join_all;

use crate::config::CitecardsConfig;
use crate::page::Page;
use crate::parse::BibliographyParser;
use crate::renderer::CitationRenderer;
use crate::source::SourceFetcher;

/// Start one render call per binding and wait for all of them
///
/// The calls run side by side on the current task. Each one owns its
/// region, so a failing source only ever affects its own region.
pub async fn setup<F, P, G>(config: &CitecardsConfig, renderer: &CitationRenderer<F, P>, page: &G)
where
    F: SourceFetcher,
    P: BibliographyParser,
    G: Page,
{
    tracing::info!(sources = config.sources.len(), "Rendering publication lists");

    let renders = config
        .sources
        .iter()
        .map(|binding| renderer.render(page, &binding.source, &binding.region));
    join_all(renders).await;
}
