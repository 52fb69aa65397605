//! The host page: display regions that receive cards
//!
//! The renderer never creates regions; the page must already have one for
//! every id it is asked to render into.

use std::cell::RefCell;
use std::rc::Rc;

use crate::card::CitationCard;
use crate::error::RenderFailure;

/// A page holding display regions, looked up by id
pub trait Page {
    type Region: Region;

    fn region(&self, id: &str) -> Option<Self::Region>;
}

/// One display region (container element)
pub trait Region {
    /// Remove everything, including the copy controls of previous cards
    fn clear(&self);

    fn append_card(&self, card: CitationCard) -> Result<(), RenderFailure>;

    /// Replace the region's content with a notice
    fn show_notice(&self, html: &str);
}

#[derive(Debug, Default)]
struct RegionState {
    cards: Vec<CitationCard>,
    notice: Option<String>,
}

#[derive(Debug, Default)]
struct PageState {
    // Kept in insertion order for document output
    regions: Vec<(String, RegionState)>,
}

impl PageState {
    fn region_mut(&mut self, id: &str) -> Option<&mut RegionState> {
        self.regions
            .iter_mut()
            .find(|(region_id, _)| region_id == id)
            .map(|(_, state)| state)
    }

    fn region(&self, id: &str) -> Option<&RegionState> {
        self.regions
            .iter()
            .find(|(region_id, _)| region_id == id)
            .map(|(_, state)| state)
    }
}

/// In-memory page producing static markup
///
/// Clones share the same regions, so a page can be handed to several render
/// calls and inspected afterwards.
#[derive(Debug, Clone, Default)]
pub struct HtmlPage {
    state: Rc<RefCell<PageState>>,
}

impl HtmlPage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let page = Self::new();
        for id in ids {
            page.add_region(id);
        }
        page
    }

    /// Add an empty region; an existing region with the same id is kept
    pub fn add_region(&self, id: impl Into<String>) {
        let id = id.into();
        let mut state = self.state.borrow_mut();
        if state.region(&id).is_none() {
            state.regions.push((id, RegionState::default()));
        }
    }

    pub fn region_ids(&self) -> Vec<String> {
        self.state
            .borrow()
            .regions
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Current markup of a region
    pub fn region_html(&self, id: &str) -> Option<String> {
        let state = self.state.borrow();
        let region = state.region(id)?;
        Some(match &region.notice {
            Some(notice) => notice.clone(),
            None => region.cards.iter().map(CitationCard::to_html).collect(),
        })
    }

    /// Cards currently shown in a region, in display order
    pub fn cards(&self, id: &str) -> Vec<CitationCard> {
        self.state
            .borrow()
            .region(id)
            .map(|region| region.cards.clone())
            .unwrap_or_default()
    }

    pub fn notice(&self, id: &str) -> Option<String> {
        self.state.borrow().region(id)?.notice.clone()
    }

    /// Every region wrapped in a `<div id=...>` container
    pub fn to_html(&self) -> String {
        self.region_ids()
            .iter()
            .map(|id| {
                format!(
                    "<div id=\"{}\">\n{}</div>\n",
                    crate::card::escape_html(id),
                    self.region_html(id).unwrap_or_default()
                )
            })
            .collect()
    }
}

impl Page for HtmlPage {
    type Region = HtmlRegion;

    fn region(&self, id: &str) -> Option<HtmlRegion> {
        self.state.borrow().region(id)?;
        Some(HtmlRegion {
            page: self.clone(),
            id: id.to_string(),
        })
    }
}

/// Handle to one region of an [`HtmlPage`]
#[derive(Debug, Clone)]
pub struct HtmlRegion {
    page: HtmlPage,
    id: String,
}

impl HtmlRegion {
    fn with_state<R>(&self, f: impl FnOnce(&mut RegionState) -> R) -> Option<R> {
        let mut state = self.page.state.borrow_mut();
        state.region_mut(&self.id).map(f)
    }
}

impl Region for HtmlRegion {
    fn clear(&self) {
        // Dropping the cards outside the borrow keeps any drop-time work
        // from re-entering the page
        let removed = self.with_state(|region| {
            region.notice = None;
            std::mem::take(&mut region.cards)
        });
        drop(removed);
    }

    fn append_card(&self, card: CitationCard) -> Result<(), RenderFailure> {
        self.with_state(|region| {
            region.notice = None;
            region.cards.push(card);
        })
        .ok_or_else(|| RenderFailure::MissingRegion(self.id.clone()))
    }

    fn show_notice(&self, html: &str) {
        let removed = self.with_state(|region| {
            region.notice = Some(html.to_string());
            std::mem::take(&mut region.cards)
        });
        drop(removed);
    }
}
