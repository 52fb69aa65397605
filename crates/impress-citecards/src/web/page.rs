//! The browser DOM as a [`Page`]

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element};

use super::clipboard::{WebClipboard, WebScheduler};
use super::js_message;
use crate::card::{CitationCard, COPY_BUTTON_SELECTOR};
use crate::clipboard::CopyControl;
use crate::error::RenderFailure;
use crate::page::{Page, Region};

type ControlRegistry = Rc<RefCell<HashMap<String, Vec<CopyControl>>>>;

/// A document whose elements (found by id) are the regions
///
/// The page keeps each region's copy controls alive; clearing a region
/// drops them, which disarms any pending label reset.
#[derive(Clone)]
pub struct WebPage {
    document: Document,
    controls: ControlRegistry,
}

impl WebPage {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            controls: Rc::default(),
        }
    }
}

impl Page for WebPage {
    type Region = WebRegion;

    fn region(&self, id: &str) -> Option<WebRegion> {
        let element = self.document.get_element_by_id(id)?;
        Some(WebRegion {
            id: id.to_string(),
            element,
            controls: self.controls.clone(),
        })
    }
}

pub struct WebRegion {
    id: String,
    element: Element,
    controls: ControlRegistry,
}

impl WebRegion {
    fn host_err(&self, value: JsValue) -> RenderFailure {
        RenderFailure::Host(format!("{}: {}", self.id, js_message(&value)))
    }

    fn wire_copy_button(&self, button: Element, control: &CopyControl) -> Result<(), RenderFailure> {
        let label_target = button.clone();
        control.on_label_change(move |label| {
            if label_target.is_connected() {
                label_target.set_text_content(Some(label));
            }
        });

        let weak = control.downgrade();
        let on_click = Closure::<dyn FnMut()>::new(move || {
            let Some(control) = weak.upgrade() else {
                return;
            };
            spawn_local(async move {
                // Failures are logged by the control; the label stays put
                let _ = control.copy(&WebClipboard, &WebScheduler).await;
            });
        });

        button
            .add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
            .map_err(|e| self.host_err(e))?;
        // The listener lives as long as the button; it only holds a weak handle
        on_click.forget();
        Ok(())
    }
}

impl Region for WebRegion {
    fn clear(&self) {
        self.element.set_inner_html("");
        self.controls.borrow_mut().remove(&self.id);
    }

    fn append_card(&self, card: CitationCard) -> Result<(), RenderFailure> {
        self.element
            .insert_adjacent_html("beforeend", &card.to_html())
            .map_err(|e| self.host_err(e))?;

        let card_element = self
            .element
            .last_element_child()
            .ok_or_else(|| RenderFailure::Host(format!("{}: card not inserted", self.id)))?;
        let button = card_element
            .query_selector(COPY_BUTTON_SELECTOR)
            .map_err(|e| self.host_err(e))?
            .ok_or_else(|| RenderFailure::Host(format!("{}: copy button missing", self.id)))?;

        self.wire_copy_button(button, &card.copy)?;
        self.controls
            .borrow_mut()
            .entry(self.id.clone())
            .or_default()
            .push(card.copy);
        Ok(())
    }

    fn show_notice(&self, html: &str) {
        self.controls.borrow_mut().remove(&self.id);
        self.element.set_inner_html(html);
    }
}
