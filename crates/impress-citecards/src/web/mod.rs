//! Browser front end
//!
//! Build with `--features wasm --target wasm32-unknown-unknown`. The host
//! page loads Bootstrap 5 (for the collapse toggle), provides the region
//! containers, and calls one of the exported entry points.

mod clipboard;
mod console;
mod fetch;
mod page;

pub use clipboard::{WebClipboard, WebScheduler};
pub use fetch::WebFetcher;
pub use page::{WebPage, WebRegion};

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;

use crate::config::CitecardsConfig;
use crate::renderer::CitationRenderer;
use crate::setup::setup;

#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console::install();
}

/// Render the default publication lists (journals and conferences)
#[wasm_bindgen(js_name = renderPublications)]
pub fn render_publications() -> Result<(), JsValue> {
    run_when_ready(CitecardsConfig::default())
}

/// Render the source/region pairs given as JSON:
/// `{"sources": [{"source": "...", "region": "..."}]}`
#[wasm_bindgen(js_name = renderPublicationsWithConfig)]
pub fn render_publications_with_config(config_json: &str) -> Result<(), JsValue> {
    let config = CitecardsConfig::from_json(config_json)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    config
        .validate()
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    run_when_ready(config)
}

/// Run setup now, or on `DOMContentLoaded` while the document is loading
fn run_when_ready(config: CitecardsConfig) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;

    let ready_state = js_sys::Reflect::get(&document, &JsValue::from_str("readyState"))?
        .as_string()
        .unwrap_or_default();

    let page = WebPage::new(document.clone());
    let run = move || {
        spawn_local(async move {
            let renderer = CitationRenderer::new(WebFetcher);
            setup(&config, &renderer, &page).await;
        });
    };

    if ready_state == "loading" {
        let callback = Closure::once_into_js(run);
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())?;
    } else {
        run();
    }
    Ok(())
}

/// Best-effort text of a JS exception
pub(crate) fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
