//! Bibliography retrieval through `window.fetch`

use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::js_message;
use crate::error::FetchError;
use crate::source::SourceFetcher;

/// Fetches sources relative to the current page
#[derive(Debug, Default, Clone, Copy)]
pub struct WebFetcher;

impl SourceFetcher for WebFetcher {
    async fn fetch_text(&self, location: &str) -> Result<String, FetchError> {
        let js_err = |value: wasm_bindgen::JsValue| FetchError::Js {
            location: location.to_string(),
            message: js_message(&value),
        };

        let window = web_sys::window().ok_or_else(|| FetchError::Js {
            location: location.to_string(),
            message: "no window".to_string(),
        })?;

        let response: Response = JsFuture::from(window.fetch_with_str(location))
            .await
            .map_err(js_err)?
            .dyn_into()
            .map_err(js_err)?;

        if !response.ok() {
            return Err(FetchError::Status {
                location: location.to_string(),
                status: response.status(),
            });
        }

        let text = JsFuture::from(response.text().map_err(js_err)?)
            .await
            .map_err(js_err)?;

        text.as_string().ok_or_else(|| FetchError::Js {
            location: location.to_string(),
            message: "response body is not text".to_string(),
        })
    }
}
