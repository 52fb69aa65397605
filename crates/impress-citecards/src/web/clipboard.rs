//! `navigator.clipboard` and `setTimeout` bindings

use std::time::Duration;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

use super::js_message;
use crate::clipboard::{Clipboard, Scheduler};
use crate::error::ClipboardError;

/// The asynchronous Clipboard API
///
/// Looked up at call time: it is missing on insecure origins.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebClipboard;

impl Clipboard for WebClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        let window = web_sys::window().ok_or(ClipboardError::Unavailable)?;
        let navigator = window.navigator();

        let clipboard = js_sys::Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(|_| ClipboardError::Unavailable)?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err(ClipboardError::Unavailable);
        }

        let write_text: js_sys::Function =
            js_sys::Reflect::get(&clipboard, &JsValue::from_str("writeText"))
                .map_err(|_| ClipboardError::Unavailable)?
                .dyn_into()
                .map_err(|_| ClipboardError::Unavailable)?;

        let promise: js_sys::Promise = write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|e| ClipboardError::Rejected(js_message(&e)))?
            .dyn_into()
            .map_err(|e| ClipboardError::Rejected(js_message(&e)))?;

        JsFuture::from(promise)
            .await
            .map_err(|e| ClipboardError::Rejected(js_message(&e)))?;
        Ok(())
    }
}

/// Runs tasks with `window.setTimeout`
#[derive(Debug, Default, Clone, Copy)]
pub struct WebScheduler;

impl Scheduler for WebScheduler {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce()>) {
        let Some(window) = web_sys::window() else {
            tracing::warn!("No window; dropping scheduled task");
            return;
        };

        let callback = Closure::once_into_js(move || task());
        let millis = i32::try_from(delay.as_millis()).unwrap_or(i32::MAX);
        if let Err(err) = window
            .set_timeout_with_callback_and_timeout_and_arguments_0(callback.unchecked_ref(), millis)
        {
            tracing::warn!(error = %js_message(&err), "setTimeout failed");
        }
    }
}
