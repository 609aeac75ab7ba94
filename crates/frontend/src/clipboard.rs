//! Copy text to the system clipboard
//!
//! The async Clipboard API is tried first. It is missing on plain HTTP and
//! in older browsers, so the fallback selects a hidden `<textarea>` and runs
//! the legacy `copy` command.

use js_sys::Reflect;
use thiserror::Error;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{Clipboard, Document, HtmlDocument, HtmlTextAreaElement};

/// Why a copy attempt failed
#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("No browser document available")]
    NoDocument,

    #[error("Clipboard API is not available")]
    Unsupported,

    #[error("Clipboard write was rejected: {0}")]
    Rejected(String),

    #[error("Copy command failed: {0}")]
    Command(String),
}

/// Copy `text`, returning whether either path succeeded.
pub async fn copy_to_clipboard(text: &str) -> bool {
    match write_with_api(text).await {
        Ok(()) => true,
        Err(e) => {
            debug!(error = %e, "Clipboard API unavailable, falling back to copy command");
            match write_with_command(text) {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "Failed to copy text");
                    false
                }
            }
        }
    }
}

async fn write_with_api(text: &str) -> Result<(), ClipboardError> {
    let window = web_sys::window().ok_or(ClipboardError::NoDocument)?;
    let navigator = window.navigator();

    // `navigator.clipboard` is undefined outside secure contexts
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
        .unwrap_or(JsValue::UNDEFINED);
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(ClipboardError::Unsupported);
    }

    JsFuture::from(clipboard.unchecked_into::<Clipboard>().write_text(text))
        .await
        .map_err(|e| ClipboardError::Rejected(describe(&e)))?;
    Ok(())
}

fn write_with_command(text: &str) -> Result<(), ClipboardError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or(ClipboardError::NoDocument)?;
    let body = document.body().ok_or(ClipboardError::NoDocument)?;

    let textarea = document
        .create_element("textarea")
        .map_err(command_error)?
        .dyn_into::<HtmlTextAreaElement>()
        .map_err(|_| ClipboardError::Command("textarea has unexpected type".into()))?;
    textarea.set_value(text);

    let style = textarea.style();
    for (property, value) in [("position", "fixed"), ("left", "-999999px"), ("top", "-999999px")] {
        style.set_property(property, value).map_err(command_error)?;
    }

    body.append_child(&textarea).map_err(command_error)?;
    let result = run_copy_command(&document, &textarea);
    textarea.remove();
    result
}

fn run_copy_command(
    document: &Document,
    textarea: &HtmlTextAreaElement,
) -> Result<(), ClipboardError> {
    textarea.focus().map_err(command_error)?;
    textarea.select();

    let document = document
        .dyn_ref::<HtmlDocument>()
        .ok_or_else(|| ClipboardError::Command("document does not support execCommand".into()))?;

    match document.exec_command("copy") {
        Ok(true) => Ok(()),
        Ok(false) => Err(ClipboardError::Command("copy command is disabled".into())),
        Err(e) => Err(command_error(e)),
    }
}

fn command_error(value: JsValue) -> ClipboardError {
    ClipboardError::Command(describe(&value))
}

pub(crate) fn describe(value: &JsValue) -> String {
    if let Some(message) = value.as_string() {
        return message;
    }
    value
        .dyn_ref::<js_sys::Error>()
        .map_or_else(|| format!("{value:?}"), |e| String::from(e.message()))
}
