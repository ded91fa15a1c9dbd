//! Write-only clipboard access for the copy action.

use std::cell::RefCell;

use js_sys::{Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

use crate::error::{Result, ToolError};

pub trait Clipboard {
    fn write_text(&self, text: &str) -> Result<()>;
}

/// Stands in where no clipboard exists (headless use); every write fails.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableClipboard;

impl Clipboard for UnavailableClipboard {
    fn write_text(&self, _text: &str) -> Result<()> {
        Err(ToolError::operational("clipboard unavailable"))
    }
}

/// Keeps the last written text; used by tests and native embedders.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: RefCell<Option<String>>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<String> {
        self.contents.borrow().clone()
    }
}

impl Clipboard for MemoryClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        *self.contents.borrow_mut() = Some(text.to_string());
        Ok(())
    }
}

/// `navigator.clipboard.writeText` in the browser. The returned promise is not
/// awaited; a missing clipboard object (insecure context, old browser) is
/// reported as an operational error.
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserClipboard;

impl Clipboard for BrowserClipboard {
    fn write_text(&self, text: &str) -> Result<()> {
        let window =
            web_sys::window().ok_or_else(|| ToolError::operational("clipboard unavailable"))?;
        let navigator = window.navigator();
        let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))
            .map_err(|_| ToolError::operational("clipboard unavailable"))?;
        if clipboard.is_undefined() || clipboard.is_null() {
            return Err(ToolError::operational("clipboard unavailable"));
        }
        let write_text = Reflect::get(&clipboard, &JsValue::from_str("writeText"))
            .ok()
            .and_then(|value| value.dyn_into::<Function>().ok())
            .ok_or_else(|| ToolError::operational("clipboard does not support writeText"))?;
        write_text
            .call1(&clipboard, &JsValue::from_str(text))
            .map_err(|err| {
                ToolError::operational(
                    err.as_string()
                        .unwrap_or_else(|| "clipboard write rejected".to_string()),
                )
            })?;
        Ok(())
    }
}
