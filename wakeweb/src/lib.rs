// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

//! Browser implementations of the wake lock platform traits, and the page using them.

pub mod config;
pub mod logger;
pub mod native;
pub mod page;
pub mod panel;
pub mod storage;
pub mod video;

use wasm_bindgen::JsValue;
use web_sys::js_sys::Reflect;

/// Returns the `message` of a JS error, or its debug representation if it doesn't have one.
pub fn error_message(e: &JsValue) -> String {
    Reflect::get(e, &JsValue::from_str("message"))
        .ok()
        .and_then(|message| message.as_string())
        .unwrap_or_else(|| format!("{e:?}"))
}
