// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::error_message;
use leptos::prelude::window;
use wakelock::SessionStore;
use web_sys::Storage;

/// The window's `sessionStorage`, if it is available.
#[derive(Clone, Debug)]
pub struct BrowserSessionStore {
    storage: Option<Storage>,
}

impl BrowserSessionStore {
    pub fn new() -> Self {
        Self {
            storage: window().session_storage().ok().flatten(),
        }
    }
}

impl Default for BrowserSessionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionStore for BrowserSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.storage
            .as_ref()
            .ok_or_else(|| "Session storage is unavailable".to_string())?
            .set_item(key, value)
            .map_err(|e| error_message(&e))
    }
}
