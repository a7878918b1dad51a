// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use gloo_utils::document;
use log::warn;
use wakelock::Config;

/// ID of the `<script type="application/json">` element holding the configuration.
pub const CONFIG_ELEMENT_ID: &str = "wakelock-config";

/// Reads the configuration from the page, using defaults for anything missing or invalid.
pub fn load_config() -> Config {
    let Some(element) = document().get_element_by_id(CONFIG_ELEMENT_ID) else {
        return Config::default();
    };
    let text = element.text_content().unwrap_or_default();
    match serde_json::from_str(&text) {
        Ok(config) => config,
        Err(e) => {
            warn!("Ignoring invalid wake lock configuration: {e}");
            Config::default()
        }
    }
}
