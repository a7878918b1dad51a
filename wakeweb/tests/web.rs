// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

#![cfg(target_arch = "wasm32")]

use gloo_utils::document;
use wakelock::{FallbackBackend, LoadCounter, SessionStore, config::BLANK_VIDEO};
use wakeweb::{storage::BrowserSessionStore, video::VideoHost};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

fn video_count() -> u32 {
    document().get_elements_by_tag_name("video").length()
}

#[wasm_bindgen_test]
async fn fallback_attaches_one_hidden_video() {
    let fallback = FallbackBackend::new(VideoHost, BLANK_VIDEO);
    // Headless browsers may refuse playback, in which case the video is removed again.
    match fallback.enable().await {
        Ok(()) => {
            assert_eq!(video_count(), 1);
            assert!(fallback.enable().await.is_ok());
            assert_eq!(video_count(), 1);
        }
        Err(_) => assert_eq!(video_count(), 0),
    }

    fallback.disable();
    fallback.disable();
    assert_eq!(video_count(), 0);
}

#[wasm_bindgen_test]
fn load_counter_uses_session_storage() {
    let store = BrowserSessionStore::new();
    store.set("wakewebTestLoads", "41").unwrap();
    let counter = LoadCounter::new(store.clone(), "wakewebTestLoads");
    assert_eq!(counter.increment(), 42);
    assert_eq!(store.get("wakewebTestLoads"), Some("42".to_string()));
}
