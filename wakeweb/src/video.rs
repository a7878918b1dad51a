// Copyright 2026 The wakelock Authors.
// This project is dual-licensed under Apache 2.0 and MIT terms.
// See LICENSE-APACHE and LICENSE-MIT for details.

use crate::error_message;
use gloo_utils::document;
use log::warn;
use wakelock::{FallbackError, MediaHost};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlVideoElement;

/// Plays the fallback video in a hidden `<video>` element in the document body.
#[derive(Clone, Copy, Debug, Default)]
pub struct VideoHost;

impl MediaHost for VideoHost {
    type Element = HtmlVideoElement;

    fn is_supported(&self) -> bool {
        document().body().is_some()
    }

    fn attach(&self, source: &str) -> Result<HtmlVideoElement, FallbackError> {
        let body = document()
            .body()
            .ok_or_else(|| FallbackError::Unsupported("Document has no body".to_string()))?;
        let video = document()
            .create_element("video")
            .map_err(unsupported)?
            .dyn_into::<HtmlVideoElement>()
            .map_err(|_| FallbackError::Unsupported("Not a video element".to_string()))?;
        video.set_attribute("playsinline", "").map_err(unsupported)?;
        video.set_muted(true);
        video.set_loop(true);
        video.set_src(source);
        video
            .style()
            .set_property("display", "none")
            .map_err(unsupported)?;
        body.append_child(&video).map_err(unsupported)?;
        Ok(video)
    }

    async fn play(&self, element: &HtmlVideoElement) -> Result<(), FallbackError> {
        JsFuture::from(element.play().map_err(playback)?)
            .await
            .map_err(playback)?;
        Ok(())
    }

    fn pause(&self, element: &HtmlVideoElement) {
        if let Err(e) = element.pause() {
            warn!("Failed to pause fallback video: {}", error_message(&e));
        }
    }

    fn clear_source(&self, element: &HtmlVideoElement) {
        element.set_src("");
    }

    fn detach(&self, element: HtmlVideoElement) {
        element.remove();
    }
}

fn unsupported(e: JsValue) -> FallbackError {
    FallbackError::Unsupported(error_message(&e))
}

fn playback(e: JsValue) -> FallbackError {
    FallbackError::Playback(error_message(&e))
}
